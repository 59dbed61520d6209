//! Sectors command - the tax rate table

use crate::cmd::{print_json, print_table};
use crate::core::{BusinessSector, SectorTable};
use clap::Args;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct SectorsCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct SectorRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Sector")]
    name: String,
    #[tabled(rename = "Ngành nghề")]
    name_vi: String,
    #[tabled(rename = "VAT %")]
    vat: String,
    #[tabled(rename = "PIT %")]
    pit: String,
    #[tabled(rename = "Total %")]
    total: String,
}

impl From<&BusinessSector> for SectorRow {
    fn from(sector: &BusinessSector) -> Self {
        SectorRow {
            code: sector.code.clone(),
            name: sector.name.clone(),
            name_vi: sector.name_vi.clone(),
            vat: sector.vat_rate.normalize().to_string(),
            pit: sector.pit_rate.normalize().to_string(),
            total: sector.total_rate().normalize().to_string(),
        }
    }
}

impl SectorsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = SectorTable::default();
        if self.json {
            let sectors: Vec<&BusinessSector> = table.iter().collect();
            return print_json(&sectors);
        }
        print_table(table.iter().map(SectorRow::from));
        Ok(())
    }
}
