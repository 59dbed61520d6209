//! Init command - create a state file for one household business

use crate::cmd::{now, print_table, today};
use crate::core::{AppState, Hkd, HkdGroup, HkdStatus, Representative, SectorTable};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Registered business name
    #[arg(long)]
    name: String,

    /// Tax code (MST)
    #[arg(long)]
    mst: String,

    /// Business sector code (see `hkdtax sectors`)
    #[arg(long, default_value = "RETAIL")]
    sector: String,

    /// Revenue group, 1 to 4
    #[arg(long, default_value_t = 1)]
    group: u8,

    /// Representative's full name
    #[arg(long)]
    representative: Option<String>,

    /// Province or city of the business address
    #[arg(long)]
    province: Option<String>,

    /// Overwrite an existing state file
    #[arg(long)]
    force: bool,
}

#[derive(Tabled)]
struct ScheduledRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Form")]
    form: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl InitCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        if state_path.exists() && !self.force {
            anyhow::bail!(
                "State file {} already exists. Use --force to overwrite it.",
                state_path.display()
            );
        }

        let sectors = SectorTable::default();
        let sector = sectors.find(&self.sector)?.clone();
        let group = HkdGroup::new(self.group)?;
        let hkd = Hkd {
            id: "hkd-001".to_string(),
            mst: self.mst.trim().to_string(),
            name: self.name.clone(),
            address: String::new(),
            ward: String::new(),
            district: String::new(),
            province: self.province.clone().unwrap_or_default(),
            business_sector: sector,
            group,
            representative: Representative {
                name: self.representative.clone().unwrap_or_default(),
                ..Default::default()
            },
            registration_date: today(),
            status: HkdStatus::Active,
        };

        let state = AppState::new(None, hkd, now());
        state
            .save(state_path)
            .with_context(|| format!("failed to initialise {}", state_path.display()))?;

        println!(
            "Created {} for {} (MST {}, group {})",
            state_path.display(),
            self.name,
            self.mst.trim(),
            group
        );
        println!();
        println!("Scheduled declarations:");
        print_table(state.declarations.iter().map(|d| ScheduledRow {
            id: d.id.clone(),
            form: d.kind.code().to_string(),
            period: d.period.to_string(),
            due: d.due_date.to_string(),
        }));
        Ok(())
    }
}
