//! Calc command - VAT/PIT on an amount, a year of ledger revenue, or a
//! comparison of the revenue and profit methods

use crate::cmd::{format_vnd, load_state, print_json, print_table};
use crate::core::{
    calculate_tax, compare_methods, is_exempt_revenue, project_cumulative, AppState,
    BusinessSector, HkdGroup, SectorTable, TaxMethod,
};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Revenue in VND (monthly revenue when used with --project)
    #[arg(
        short,
        long,
        required_unless_present = "from_ledger",
        conflicts_with = "from_ledger"
    )]
    amount: Option<i64>,

    /// Sector code. Defaults to the sector of the initialised business.
    #[arg(short, long)]
    sector: Option<String>,

    /// Annual revenue for the exemption check (0 skips the check)
    #[arg(long, default_value_t = 0)]
    annual_revenue: i64,

    /// Revenue group (1-4). Defaults to the group of the initialised business.
    #[arg(short, long)]
    group: Option<u8>,

    /// Tax a full year of ledger revenue instead of --amount
    #[arg(long, value_name = "YEAR")]
    from_ledger: Option<i32>,

    /// Annual expenses; compares the revenue and profit methods
    #[arg(long, requires = "amount", conflicts_with = "project")]
    expenses: Option<i64>,

    /// Project tax on cumulative monthly revenue over this many months
    #[arg(long, value_name = "MONTHS", requires = "amount")]
    project: Option<u32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalcResult {
    sector: String,
    amount: i64,
    annual_revenue: i64,
    is_group2: bool,
    is_exempt: bool,
    vat: i64,
    pit: i64,
    total: i64,
}

#[derive(Tabled)]
struct ProjectionRow {
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Cumulative Revenue")]
    revenue: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl CalcCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        let wants_profile = self.sector.is_none() || self.group.is_none();
        let state = if self.from_ledger.is_some() || (wants_profile && state_path.exists()) {
            Some(load_state(state_path)?)
        } else {
            None
        };

        let table = SectorTable::default();
        let sector = self.resolve_sector(&table, state.as_ref())?;
        let is_group2 = match self.group {
            Some(group) => HkdGroup::new(group)?.is_group2(),
            None => state.as_ref().is_some_and(AppState::is_group2),
        };

        if let (Some(monthly), Some(months)) = (self.amount, self.project) {
            return self.print_projection(monthly, &sector, months);
        }
        if let (Some(revenue), Some(expenses)) = (self.amount, self.expenses) {
            return self.print_comparison(revenue, expenses, &sector);
        }

        let (amount, annual_revenue) = match (self.from_ledger, state.as_ref()) {
            (Some(year), Some(state)) => {
                let annual = state.ledger.annual_summary(year);
                (annual.total_revenue, annual.total_revenue)
            }
            _ => (self.amount.unwrap_or_default(), self.annual_revenue),
        };

        let tax = calculate_tax(amount, &sector, annual_revenue, is_group2)?;
        let result = CalcResult {
            sector: sector.code.clone(),
            amount,
            annual_revenue,
            is_group2,
            is_exempt: annual_revenue > 0 && is_exempt_revenue(annual_revenue),
            vat: tax.vat,
            pit: tax.pit,
            total: tax.total,
        };

        if self.json {
            return print_json(&result);
        }

        println!();
        match self.from_ledger {
            Some(year) => println!("TAX ON LEDGER REVENUE ({year})"),
            None => println!("TAX CALCULATION"),
        }
        println!();
        println!(
            "  Sector: {} ({}) | VAT {}% | PIT {}%",
            sector.name,
            sector.code,
            sector.vat_rate.normalize(),
            sector.pit_rate.normalize()
        );
        println!("  Revenue: {} VND", format_vnd(result.amount));
        if result.is_group2 {
            println!("  Group 2: first 500,000,000 VND deducted");
        }
        if result.is_exempt {
            println!(
                "  Exempt: annual revenue {} VND is at or below 100,000,000 VND",
                format_vnd(annual_revenue)
            );
        }
        println!(
            "  VAT: {} | PIT: {} | Total: {}",
            format_vnd(result.vat),
            format_vnd(result.pit),
            format_vnd(result.total)
        );
        println!();
        Ok(())
    }

    fn resolve_sector(
        &self,
        table: &SectorTable,
        state: Option<&AppState>,
    ) -> anyhow::Result<BusinessSector> {
        if let Some(code) = &self.sector {
            return Ok(table.find(code)?.clone());
        }
        match state.and_then(AppState::business_sector) {
            Some(sector) => Ok(sector.clone()),
            None => anyhow::bail!("No sector given. Pass --sector or run `hkdtax init` first."),
        }
    }

    fn print_comparison(
        &self,
        revenue: i64,
        expenses: i64,
        sector: &BusinessSector,
    ) -> anyhow::Result<()> {
        let comparison = compare_methods(revenue, expenses, sector)?;
        if self.json {
            return print_json(&comparison);
        }

        let recommended = match comparison.recommended {
            TaxMethod::Revenue => "revenue",
            TaxMethod::Profit => "profit",
        };
        println!();
        println!("METHOD COMPARISON ({})", sector.code);
        println!();
        println!(
            "  Revenue method: VAT {} + PIT {} = {}",
            format_vnd(comparison.revenue_method.vat),
            format_vnd(comparison.revenue_method.pit),
            format_vnd(comparison.revenue_method.total)
        );
        println!(
            "  Profit method: profit {} @ {}% = {}",
            format_vnd(comparison.profit_method.profit),
            comparison.profit_method.pit_rate.normalize(),
            format_vnd(comparison.profit_method.pit)
        );
        println!("  Recommended: {recommended} method");
        println!();
        Ok(())
    }

    fn print_projection(
        &self,
        monthly: i64,
        sector: &BusinessSector,
        months: u32,
    ) -> anyhow::Result<()> {
        let points = project_cumulative(monthly, sector, months)?;
        if self.json {
            return print_json(&points);
        }
        print_table(points.iter().map(|p| ProjectionRow {
            month: p.month,
            revenue: format_vnd(p.cumulative_revenue),
            tax: format_vnd(p.tax),
        }));
        Ok(())
    }
}
