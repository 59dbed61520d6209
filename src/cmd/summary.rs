//! Summary command - monthly, quarterly and annual totals from the ledger

use crate::cmd::{format_vnd, load_state, print_json, print_table, today};
use crate::core::{AnnualSummary, Ledger, MonthlySummary};
use chrono::Datelike;
use clap::Args;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Calendar year (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Month (1-12)
    #[arg(short, long, conflicts_with = "quarter")]
    month: Option<u32>,

    /// Quarter (1-4)
    #[arg(short, long)]
    quarter: Option<u32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Transactions")]
    count: usize,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "PIT")]
    pit: String,
}

impl From<&MonthlySummary> for MonthRow {
    fn from(m: &MonthlySummary) -> Self {
        MonthRow {
            month: format!("{:02}/{}", m.month, m.year),
            count: m.transaction_count,
            revenue: format_vnd(m.total_revenue),
            vat: format_vnd(m.total_vat),
            pit: format_vnd(m.total_pit),
        }
    }
}

/// Annual summary with its month-by-month breakdown, for JSON output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnualReport {
    #[serde(flatten)]
    summary: AnnualSummary,
    months: Vec<MonthlySummary>,
}

impl SummaryCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        let state = load_state(state_path)?;
        let ledger = &state.ledger;
        let year = self.year.unwrap_or_else(|| today().year());

        match (self.month, self.quarter) {
            (Some(month), _) => self.print_month(ledger, year, month),
            (None, Some(quarter)) => self.print_quarter(ledger, year, quarter),
            (None, None) => self.print_year(ledger, year),
        }
    }

    fn print_month(&self, ledger: &Ledger, year: i32, month: u32) -> anyhow::Result<()> {
        let summary = ledger.monthly_summary(year, month)?;
        if self.json {
            return print_json(&summary);
        }
        println!();
        println!("MONTHLY SUMMARY ({:02}/{})", month, year);
        println!();
        print_table([MonthRow::from(&summary)]);
        Ok(())
    }

    fn print_quarter(&self, ledger: &Ledger, year: i32, quarter: u32) -> anyhow::Result<()> {
        let summary = ledger.quarterly_summary(year, quarter)?;
        if self.json {
            return print_json(&summary);
        }
        println!();
        println!("QUARTERLY SUMMARY (Q{}/{})", quarter, year);
        println!();
        print_table(summary.months.iter().map(MonthRow::from));
        println!(
            "  Total: revenue {} | VAT {} | PIT {} | tax {}",
            format_vnd(summary.total_revenue),
            format_vnd(summary.total_vat),
            format_vnd(summary.total_pit),
            format_vnd(summary.total_vat + summary.total_pit)
        );
        println!();
        Ok(())
    }

    fn print_year(&self, ledger: &Ledger, year: i32) -> anyhow::Result<()> {
        let summary = ledger.annual_summary(year);
        let months = (1..=12)
            .map(|m| ledger.monthly_summary(year, m))
            .collect::<Result<Vec<_>, _>>()?;

        if self.json {
            return print_json(&AnnualReport { summary, months });
        }

        println!();
        println!("ANNUAL SUMMARY ({})", year);
        println!();
        print_table(months.iter().map(MonthRow::from));
        println!(
            "  Transactions: {} | Revenue: {}",
            summary.transaction_count,
            format_vnd(summary.total_revenue)
        );
        if summary.is_exempt {
            println!("  Exempt: annual revenue is at or below 100,000,000 VND, no VAT or PIT due");
        } else {
            println!(
                "  VAT: {} | PIT: {} | Total tax: {}",
                format_vnd(summary.total_vat),
                format_vnd(summary.total_pit),
                format_vnd(summary.total_vat + summary.total_pit)
            );
        }
        println!();
        Ok(())
    }
}
