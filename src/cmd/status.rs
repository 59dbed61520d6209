//! Status command - profile, current year position and what is due next

use crate::cmd::{format_vnd, load_state, print_json, today};
use crate::core::{AnnualSummary, Hkd, Reminder};
use chrono::Datelike;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Year to summarise (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    hkd: Option<&'a Hkd>,
    summary: AnnualSummary,
    open_declarations: usize,
    filed_on_time: usize,
    filed_late: usize,
    upcoming: Vec<Reminder>,
    subscription_active: bool,
}

impl StatusCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        let state = load_state(state_path)?;
        let today = today();
        let year = self.year.unwrap_or_else(|| today.year());

        let compliance = state.declarations.compliance();
        let filed = |on_time: bool| {
            compliance
                .iter()
                .filter(|e| e.on_time == Some(on_time))
                .count()
        };

        let report = StatusReport {
            hkd: state.hkd.as_ref(),
            summary: state.ledger.annual_summary(year),
            open_declarations: state.declarations.iter().filter(|d| d.status.is_open()).count(),
            filed_on_time: filed(true),
            filed_late: filed(false),
            upcoming: state
                .declarations
                .upcoming(today, &state.settings.notifications.reminder_days),
            subscription_active: state
                .subscription
                .as_ref()
                .is_some_and(|s| s.is_active_on(today)),
        };

        if self.json {
            return print_json(&report);
        }

        println!();
        match report.hkd {
            Some(hkd) => {
                println!("{} (MST {})", hkd.name, hkd.mst);
                println!(
                    "  Sector: {} | Group: {} | Registered: {}",
                    hkd.business_sector.code, hkd.group, hkd.registration_date
                );
            }
            None => println!("No business profile"),
        }
        println!();

        let summary = &report.summary;
        println!("YEAR {}", year);
        println!(
            "  Revenue: {} ({} transactions)",
            format_vnd(summary.total_revenue),
            summary.transaction_count
        );
        if summary.is_exempt {
            println!("  Exempt: revenue at or below 100,000,000 VND");
        } else {
            println!(
                "  VAT: {} | PIT: {}",
                format_vnd(summary.total_vat),
                format_vnd(summary.total_pit)
            );
        }
        println!();

        println!("DECLARATIONS");
        println!("  Not yet submitted: {}", report.open_declarations);
        println!(
            "  Filed on time: {} | Filed late: {}",
            report.filed_on_time, report.filed_late
        );
        for reminder in &report.upcoming {
            if reminder.overdue {
                println!(
                    "  {} {} {} overdue by {} days",
                    reminder.id,
                    reminder.kind.code(),
                    reminder.period,
                    -reminder.days_left
                );
            } else {
                println!(
                    "  {} {} {} due {} ({} days)",
                    reminder.id,
                    reminder.kind.code(),
                    reminder.period,
                    reminder.due_date,
                    reminder.days_left
                );
            }
        }
        println!();
        Ok(())
    }
}
