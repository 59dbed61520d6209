//! Declarations command - filing schedule, drafts, submission and outcomes

use crate::cmd::{format_vnd, load_state, now, print_json, print_table, today, update_state};
use crate::core::{DeclarationStatus, FilingOutcome, Reminder, TaxDeclaration};
use chrono::Datelike;
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct DeclarationsCommand {
    #[command(subcommand)]
    action: DeclarationAction,
}

#[derive(Subcommand, Debug)]
enum DeclarationAction {
    /// List declarations
    List {
        /// Only declarations for periods in this year
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Output as JSON instead of formatted table
        #[arg(long)]
        json: bool,
    },
    /// Create pending declarations for every deadline of a year
    Schedule {
        /// Defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Save a pending declaration as a draft
    Draft { id: String },
    /// Submit a declaration with the ledger totals of its period
    Submit { id: String },
    /// Record that the tax authority accepted a submitted declaration
    Confirm { id: String },
    /// Record that the tax authority rejected a submitted declaration
    Reject { id: String },
    /// Unsubmitted declarations that are due soon or overdue
    Upcoming {
        /// Reminder window in days (repeatable). Defaults to the saved settings.
        #[arg(short, long = "days")]
        days: Vec<u32>,

        /// Output as JSON instead of formatted table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Pending,
    Submitted,
    Confirmed,
    Rejected,
}

impl From<StatusArg> for DeclarationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => DeclarationStatus::Draft,
            StatusArg::Pending => DeclarationStatus::Pending,
            StatusArg::Submitted => DeclarationStatus::Submitted,
            StatusArg::Confirmed => DeclarationStatus::Confirmed,
            StatusArg::Rejected => DeclarationStatus::Rejected,
        }
    }
}

#[derive(Tabled)]
struct DeclarationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Form")]
    form: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "PIT")]
    pit: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "On Time")]
    on_time: String,
}

impl From<&TaxDeclaration> for DeclarationRow {
    fn from(d: &TaxDeclaration) -> Self {
        DeclarationRow {
            id: d.id.clone(),
            form: d.kind.code().to_string(),
            period: d.period.to_string(),
            due: d.due_date.to_string(),
            status: d.status.to_string(),
            revenue: format_vnd(d.revenue),
            vat: format_vnd(d.vat_payable),
            pit: format_vnd(d.pit_payable),
            reference: d.gdt_reference_number.clone().unwrap_or_default(),
            on_time: match d.is_on_time() {
                Some(true) => "yes".to_string(),
                Some(false) => "late".to_string(),
                None => String::new(),
            },
        }
    }
}

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Form")]
    form: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Days Left")]
    days_left: String,
}

impl From<&Reminder> for ReminderRow {
    fn from(r: &Reminder) -> Self {
        ReminderRow {
            id: r.id.clone(),
            form: r.kind.code().to_string(),
            period: r.period.clone(),
            due: r.due_date.to_string(),
            days_left: if r.overdue {
                format!("overdue {}", -r.days_left)
            } else {
                r.days_left.to_string()
            },
        }
    }
}

impl DeclarationsCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        match &self.action {
            DeclarationAction::List { year, status, json } => {
                let state = load_state(state_path)?;
                let status = status.map(DeclarationStatus::from);
                let rows: Vec<&TaxDeclaration> = state
                    .declarations
                    .iter()
                    .filter(|d| year.is_none_or(|y| d.period.year() == y))
                    .filter(|d| status.is_none_or(|s| d.status == s))
                    .collect();
                if *json {
                    return print_json(&rows);
                }
                if rows.is_empty() {
                    println!("No declarations.");
                    return Ok(());
                }
                print_table(rows.into_iter().map(DeclarationRow::from));
                Ok(())
            }
            DeclarationAction::Schedule { year } => {
                let year = year.unwrap_or_else(|| today().year());
                let created = update_state(state_path, |state| {
                    Ok(state.declarations.schedule(year, now()))
                })?;
                if created.is_empty() {
                    println!("All {year} declarations are already scheduled");
                } else {
                    println!(
                        "Scheduled {} declarations for {year}: {}",
                        created.len(),
                        created.join(", ")
                    );
                }
                Ok(())
            }
            DeclarationAction::Draft { id } => {
                update_state(state_path, |state| {
                    state.declarations.save_draft(id, now())?;
                    Ok(())
                })?;
                println!("Saved {id} as draft");
                Ok(())
            }
            DeclarationAction::Submit { id } => {
                let row = update_state(state_path, |state| {
                    let decl = state.declarations.submit(id, &state.ledger, now())?;
                    Ok(DeclarationRow::from(decl))
                })?;
                println!("Submitted {id} with reference {}", row.reference);
                print_table([row]);
                Ok(())
            }
            DeclarationAction::Confirm { id } => {
                self.record(state_path, id, FilingOutcome::Confirmed)
            }
            DeclarationAction::Reject { id } => {
                self.record(state_path, id, FilingOutcome::Rejected)
            }
            DeclarationAction::Upcoming { days, json } => {
                let state = load_state(state_path)?;
                let days = if days.is_empty() {
                    &state.settings.notifications.reminder_days
                } else {
                    days
                };
                let reminders = state.declarations.upcoming(today(), days);
                if *json {
                    return print_json(&reminders);
                }
                if reminders.is_empty() {
                    println!("Nothing due.");
                    return Ok(());
                }
                print_table(reminders.iter().map(ReminderRow::from));
                Ok(())
            }
        }
    }

    fn record(&self, state_path: &Path, id: &str, outcome: FilingOutcome) -> anyhow::Result<()> {
        let status = update_state(state_path, |state| {
            Ok(state.declarations.record_outcome(id, outcome, now())?.status)
        })?;
        println!("Declaration {id} is now {status}");
        Ok(())
    }
}
