//! Ledger command - add, update, delete, list and import transactions

use crate::cmd::{date_arg, format_vnd, load_state, now, print_json, print_table, update_state};
use crate::core::{NewTransaction, Transaction, TransactionPatch};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct LedgerCommand {
    #[command(subcommand)]
    action: LedgerAction,
}

#[derive(Subcommand, Debug)]
enum LedgerAction {
    /// Record a revenue transaction
    Add {
        /// Transaction date (YYYY-MM-DD)
        #[arg(short, long, value_parser = date_arg)]
        date: NaiveDate,

        /// Revenue in VND
        #[arg(short, long)]
        amount: i64,

        /// Sector code. Defaults to the business's registered sector.
        #[arg(short, long)]
        sector: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Category label. Defaults to the sector's Vietnamese name.
        #[arg(long)]
        category: Option<String>,

        /// Attachment file name (repeatable)
        #[arg(long = "attachment")]
        attachments: Vec<String>,
    },
    /// Edit fields of an existing transaction
    Update {
        id: String,

        #[arg(short, long, value_parser = date_arg)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        amount: Option<i64>,

        #[arg(short, long)]
        sector: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Keep the stored VAT/PIT instead of repricing on amount or sector changes
        #[arg(long)]
        keep_taxes: bool,
    },
    /// Remove a transaction
    Delete { id: String },
    /// List transactions, most recent first
    List {
        #[arg(short, long)]
        year: Option<i32>,

        /// Month (1-12) within --year
        #[arg(short, long, requires = "year")]
        month: Option<u32>,

        /// Output as JSON instead of formatted table
        #[arg(long)]
        json: bool,
    },
    /// Import transactions from CSV (see `hkdtax schema csv-fields`)
    Import {
        /// CSV file, or "-" for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "PIT")]
    pit: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        TransactionRow {
            id: txn.id.clone(),
            date: txn.date.to_string(),
            sector: txn.sector.clone(),
            amount: format_vnd(txn.amount),
            vat: format_vnd(txn.vat_amount),
            pit: format_vnd(txn.pit_amount),
            description: txn.description.clone(),
        }
    }
}

impl LedgerCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        match &self.action {
            LedgerAction::Add {
                date,
                amount,
                sector,
                description,
                category,
                attachments,
            } => {
                let id = update_state(state_path, |state| {
                    let code = match sector {
                        Some(code) => code.clone(),
                        None => state
                            .business_sector()
                            .map(|s| s.code.clone())
                            .context("No sector given and no business profile to default from")?,
                    };
                    let sector = state.ledger.sectors().find(&code)?.clone();
                    let mut entry = NewTransaction::priced(*date, description, *amount, &sector)?;
                    if let Some(category) = category {
                        entry.category = category.clone();
                    }
                    entry.attachments = attachments.clone();
                    Ok(state.ledger.add(entry, now())?.id.clone())
                })?;
                println!("Added {id}");
                Ok(())
            }
            LedgerAction::Update {
                id,
                date,
                amount,
                sector,
                description,
                category,
                keep_taxes,
            } => {
                let patch = TransactionPatch {
                    date: *date,
                    description: description.clone(),
                    amount: *amount,
                    category: category.clone(),
                    sector: sector.clone(),
                    ..Default::default()
                };
                if patch.is_empty() {
                    anyhow::bail!("Nothing to update for {id}");
                }
                update_state(state_path, |state| {
                    let patch = match state.ledger.get(id) {
                        Some(current) if !keep_taxes => {
                            patch.repriced(current, state.ledger.sectors())?
                        }
                        _ => patch,
                    };
                    state.ledger.update(id, patch, now())?;
                    Ok(())
                })?;
                println!("Updated {id}");
                Ok(())
            }
            LedgerAction::Delete { id } => {
                update_state(state_path, |state| Ok(state.ledger.delete(id).map(|_| ())?))?;
                println!("Deleted {id}");
                Ok(())
            }
            LedgerAction::List { year, month, json } => {
                let state = load_state(state_path)?;
                let rows: Vec<&Transaction> = state
                    .ledger
                    .transactions()
                    .iter()
                    .filter(|t| year.is_none_or(|y| t.date.year() == y))
                    .filter(|t| month.is_none_or(|m| t.date.month() == m))
                    .collect();
                if *json {
                    return print_json(&rows);
                }
                if rows.is_empty() {
                    println!("No transactions.");
                    return Ok(());
                }
                print_table(rows.into_iter().map(TransactionRow::from));
                Ok(())
            }
            LedgerAction::Import { file } => {
                let count = update_state(state_path, |state| {
                    if file.as_os_str() == "-" {
                        state.ledger.import_csv(io::stdin().lock(), now())
                    } else {
                        let reader = File::open(file)
                            .with_context(|| format!("failed to open {}", file.display()))?;
                        state
                            .ledger
                            .import_csv(BufReader::new(reader), now())
                            .with_context(|| format!("failed to import {}", file.display()))
                    }
                })?;
                println!("Imported {count} transactions");
                Ok(())
            }
        }
    }
}
