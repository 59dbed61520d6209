//! Invoices command - record e-invoices and reconcile them against the ledger

use crate::cmd::{date_arg, format_vnd, load_state, print_json, print_table, update_state};
use crate::core::{add_invoice, reconcile, Invoice, InvoiceKind, InvoiceStatus, NewInvoice};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct InvoicesCommand {
    #[command(subcommand)]
    action: InvoiceAction,
}

#[derive(Subcommand, Debug)]
enum InvoiceAction {
    /// Record an invoice
    Add {
        /// Invoice number, e.g. AA/26E-0000123
        #[arg(short, long)]
        number: String,

        #[arg(short, long, value_parser = date_arg)]
        date: NaiveDate,

        #[arg(long)]
        seller: String,

        #[arg(long)]
        buyer: String,

        /// Amount before VAT, in VND
        #[arg(short, long)]
        amount: i64,

        #[arg(long, default_value_t = 0)]
        vat: i64,

        #[arg(short = 't', long = "type", value_enum, default_value_t = KindArg::Sale)]
        kind: KindArg,

        #[arg(short, long, value_enum, default_value_t = StatusArg::Valid)]
        status: StatusArg,

        /// T-VAN provider that transmitted the invoice
        #[arg(long)]
        tvan: Option<String>,
    },
    /// List invoices
    List {
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON instead of formatted table
        #[arg(long)]
        json: bool,
    },
    /// Compare sale invoices with ledger revenue
    Reconcile {
        /// Limit to one calendar year
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum KindArg {
    #[default]
    Sale,
    Purchase,
}

impl From<KindArg> for InvoiceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Sale => InvoiceKind::Sale,
            KindArg::Purchase => InvoiceKind::Purchase,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum StatusArg {
    #[default]
    Valid,
    Cancelled,
    Pending,
}

impl From<StatusArg> for InvoiceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Valid => InvoiceStatus::Valid,
            StatusArg::Cancelled => InvoiceStatus::Cancelled,
            StatusArg::Pending => InvoiceStatus::Pending,
        }
    }
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Buyer")]
    buyer: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(i: &Invoice) -> Self {
        InvoiceRow {
            id: i.id.clone(),
            number: i.invoice_number.clone(),
            date: i.date.to_string(),
            kind: match i.kind {
                InvoiceKind::Sale => "sale",
                InvoiceKind::Purchase => "purchase",
            }
            .to_string(),
            status: match i.status {
                InvoiceStatus::Valid => "valid",
                InvoiceStatus::Cancelled => "cancelled",
                InvoiceStatus::Pending => "pending",
            }
            .to_string(),
            buyer: i.buyer.clone(),
            total: format_vnd(i.total),
        }
    }
}

impl InvoicesCommand {
    pub fn exec(&self, state_path: &Path) -> anyhow::Result<()> {
        match &self.action {
            InvoiceAction::Add {
                number,
                date,
                seller,
                buyer,
                amount,
                vat,
                kind,
                status,
                tvan,
            } => {
                let new = NewInvoice {
                    invoice_number: number.clone(),
                    date: *date,
                    seller: seller.clone(),
                    buyer: buyer.clone(),
                    amount: *amount,
                    vat: *vat,
                    status: (*status).into(),
                    kind: (*kind).into(),
                    tvan_provider: tvan.clone(),
                };
                let id = update_state(state_path, |state| {
                    Ok(add_invoice(&mut state.invoices, new)?.id.clone())
                })?;
                println!("Added {id}");
                Ok(())
            }
            InvoiceAction::List { year, json } => {
                let state = load_state(state_path)?;
                let rows: Vec<&Invoice> = state
                    .invoices
                    .iter()
                    .filter(|i| year.is_none_or(|y| i.date.year() == y))
                    .collect();
                if *json {
                    return print_json(&rows);
                }
                if rows.is_empty() {
                    println!("No invoices.");
                    return Ok(());
                }
                print_table(rows.into_iter().map(InvoiceRow::from));
                Ok(())
            }
            InvoiceAction::Reconcile { year, json } => {
                let state = load_state(state_path)?;
                let rec = reconcile(&state.ledger, &state.invoices, *year);
                if *json {
                    return print_json(&rec);
                }
                let scope = year.map_or("All Years".to_string(), |y| y.to_string());
                println!();
                println!("INVOICE RECONCILIATION ({scope})");
                println!();
                println!("  Ledger revenue: {}", format_vnd(rec.ledger_total));
                println!(
                    "  Sale invoices: {} ({} invoices)",
                    format_vnd(rec.sales_total),
                    rec.sale_invoice_count
                );
                println!("  Purchase invoices: {}", format_vnd(rec.purchases_total));
                println!(
                    "  Difference: {} | Match rate: {}%",
                    format_vnd(rec.difference),
                    rec.match_rate
                );
                println!();
                Ok(())
            }
        }
    }
}
