pub mod calc;
pub mod declarations;
pub mod init;
pub mod invoices;
pub mod ledger;
pub mod schema;
pub mod sectors;
pub mod status;
pub mod summary;

use crate::core::{parse_date, AppState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Load the state file, pointing at `init` when it does not exist yet
pub fn load_state(path: &Path) -> anyhow::Result<AppState> {
    if !path.exists() {
        anyhow::bail!(
            "State file {} not found. Run `hkdtax init` first.",
            path.display()
        );
    }
    AppState::load(path)
}

/// Load, apply `f`, and save the state back only when `f` succeeds
pub fn update_state<T>(
    path: &Path,
    f: impl FnOnce(&mut AppState) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let mut state = load_state(path)?;
    let out = f(&mut state)?;
    state.save(path)?;
    Ok(out)
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// clap value parser for `YYYY-MM-DD` dates
pub fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Format VND with thousands separators, e.g. `1,500,000`
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
