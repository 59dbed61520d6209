use super::declaration::DeclarationBook;
use super::invoice::Invoice;
use super::ledger::Ledger;
use super::profile::{BankAccount, Hkd, Subscription, User, UserSettings};
use super::sector::BusinessSector;
use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Everything persisted for one session: profile, ledger, declarations,
/// invoices, bank accounts, settings and subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub hkd: Option<Hkd>,
    #[serde(flatten)]
    pub ledger: Ledger,
    #[serde(flatten)]
    pub declarations: DeclarationBook,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

impl AppState {
    /// A signed-in session for `hkd` with this year's filings scheduled
    pub fn new(user: Option<User>, hkd: Hkd, now: DateTime<Utc>) -> Self {
        let mut state = AppState {
            is_authenticated: true,
            user,
            hkd: Some(hkd),
            ..Default::default()
        };
        state.declarations.schedule(now.year(), now);
        state
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open state file {}", path.display()))?;
        read_state_json(BufReader::new(file))
            .with_context(|| format!("failed to read state file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create state file {}", path.display()))?;
        write_state_json(BufWriter::new(file), self)
            .with_context(|| format!("failed to write state file {}", path.display()))
    }

    pub fn is_group2(&self) -> bool {
        self.hkd.as_ref().is_some_and(|h| h.group.is_group2())
    }

    /// The registered sector of the business, if a profile exists
    pub fn business_sector(&self) -> Option<&BusinessSector> {
        self.hkd.as_ref().map(|h| &h.business_sector)
    }
}

/// Read state from JSON
pub fn read_state_json<R: Read>(reader: R) -> anyhow::Result<AppState> {
    let state: AppState = serde_json::from_reader(reader)?;
    log::debug!(
        "Loaded state: {} transactions, {} declarations",
        state.ledger.len(),
        state.declarations.len()
    );
    Ok(state)
}

/// Write state as pretty-printed JSON
pub fn write_state_json<W: Write>(mut writer: W, state: &AppState) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, state)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
