use super::calculator::entry_taxes;
use super::error::Result;
use super::sector::{BusinessSector, SectorTable};
use chrono::{DateTime, NaiveDate, Utc};
use hkdtax_derive::CsvSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A revenue entry in the ledger.
///
/// `vat_amount` and `pit_amount` are computed when the entry is written and
/// stored as-is; later changes to sector rates or exemption status do not
/// alter them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    /// Revenue in VND
    pub amount: i64,
    #[serde(default)]
    pub category: String,
    /// Business sector code used to price the entry
    pub sector: String,
    pub vat_amount: i64,
    pub pit_amount: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A transaction before the ledger assigns its id and timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    pub category: String,
    pub sector: String,
    pub vat_amount: i64,
    pub pit_amount: i64,
    pub attachments: Vec<String>,
}

impl NewTransaction {
    /// Build an entry priced at the sector's rates on the full amount
    pub fn priced(
        date: NaiveDate,
        description: &str,
        amount: i64,
        sector: &BusinessSector,
    ) -> Result<Self> {
        let tax = entry_taxes(amount, sector)?;
        Ok(NewTransaction {
            date,
            description: description.to_string(),
            amount,
            category: sector.name_vi.clone(),
            sector: sector.code.clone(),
            vat_amount: tax.vat,
            pit_amount: tax.pit,
            attachments: Vec::new(),
        })
    }
}

/// Partial update merged into an existing transaction.
///
/// Tax fields are not recomputed by the ledger: use [`TransactionPatch::repriced`]
/// when the amount or sector changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub category: Option<String>,
    pub sector: Option<String>,
    pub vat_amount: Option<i64>,
    pub pit_amount: Option<i64>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    fn changes_pricing(&self) -> bool {
        self.amount.is_some() || self.sector.is_some()
    }

    /// Fill in `vat_amount`/`pit_amount` from the amount and sector the
    /// transaction will have once this patch is applied.
    pub fn repriced(mut self, current: &Transaction, sectors: &SectorTable) -> Result<Self> {
        if !self.changes_pricing() {
            return Ok(self);
        }
        let amount = self.amount.unwrap_or(current.amount);
        let sector = sectors.find(self.sector.as_deref().unwrap_or(&current.sector))?;
        let tax = entry_taxes(amount, sector)?;

        self.sector = Some(sector.code.clone());
        if self.category.is_none() && self.sector.as_deref() != Some(current.sector.as_str()) {
            self.category = Some(sector.name_vi.clone());
        }
        self.vat_amount = Some(tax.vat);
        self.pit_amount = Some(tax.pit);
        Ok(self)
    }

    pub(crate) fn apply(self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(description) = self.description {
            txn.description = description;
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(category) = self.category {
            txn.category = category;
        }
        if let Some(sector) = self.sector {
            txn.sector = sector;
        }
        if let Some(vat) = self.vat_amount {
            txn.vat_amount = vat;
        }
        if let Some(pit) = self.pit_amount {
            txn.pit_amount = pit;
        }
    }
}

/// Column description for a CSV import format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One row of a ledger CSV import
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct LedgerCsvRecord {
    /// Transaction date (YYYY-MM-DD)
    pub date: String,
    /// Revenue in VND
    pub amount: i64,
    /// Business sector code (e.g. RETAIL, SERVICE)
    pub sector: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Category label, defaults to the sector's name
    pub category: Option<String>,
}
