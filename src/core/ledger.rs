use super::calculator::check_amount;
use super::error::{HkdError, Result};
use super::period::parse_date;
use super::sector::SectorTable;
use super::transaction::{LedgerCsvRecord, NewTransaction, Transaction, TransactionPatch};
use chrono::{DateTime, Datelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Revenue ledger of one household business.
///
/// Entries are kept most-recent-first; summaries only filter by date so the
/// order has no effect on totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    next_transaction_seq: u64,
    #[serde(skip)]
    sectors: SectorTable,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn sectors(&self) -> &SectorTable {
        &self.sectors
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Transactions dated in `year`
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.date.year() == year)
    }

    /// Add a transaction, assigning a fresh id and timestamps
    pub fn add(&mut self, new: NewTransaction, now: DateTime<Utc>) -> Result<&Transaction> {
        for value in [new.amount, new.vat_amount, new.pit_amount] {
            check_amount(value)?;
        }
        let sector = self.sectors.find(&new.sector)?.code.clone();
        let id = self.next_id();

        let txn = Transaction {
            id,
            date: new.date,
            description: new.description,
            amount: new.amount,
            category: new.category,
            sector,
            vat_amount: new.vat_amount,
            pit_amount: new.pit_amount,
            attachments: new.attachments,
            created_at: now,
            updated_at: now,
        };
        log::info!(
            "Added transaction: id={} date={} amount={}",
            txn.id,
            txn.date,
            txn.amount
        );
        self.transactions.insert(0, txn);
        Ok(&self.transactions[0])
    }

    /// Merge `patch` into the transaction with `id` and refresh `updated_at`.
    ///
    /// Stored tax amounts only change if the patch carries them.
    pub fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> Result<&Transaction> {
        for value in [patch.amount, patch.vat_amount, patch.pit_amount]
            .into_iter()
            .flatten()
        {
            check_amount(value)?;
        }
        let mut patch = patch;
        if let Some(code) = patch.sector.take() {
            patch.sector = Some(self.sectors.find(&code)?.code.clone());
        }

        let txn = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| HkdError::TransactionNotFound(id.to_string()))?;
        patch.apply(txn);
        txn.updated_at = now;
        log::info!("Updated transaction: id={}", id);
        Ok(&*txn)
    }

    /// Remove the transaction with `id`, returning it
    pub fn delete(&mut self, id: &str) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| HkdError::TransactionNotFound(id.to_string()))?;
        log::info!("Deleted transaction: id={}", id);
        Ok(self.transactions.remove(index))
    }

    /// Import priced transactions from CSV (see [`LedgerCsvRecord`]).
    ///
    /// Rows are validated before any is added, so a bad row leaves the
    /// ledger untouched.
    pub fn import_csv<R: Read>(&mut self, reader: R, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();
        for (row, record) in rdr.deserialize::<LedgerCsvRecord>().enumerate() {
            let record = record?;
            let entry = self
                .price_record(&record)
                .map_err(|e| anyhow::anyhow!("row {}: {}", row + 1, e))?;
            entries.push(entry);
        }

        let count = entries.len();
        for entry in entries {
            self.add(entry, now)?;
        }
        log::info!("Imported {} transactions", count);
        Ok(count)
    }

    fn price_record(&self, record: &LedgerCsvRecord) -> Result<NewTransaction> {
        let date = parse_date(&record.date)?;
        let sector = self.sectors.find(&record.sector)?;
        let mut entry = NewTransaction::priced(date, &record.description, record.amount, sector)?;
        if let Some(category) = record.category.as_ref().filter(|c| !c.trim().is_empty()) {
            entry.category = category.clone();
        }
        Ok(entry)
    }

    fn next_id(&mut self) -> String {
        loop {
            self.next_transaction_seq += 1;
            let id = format!("txn-{:06}", self.next_transaction_seq);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::MAX_AMOUNT;
    use chrono::NaiveDate;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-15T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn later() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-16T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sale(ledger: &Ledger, date: &str, amount: i64) -> NewTransaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let retail = ledger.sectors().find("RETAIL").unwrap();
        NewTransaction::priced(date, "Bán hàng", amount, retail).unwrap()
    }

    #[test]
    fn add_assigns_id_and_timestamps() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10_000_000);
        let txn = ledger.add(entry, now()).unwrap();
        assert_eq!(txn.id, "txn-000001");
        assert_eq!(txn.created_at, now());
        assert_eq!(txn.updated_at, now());
        assert_eq!(txn.vat_amount, 100_000);
        assert_eq!(txn.pit_amount, 50_000);
    }

    #[test]
    fn add_prepends_with_unique_ids() {
        let mut ledger = Ledger::new();
        let first = sale(&ledger, "2026-01-10", 1_000);
        let second = sale(&ledger, "2026-02-10", 2_000);
        ledger.add(first, now()).unwrap();
        ledger.add(second, now()).unwrap();
        let ids: Vec<_> = ledger.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["txn-000002", "txn-000001"]);
    }

    #[test]
    fn add_skips_ids_already_taken() {
        let json = r#"{"transactions": [{
            "id": "txn-000001", "date": "2026-01-01", "amount": 5, "sector": "RETAIL",
            "vatAmount": 0, "pitAmount": 0,
            "createdAt": "2026-01-01T00:00:00Z", "updatedAt": "2026-01-01T00:00:00Z"
        }]}"#;
        let mut ledger: Ledger = serde_json::from_str(json).unwrap();
        let entry = sale(&ledger, "2026-03-15", 10);
        assert_eq!(ledger.add(entry, now()).unwrap().id, "txn-000002");
    }

    #[test]
    fn add_rejects_negative_amount_and_unknown_sector() {
        let mut ledger = Ledger::new();
        let mut entry = sale(&ledger, "2026-03-15", 10);
        entry.amount = -10;
        assert_eq!(
            ledger.add(entry, now()).unwrap_err(),
            HkdError::NegativeAmount(-10)
        );

        let mut entry = sale(&ledger, "2026-03-15", 10);
        entry.sector = "MINING".to_string();
        assert!(ledger.add(entry, now()).unwrap_err().is_invalid_argument());

        let mut entry = sale(&ledger, "2026-03-15", 10);
        entry.vat_amount = -3;
        assert_eq!(
            ledger.add(entry, now()).unwrap_err(),
            HkdError::NegativeAmount(-3)
        );

        let mut entry = sale(&ledger, "2026-03-15", 10);
        entry.pit_amount = -4;
        assert_eq!(
            ledger.add(entry, now()).unwrap_err(),
            HkdError::NegativeAmount(-4)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn update_merges_and_refreshes_timestamp() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10_000_000);
        let id = ledger.add(entry, now()).unwrap().id.clone();

        let patch = TransactionPatch {
            description: Some("corrected".to_string()),
            ..Default::default()
        };
        let txn = ledger.update(&id, patch, later()).unwrap();
        assert_eq!(txn.description, "corrected");
        assert_eq!(txn.created_at, now());
        assert_eq!(txn.updated_at, later());
    }

    #[test]
    fn update_does_not_recompute_taxes() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10_000_000);
        let id = ledger.add(entry, now()).unwrap().id.clone();

        let patch = TransactionPatch {
            amount: Some(20_000_000),
            ..Default::default()
        };
        let txn = ledger.update(&id, patch, later()).unwrap();
        assert_eq!(txn.amount, 20_000_000);
        assert_eq!(txn.vat_amount, 100_000);
    }

    #[test]
    fn update_with_repriced_patch() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10_000_000);
        let id = ledger.add(entry, now()).unwrap().id.clone();

        let current = ledger.get(&id).unwrap().clone();
        let patch = TransactionPatch {
            amount: Some(20_000_000),
            ..Default::default()
        }
        .repriced(&current, ledger.sectors())
        .unwrap();
        let txn = ledger.update(&id, patch, later()).unwrap();
        assert_eq!(txn.vat_amount, 200_000);
        assert_eq!(txn.pit_amount, 100_000);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut ledger = Ledger::new();
        let err = ledger
            .update("txn-404", TransactionPatch::default(), now())
            .unwrap_err();
        assert_eq!(err, HkdError::TransactionNotFound("txn-404".to_string()));
    }

    #[test]
    fn update_rejects_bad_values() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10);
        let id = ledger.add(entry, now()).unwrap().id.clone();

        let negative = TransactionPatch {
            amount: Some(-1),
            ..Default::default()
        };
        assert!(ledger.update(&id, negative, now()).unwrap_err().is_invalid_argument());

        let unknown = TransactionPatch {
            sector: Some("MINING".to_string()),
            ..Default::default()
        };
        assert!(ledger.update(&id, unknown, now()).unwrap_err().is_invalid_argument());

        let negative_tax = TransactionPatch {
            vat_amount: Some(-1),
            ..Default::default()
        };
        assert_eq!(
            ledger.update(&id, negative_tax, now()).unwrap_err(),
            HkdError::NegativeAmount(-1)
        );
        let negative_pit = TransactionPatch {
            pit_amount: Some(-2),
            ..Default::default()
        };
        assert_eq!(
            ledger.update(&id, negative_pit, now()).unwrap_err(),
            HkdError::NegativeAmount(-2)
        );

        let huge = TransactionPatch {
            amount: Some(MAX_AMOUNT + 1),
            ..Default::default()
        };
        assert_eq!(
            ledger.update(&id, huge, now()).unwrap_err(),
            HkdError::AmountTooLarge(MAX_AMOUNT + 1)
        );
        let txn = ledger.get(&id).unwrap();
        assert_eq!(txn.amount, 10);
        assert!(txn.vat_amount >= 0 && txn.pit_amount >= 0);
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let mut ledger = Ledger::new();
        let entry = sale(&ledger, "2026-03-15", 10);
        let id = ledger.add(entry, now()).unwrap().id.clone();

        let removed = ledger.delete(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(ledger.is_empty());
        assert!(ledger.delete(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn import_csv_prices_rows() {
        let csv = "date,amount,sector,description,category\n\
                   2026-01-05,10000000,RETAIL,Bán quần áo,\n\
                   2026-02-07,2000000,service,Dịch vụ sửa chữa,Sửa chữa\n";
        let mut ledger = Ledger::new();
        let count = ledger.import_csv(csv.as_bytes(), now()).unwrap();
        assert_eq!(count, 2);

        let repair = ledger
            .transactions()
            .iter()
            .find(|t| t.sector == "SERVICE")
            .unwrap();
        assert_eq!(repair.category, "Sửa chữa");
        assert_eq!(repair.vat_amount, 140_000);
        assert_eq!(repair.pit_amount, 70_000);
    }

    #[test]
    fn import_csv_is_all_or_nothing() {
        let csv = "date,amount,sector,description,category\n\
                   2026-01-05,10000000,RETAIL,ok,\n\
                   2026-13-01,5,RETAIL,bad date,\n";
        let mut ledger = Ledger::new();
        let err = ledger.import_csv(csv.as_bytes(), now()).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{}", err);
        assert!(ledger.is_empty());
    }
}
