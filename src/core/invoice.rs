use super::calculator::check_amount;
use super::error::Result;
use super::ledger::Ledger;
use super::summary::saturating_sum;
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Valid,
    Cancelled,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    Sale,
    Purchase,
}

/// An e-invoice issued or received by the business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub seller: String,
    pub buyer: String,
    pub amount: i64,
    pub vat: i64,
    pub total: i64,
    pub status: InvoiceStatus,
    #[serde(rename = "type")]
    pub kind: InvoiceKind,
    /// T-VAN provider that transmitted the invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvan_provider: Option<String>,
}

/// An invoice before it is given an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub date: NaiveDate,
    pub seller: String,
    pub buyer: String,
    pub amount: i64,
    pub vat: i64,
    pub status: InvoiceStatus,
    pub kind: InvoiceKind,
    pub tvan_provider: Option<String>,
}

/// Record an invoice with the next free `inv-NNN` id. `total` is amount plus VAT.
pub fn add_invoice(invoices: &mut Vec<Invoice>, new: NewInvoice) -> Result<&Invoice> {
    for value in [new.amount, new.vat] {
        check_amount(value)?;
    }
    let mut seq = invoices.len() + 1;
    let id = loop {
        let candidate = format!("inv-{seq:03}");
        if !invoices.iter().any(|i| i.id == candidate) {
            break candidate;
        }
        seq += 1;
    };
    log::info!("Added invoice: id={} number={}", id, new.invoice_number);
    invoices.push(Invoice {
        id,
        invoice_number: new.invoice_number,
        date: new.date,
        seller: new.seller,
        buyer: new.buyer,
        amount: new.amount,
        vat: new.vat,
        total: new.amount.saturating_add(new.vat),
        status: new.status,
        kind: new.kind,
        tvan_provider: new.tvan_provider,
    });
    Ok(&invoices[invoices.len() - 1])
}

/// Ledger revenue compared with sale invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub year: Option<i32>,
    pub ledger_total: i64,
    pub sales_total: i64,
    pub purchases_total: i64,
    /// `ledger_total - sales_total`
    pub difference: i64,
    /// Percentage of ledger revenue covered by sale invoices
    pub match_rate: u32,
    pub sale_invoice_count: usize,
}

/// Compare ledger revenue against invoice totals, optionally for one year.
/// Cancelled invoices are not counted.
pub fn reconcile(ledger: &Ledger, invoices: &[Invoice], year: Option<i32>) -> Reconciliation {
    let in_scope = |date: NaiveDate| year.is_none_or(|y| date.year() == y);

    let ledger_total = saturating_sum(
        ledger
            .transactions()
            .iter()
            .filter(|t| in_scope(t.date))
            .map(|t| t.amount),
    );

    let counted: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.status != InvoiceStatus::Cancelled && in_scope(i.date))
        .collect();
    let sales: Vec<&Invoice> = counted
        .iter()
        .copied()
        .filter(|i| i.kind == InvoiceKind::Sale)
        .collect();
    let sales_total = saturating_sum(sales.iter().map(|i| i.total));
    let purchases_total = saturating_sum(
        counted
            .iter()
            .filter(|i| i.kind == InvoiceKind::Purchase)
            .map(|i| i.total),
    );

    Reconciliation {
        year,
        ledger_total,
        sales_total,
        purchases_total,
        difference: ledger_total.saturating_sub(sales_total),
        match_rate: match_rate(sales_total, ledger_total),
        sale_invoice_count: sales.len(),
    }
}

fn match_rate(invoiced: i64, ledger_total: i64) -> u32 {
    if ledger_total <= 0 {
        return 0;
    }
    let covered = Decimal::from(invoiced.min(ledger_total).max(0));
    (covered * Decimal::ONE_HUNDRED / Decimal::from(ledger_total))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::MAX_AMOUNT;
    use crate::core::error::HkdError;
    use crate::core::transaction::NewTransaction;
    use chrono::{DateTime, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn invoice(n: u32, day: &str, total: i64, kind: InvoiceKind, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: format!("inv-{n:03}"),
            invoice_number: format!("AA/26E-{n:07}"),
            date: date(day),
            seller: "Cửa Hàng Tạp Hóa".to_string(),
            buyer: "Khách lẻ".to_string(),
            amount: total,
            vat: 0,
            total,
            status,
            kind,
            tvan_provider: None,
        }
    }

    fn ledger(sales: &[(&str, i64)]) -> Ledger {
        let now: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut ledger = Ledger::new();
        for (day, amount) in sales {
            let retail = ledger.sectors().find("RETAIL").unwrap();
            let entry = NewTransaction::priced(date(day), "", *amount, retail).unwrap();
            ledger.add(entry, now).unwrap();
        }
        ledger
    }

    fn new_invoice(amount: i64, vat: i64) -> NewInvoice {
        NewInvoice {
            invoice_number: "AA/26E-0000001".to_string(),
            date: date("2026-01-10"),
            seller: "Cửa Hàng Tạp Hóa".to_string(),
            buyer: "Khách lẻ".to_string(),
            amount,
            vat,
            status: InvoiceStatus::Valid,
            kind: InvoiceKind::Sale,
            tvan_provider: Some("VNPT".to_string()),
        }
    }

    #[test]
    fn add_invoice_assigns_id_and_total() {
        let mut invoices = vec![invoice(
            2,
            "2026-01-01",
            1_000,
            InvoiceKind::Sale,
            InvoiceStatus::Valid,
        )];
        let added = add_invoice(&mut invoices, new_invoice(1_000_000, 10_000)).unwrap();
        assert_eq!(added.id, "inv-003");
        assert_eq!(added.total, 1_010_000);

        let next = add_invoice(&mut invoices, new_invoice(5, 0)).unwrap();
        assert_eq!(next.id, "inv-004");
        assert_eq!(invoices.len(), 3);
    }

    #[test]
    fn add_invoice_rejects_negative_amounts() {
        let mut invoices = Vec::new();
        assert_eq!(
            add_invoice(&mut invoices, new_invoice(-1, 0)),
            Err(HkdError::NegativeAmount(-1))
        );
        assert_eq!(
            add_invoice(&mut invoices, new_invoice(10, -2)),
            Err(HkdError::NegativeAmount(-2))
        );
        assert_eq!(
            add_invoice(&mut invoices, new_invoice(MAX_AMOUNT + 1, 0)),
            Err(HkdError::AmountTooLarge(MAX_AMOUNT + 1))
        );
        assert!(invoices.is_empty());
    }

    #[test]
    fn reconcile_sales_against_ledger() {
        let ledger = ledger(&[("2026-01-10", 30_000_000), ("2026-02-10", 10_000_000)]);
        let invoices = vec![
            invoice(1, "2026-01-10", 25_000_000, InvoiceKind::Sale, InvoiceStatus::Valid),
            invoice(2, "2026-01-12", 5_000_000, InvoiceKind::Purchase, InvoiceStatus::Valid),
            invoice(3, "2026-02-10", 9_000_000, InvoiceKind::Sale, InvoiceStatus::Cancelled),
        ];

        let rec = reconcile(&ledger, &invoices, None);
        assert_eq!(rec.ledger_total, 40_000_000);
        assert_eq!(rec.sales_total, 25_000_000);
        assert_eq!(rec.purchases_total, 5_000_000);
        assert_eq!(rec.difference, 15_000_000);
        assert_eq!(rec.match_rate, 63); // 62.5
        assert_eq!(rec.sale_invoice_count, 1);
    }

    #[test]
    fn match_rate_caps_at_full_coverage() {
        let ledger = ledger(&[("2026-01-10", 10_000_000)]);
        let invoices = vec![invoice(
            1,
            "2026-01-10",
            12_000_000,
            InvoiceKind::Sale,
            InvoiceStatus::Valid,
        )];
        let rec = reconcile(&ledger, &invoices, None);
        assert_eq!(rec.match_rate, 100);
        assert_eq!(rec.difference, -2_000_000);
    }

    #[test]
    fn empty_ledger_has_zero_match_rate() {
        let invoices = vec![invoice(
            1,
            "2026-01-10",
            1_000,
            InvoiceKind::Sale,
            InvoiceStatus::Pending,
        )];
        let rec = reconcile(&Ledger::new(), &invoices, None);
        assert_eq!(rec.match_rate, 0);
        assert_eq!(rec.sales_total, 1_000);
    }

    #[test]
    fn year_filter_applies_to_both_sides() {
        let ledger = ledger(&[("2025-12-31", 5_000_000), ("2026-01-01", 8_000_000)]);
        let invoices = vec![
            invoice(1, "2025-12-31", 5_000_000, InvoiceKind::Sale, InvoiceStatus::Valid),
            invoice(2, "2026-01-01", 4_000_000, InvoiceKind::Sale, InvoiceStatus::Valid),
        ];
        let rec = reconcile(&ledger, &invoices, Some(2026));
        assert_eq!(rec.ledger_total, 8_000_000);
        assert_eq!(rec.sales_total, 4_000_000);
        assert_eq!(rec.match_rate, 50);
    }
}
