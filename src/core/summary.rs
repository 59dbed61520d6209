//! Monthly, quarterly and annual revenue/tax summaries.
//!
//! Summaries are derived from the ledger on every call. Exemption is decided
//! once per year from the annual revenue and applied to every month of that
//! year; when exempt, VAT/PIT totals are reported as zero but the stored
//! per-transaction amounts are left untouched.

use super::calculator::is_exempt_revenue;
use super::error::Result;
use super::ledger::Ledger;
use super::period::{quarter_months, validate_month, validate_quarter, Period};
use super::transaction::Transaction;
use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_revenue: i64,
    #[serde(rename = "totalVAT")]
    pub total_vat: i64,
    #[serde(rename = "totalPIT")]
    pub total_pit: i64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlySummary {
    pub year: i32,
    pub quarter: u32,
    pub months: [MonthlySummary; 3],
    pub total_revenue: i64,
    #[serde(rename = "totalVAT")]
    pub total_vat: i64,
    #[serde(rename = "totalPIT")]
    pub total_pit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSummary {
    pub year: i32,
    pub total_revenue: i64,
    #[serde(rename = "totalVAT")]
    pub total_vat: i64,
    #[serde(rename = "totalPIT")]
    pub total_pit: i64,
    pub transaction_count: usize,
    pub is_exempt: bool,
}

/// Revenue and tax totals of any period, as bound to a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub revenue: i64,
    pub vat: i64,
    pub pit: i64,
}

#[derive(Default)]
struct Totals {
    revenue: i64,
    vat: i64,
    pit: i64,
    count: usize,
}

impl Totals {
    fn of<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Self {
        transactions.fold(Totals::default(), |acc, t| Totals {
            revenue: acc.revenue.saturating_add(t.amount),
            vat: acc.vat.saturating_add(t.vat_amount),
            pit: acc.pit.saturating_add(t.pit_amount),
            count: acc.count + 1,
        })
    }
}

pub(crate) fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

impl Ledger {
    pub fn annual_summary(&self, year: i32) -> AnnualSummary {
        let totals = Totals::of(self.in_year(year));
        let is_exempt = is_exempt_revenue(totals.revenue);
        log::debug!(
            "Annual summary {}: revenue={} exempt={}",
            year,
            totals.revenue,
            is_exempt
        );

        AnnualSummary {
            year,
            total_revenue: totals.revenue,
            total_vat: if is_exempt { 0 } else { totals.vat },
            total_pit: if is_exempt { 0 } else { totals.pit },
            transaction_count: totals.count,
            is_exempt,
        }
    }

    pub fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        validate_month(month)?;
        let is_exempt = self.annual_summary(year).is_exempt;
        Ok(self.month_totals(year, month, is_exempt))
    }

    pub fn quarterly_summary(&self, year: i32, quarter: u32) -> Result<QuarterlySummary> {
        validate_quarter(quarter)?;
        let is_exempt = self.annual_summary(year).is_exempt;
        let months = quarter_months(quarter).map(|m| self.month_totals(year, m, is_exempt));

        Ok(QuarterlySummary {
            year,
            quarter,
            total_revenue: saturating_sum(months.iter().map(|m| m.total_revenue)),
            total_vat: saturating_sum(months.iter().map(|m| m.total_vat)),
            total_pit: saturating_sum(months.iter().map(|m| m.total_pit)),
            months,
        })
    }

    /// Totals for a declaration period
    pub fn period_totals(&self, period: Period) -> Result<PeriodTotals> {
        let totals = match period {
            Period::Month { year, month } => {
                let m = self.monthly_summary(year, month)?;
                PeriodTotals {
                    revenue: m.total_revenue,
                    vat: m.total_vat,
                    pit: m.total_pit,
                }
            }
            Period::Quarter { year, quarter } => {
                let q = self.quarterly_summary(year, quarter)?;
                PeriodTotals {
                    revenue: q.total_revenue,
                    vat: q.total_vat,
                    pit: q.total_pit,
                }
            }
            Period::Year(year) => {
                let a = self.annual_summary(year);
                PeriodTotals {
                    revenue: a.total_revenue,
                    vat: a.total_vat,
                    pit: a.total_pit,
                }
            }
        };
        Ok(totals)
    }

    fn month_totals(&self, year: i32, month: u32, is_exempt: bool) -> MonthlySummary {
        let totals = Totals::of(self.in_year(year).filter(|t| t.date.month() == month));
        MonthlySummary {
            year,
            month,
            total_revenue: totals.revenue,
            total_vat: if is_exempt { 0 } else { totals.vat },
            total_pit: if is_exempt { 0 } else { totals.pit },
            transaction_count: totals.count,
        }
    }
}
