//! VAT/PIT calculation for household businesses taxed on revenue.
//!
//! Two statutory rules apply on top of the flat sector rates:
//! - annual revenue at or below [`EXEMPTION_THRESHOLD`] is fully exempt
//! - group 2 businesses are only taxed on revenue above [`GROUP2_DEDUCTION`]

use super::error::{HkdError, Result};
use super::sector::BusinessSector;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annual revenue floor (VND) at or below which no VAT/PIT is due
pub const EXEMPTION_THRESHOLD: i64 = 100_000_000;

/// Revenue (VND) deducted before taxing a group 2 business
pub const GROUP2_DEDUCTION: i64 = 500_000_000;

/// Largest amount (VND) accepted for a single revenue, tax or invoice figure
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Longest cumulative projection, in months
pub const MAX_PROJECTION_MONTHS: u32 = 120;

/// Tax due on an amount, in VND.
///
/// `total` is rounded independently from `vat` and `pit`, so it may differ
/// from `vat + pit` by 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaxAmounts {
    pub vat: i64,
    pub pit: i64,
    pub total: i64,
}

/// How a household business computes its tax liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaxMethod {
    /// Flat rates on revenue
    #[default]
    Revenue,
    /// PIT on revenue less expenses
    Profit,
}

/// Whether a year's total revenue falls under the exemption floor
pub fn is_exempt_revenue(annual_revenue: i64) -> bool {
    annual_revenue <= EXEMPTION_THRESHOLD
}

/// Calculate VAT and PIT due on `amount` for `sector`.
///
/// `annual_revenue` is only used for the exemption check; pass 0 to skip it.
pub fn calculate_tax(
    amount: i64,
    sector: &BusinessSector,
    annual_revenue: i64,
    is_group2: bool,
) -> Result<TaxAmounts> {
    check_amount(amount)?;
    check_amount(annual_revenue)?;

    if annual_revenue > 0 && is_exempt_revenue(annual_revenue) {
        return Ok(TaxAmounts::default());
    }

    let taxable = if is_group2 {
        (amount - GROUP2_DEDUCTION).max(0)
    } else {
        amount
    };
    let taxable = Decimal::from(taxable);

    Ok(TaxAmounts {
        vat: percent_of(taxable, sector.vat_rate),
        pit: percent_of(taxable, sector.pit_rate),
        total: percent_of(taxable, sector.total_rate()),
    })
}

/// Taxes stored on a ledger entry when it is written: full amount, no
/// exemption check and no group deduction.
pub fn entry_taxes(amount: i64, sector: &BusinessSector) -> Result<TaxAmounts> {
    calculate_tax(amount, sector, 0, false)
}

/// PIT under the profit method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitTax {
    pub revenue: i64,
    pub expenses: i64,
    pub profit: i64,
    /// Percentage applied to profit
    pub pit_rate: Decimal,
    pub pit: i64,
}

/// PIT rate (percent) on profit, tiered by annual revenue
pub fn profit_pit_rate(revenue: i64) -> Decimal {
    match revenue {
        r if r > 50_000_000_000 => dec!(20),
        r if r > 3_000_000_000 => dec!(17),
        _ => dec!(15),
    }
}

pub fn calculate_profit_tax(revenue: i64, expenses: i64) -> Result<ProfitTax> {
    check_amount(revenue)?;
    check_amount(expenses)?;

    let profit = revenue - expenses;
    let pit_rate = profit_pit_rate(revenue);
    let pit = percent_of(Decimal::from(profit), pit_rate).max(0);

    Ok(ProfitTax {
        revenue,
        expenses,
        profit,
        pit_rate,
        pit,
    })
}

/// Side-by-side liability under both methods for a group 2 business
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodComparison {
    pub revenue_method: TaxAmounts,
    pub profit_method: ProfitTax,
    pub recommended: TaxMethod,
}

pub fn compare_methods(
    revenue: i64,
    expenses: i64,
    sector: &BusinessSector,
) -> Result<MethodComparison> {
    let revenue_method = calculate_tax(revenue, sector, 0, true)?;
    let profit_method = calculate_profit_tax(revenue, expenses)?;
    let recommended = if revenue_method.total < profit_method.pit {
        TaxMethod::Revenue
    } else {
        TaxMethod::Profit
    };

    Ok(MethodComparison {
        revenue_method,
        profit_method,
        recommended,
    })
}

/// One month of a cumulative revenue projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub cumulative_revenue: i64,
    pub tax: i64,
}

/// Project tax on cumulative revenue, with the group 2 deduction applied.
pub fn project_cumulative(
    monthly_revenue: i64,
    sector: &BusinessSector,
    months: u32,
) -> Result<Vec<ProjectionPoint>> {
    check_amount(monthly_revenue)?;
    if months > MAX_PROJECTION_MONTHS {
        return Err(HkdError::ProjectionTooLong(months));
    }

    let mut points = Vec::with_capacity(months as usize);
    let mut cumulative = 0i64;
    for month in 1..=months {
        cumulative = cumulative.saturating_add(monthly_revenue);
        let tax = calculate_tax(cumulative, sector, 0, true)?;
        points.push(ProjectionPoint {
            month,
            cumulative_revenue: cumulative,
            tax: tax.total,
        });
    }
    Ok(points)
}

/// Amounts must lie in `0..=MAX_AMOUNT`
pub(crate) fn check_amount(amount: i64) -> Result<()> {
    if amount < 0 {
        return Err(HkdError::NegativeAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(HkdError::AmountTooLarge(amount));
    }
    Ok(())
}

/// `base × rate / 100`, rounded to whole VND
fn percent_of(base: Decimal, rate: Decimal) -> i64 {
    let value = (base * rate / dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    value.to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
