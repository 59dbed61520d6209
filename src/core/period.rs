use super::error::{HkdError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reporting or declaration period.
///
/// Labels: `03/2026` (month), `Q1/2026` (quarter), `2026` (year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl Period {
    pub fn month(year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;
        Ok(Period::Month { year, month })
    }

    pub fn quarter(year: i32, quarter: u32) -> Result<Self> {
        validate_quarter(quarter)?;
        Ok(Period::Quarter { year, quarter })
    }

    pub fn year(&self) -> i32 {
        match *self {
            Period::Month { year, .. } | Period::Quarter { year, .. } | Period::Year(year) => year,
        }
    }

    /// Calendar months covered by this period
    pub fn months(&self) -> Vec<u32> {
        match *self {
            Period::Month { month, .. } => vec![month],
            Period::Quarter { quarter, .. } => quarter_months(quarter).to_vec(),
            Period::Year(_) => (1..=12).collect(),
        }
    }

    /// Last calendar day of the period
    pub fn end_date(&self) -> Option<NaiveDate> {
        let year = self.year();
        let last_month = self.months().last().copied()?;
        last_day_of_month(year, last_month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && self.months().contains(&date.month())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{:02}/{}", month, year),
            Period::Quarter { year, quarter } => write!(f, "Q{}/{}", quarter, year),
            Period::Year(year) => write!(f, "{}", year),
        }
    }
}

impl FromStr for Period {
    type Err = HkdError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        let invalid = || HkdError::InvalidPeriod(s.to_string());

        match label.split_once('/') {
            None => label.parse::<i32>().map(Period::Year).map_err(|_| invalid()),
            Some((head, year)) => {
                let year = year.parse::<i32>().map_err(|_| invalid())?;
                if let Some(q) = head.strip_prefix('Q').or_else(|| head.strip_prefix('q')) {
                    let quarter = q.parse::<u32>().map_err(|_| invalid())?;
                    Period::quarter(year, quarter)
                } else {
                    let month = head.parse::<u32>().map_err(|_| invalid())?;
                    Period::month(year, month)
                }
            }
        }
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = HkdError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(HkdError::InvalidMonth(month));
    }
    Ok(())
}

pub fn validate_quarter(quarter: u32) -> Result<()> {
    if !(1..=4).contains(&quarter) {
        return Err(HkdError::InvalidQuarter(quarter));
    }
    Ok(())
}

/// The three months of a quarter; caller validates `quarter`
pub fn quarter_months(quarter: u32) -> [u32; 3] {
    let start = (quarter - 1) * 3 + 1;
    [start, start + 1, start + 2]
}

pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| HkdError::InvalidDate(s.to_string()))
}
