//! Account, business and subscription records kept alongside the ledger.

use super::calculator::TaxMethod;
use super::error::{HkdError, Result};
use super::sector::BusinessSector;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Statutory revenue group (1-4) of a household business
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HkdGroup(u8);

impl HkdGroup {
    pub fn new(group: u8) -> Result<Self> {
        if !(1..=4).contains(&group) {
            return Err(HkdError::InvalidGroup(group));
        }
        Ok(HkdGroup(group))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Group 2 businesses are taxed only on revenue above the deduction
    pub fn is_group2(self) -> bool {
        self.0 == 2
    }
}

impl TryFrom<u8> for HkdGroup {
    type Error = HkdError;

    fn try_from(value: u8) -> Result<Self> {
        HkdGroup::new(value)
    }
}

impl From<HkdGroup> for u8 {
    fn from(group: HkdGroup) -> Self {
        group.0
    }
}

impl fmt::Display for HkdGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HkdStatus {
    #[default]
    Active,
    Suspended,
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub name: String,
    /// Citizen identity card number
    pub cccd: String,
    pub phone: String,
}

/// Household business (hộ kinh doanh) profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hkd {
    pub id: String,
    /// 10-digit tax code
    pub mst: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub province: String,
    pub business_sector: BusinessSector,
    #[schemars(with = "u8")]
    pub group: HkdGroup,
    #[serde(default)]
    pub representative: Representative,
    pub registration_date: NaiveDate,
    #[serde(default)]
    pub status: HkdStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountStatus {
    #[default]
    Active,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
    pub balance: i64,
    pub linked_at: DateTime<Utc>,
    #[serde(default)]
    pub status: BankAccountStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    /// Days before a due date to send reminders
    pub reminder_days: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub notifications: NotificationSettings,
    pub tax_method: TaxMethod,
    /// Monthly family deduction in VND
    pub family_deduction: i64,
    pub two_factor_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            notifications: NotificationSettings {
                email: true,
                sms: true,
                push: true,
                reminder_days: vec![30, 10, 1],
            },
            tax_method: TaxMethod::Revenue,
            family_deduction: 15_500_000,
            two_factor_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Basic,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: Plan,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub price: i64,
    pub status: SubscriptionStatus,
}

impl Subscription {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active
            && date >= self.start_date
            && self.end_date.is_none_or(|end| date <= end)
    }
}
