use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle of a billable order total.
///
/// `Cart` and `Checkout` are pre-payment states; only the reconciler moves an
/// invoice past `Pending`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Cart,
    Checkout,
    #[default]
    Pending,
    Complete,
    Refunded,
}

/// Lifecycle of a proof-of-purchase or subscription record.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    #[default]
    Active,
    Canceled,
    Refunded,
    Expired,
}

/// Sellable offer terms. Discriminants mirror the catalog's stored values.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum TermType {
    #[default]
    Perpetual = 0,
    Subscription = 10,
    MonthlySubscription = 11,
    QuarterlySubscription = 12,
    SemiAnnualSubscription = 13,
    AnnualSubscription = 14,
    OneTimeUse = 20,
}

impl TermType {
    /// Recurring terms carry a billing schedule; perpetual and one-time
    /// purchases do not.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::Perpetual | Self::OneTimeUse)
    }
}

/// Internal numeric country catalog carried on billing addresses.
/// Discriminants mirror the catalog's stored values (`581` is the default
/// United States entry).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Country {
    Canada = 121,
    Mexico = 345,
    UnitedKingdom = 578,
    #[default]
    UnitedStates = 581,
}

impl Country {
    /// Country name string in the form the gateway expects.
    pub fn gateway_name(&self) -> &'static str {
        match self {
            Self::Canada => "Canada",
            Self::Mexico => "Mexico",
            Self::UnitedKingdom => "United Kingdom",
            Self::UnitedStates => "United States",
        }
    }
}
