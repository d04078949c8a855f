use cards::CardNumber;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

use crate::enums::Country;

/// Card data collected at checkout. The PAN is held in a validated
/// [`CardNumber`] and never persisted in full.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDetails {
    pub card_number: CardNumber,
    pub expire_month: Secret<String>,
    pub expire_year: Secret<String>,
    pub cvv_number: Secret<String>,
}

/// Supported payment instruments.
///
/// Only card payments are wired to the gateway today; the remaining variants
/// are explicit placeholders so callers get a clear "unsupported" error
/// instead of a silent fallthrough.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodData {
    CreditCard(CardDetails),
    BankAccount,
    PayPal,
    Mobile,
}

impl PaymentMethodData {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard(_) => "credit_card",
            Self::BankAccount => "bank_account",
            Self::PayPal => "paypal",
            Self::Mobile => "mobile",
        }
    }
}

/// Everything the transaction builder needs about the payer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payee_full_name: String,
    pub payee_company: Option<String>,
    pub payment_method: PaymentMethodData,
}

impl PaymentInfo {
    /// First whitespace-separated token of the payee name.
    pub fn first_name(&self) -> String {
        self.payee_full_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Everything after the first token, or the whole name when there is
    /// only one token.
    pub fn last_name(&self) -> String {
        let mut parts = self.payee_full_name.split_whitespace();
        let first = parts.next().unwrap_or_default();
        let rest = parts.collect::<Vec<_>>().join(" ");
        if rest.is_empty() {
            first.to_string()
        } else {
            rest
        }
    }
}

/// Billing address as captured on the invoice.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    pub address_1: String,
    pub address_2: Option<String>,
    pub locality: String,
    pub state: String,
    pub postal_code: String,
    pub country: Country,
}
