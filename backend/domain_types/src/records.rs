use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::{
    date_time,
    enums::{InvoiceStatus, ReceiptStatus, TermType},
    payment_method_data::BillingAddress,
};

/// A billable order total owned by a customer profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub uuid: Uuid,
    pub profile_id: i64,
    pub status: InvoiceStatus,
    pub currency: String,
    pub total: Decimal,
    pub order_items: Vec<OrderItem>,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

impl Invoice {
    pub fn new(profile_id: i64, currency: &str, order_items: Vec<OrderItem>) -> Self {
        let now = date_time::now();
        let total = order_items.iter().map(OrderItem::subtotal).sum();
        Self {
            id: 0,
            uuid: Uuid::new_v4(),
            profile_id,
            status: InvoiceStatus::Pending,
            currency: currency.to_string(),
            total,
            order_items,
            created: now,
            updated: now,
        }
    }
}

/// A single purchasable line on an invoice.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub offer_id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// One gateway transaction attempt against an invoice.
///
/// `success` and `transaction` are set together from a single reconciled
/// gateway response; the record is otherwise immutable once saved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub uuid: Uuid,
    pub invoice_id: i64,
    pub amount: Decimal,
    pub provider: String,
    pub transaction: Option<String>,
    pub success: bool,
    pub payee_full_name: String,
    pub payee_company: Option<String>,
    pub billing_address: Option<BillingAddress>,
    /// Audit copy of the gateway response, bulk sub-objects stripped.
    pub result: Value,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

/// Proof of purchase or of one subscription cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub uuid: Uuid,
    pub profile_id: i64,
    pub order_item_id: Option<i64>,
    pub transaction: Option<String>,
    pub status: ReceiptStatus,
    /// Arbitrary gateway metadata, e.g. the gateway subscription id.
    pub meta: Value,
    pub start_date: Option<PrimitiveDateTime>,
    pub end_date: Option<PrimitiveDateTime>,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

impl Receipt {
    pub fn new(profile_id: i64, order_item_id: Option<i64>, transaction: Option<String>) -> Self {
        let now = date_time::now();
        Self {
            id: 0,
            uuid: Uuid::new_v4(),
            profile_id,
            order_item_id,
            transaction,
            status: ReceiptStatus::Active,
            meta: Value::Object(serde_json::Map::new()),
            start_date: Some(now),
            end_date: None,
            created: now,
            updated: now,
        }
    }

    pub fn set_meta(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.meta {
            map.insert(key.to_string(), value);
        }
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(Value::as_str)
    }
}

/// A recurring purchase of an offer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub uuid: Uuid,
    pub profile_id: i64,
    pub offer_id: i64,
    pub name: String,
    pub total: Decimal,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

/// Pricing-term metadata on an offer, consumed to build the gateway's
/// recurring billing schedule.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TermDetails {
    pub payment_occurrences: Option<u32>,
    pub period_length: Option<u32>,
    pub trial_occurrences: Option<u32>,
}

/// A sellable product term, one-time or recurring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub terms: TermType,
    pub term_details: TermDetails,
}

/// Owner of invoices and receipts; referenced by id everywhere else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: i64,
    pub uuid: Uuid,
    pub user_id: i64,
    pub currency: String,
}
