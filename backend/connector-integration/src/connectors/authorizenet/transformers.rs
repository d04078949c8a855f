use domain_types::{
    payment_method_data::{BillingAddress, CardDetails, PaymentInfo, PaymentMethodData},
    records::{Invoice, Offer, OrderItem, Payment, Subscription},
    CustomResult, ProcessorError,
};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use time::{macros::format_description, PrimitiveDateTime};

use crate::{
    configs::MerchantConfig,
    types::{ReconciledTransaction, TransactionMessage},
};

type Error = error_stack::Report<ProcessorError>;

pub const MSG_NULL_RESPONSE: &str = "Null Response";
pub const MSG_FAILED_TRANSACTION: &str = "Failed Transaction";
pub const MSG_PAYMENT_COMPLETE: &str = "Payment Complete";

/// Expiry placeholder transmitted on refunds; the real expiry is never
/// retained after the initial authorization.
pub const MASKED_EXPIRATION: &str = "XXXX";

/// Field maxima from the gateway's published schema. Inputs are truncated,
/// never rejected, to stay inside them.
pub(crate) mod limits {
    pub(crate) const FIRST_NAME: usize = 50;
    pub(crate) const LAST_NAME: usize = 50;
    pub(crate) const COMPANY: usize = 50;
    pub(crate) const ADDRESS: usize = 60;
    pub(crate) const CITY: usize = 40;
    pub(crate) const STATE: usize = 40;
    pub(crate) const ZIP: usize = 20;
    pub(crate) const ITEM_ID: usize = 31;
    pub(crate) const ITEM_NAME: usize = 30;
    pub(crate) const ITEM_DESCRIPTION: usize = 250;
    pub(crate) const REF_ID: usize = 20;
}

/// Occurrence sentinel the gateway documents for schedules without an end.
const UNBOUNDED_OCCURRENCES: u32 = 9999;

pub(crate) fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Truncate toward zero to two decimal places. Rounding to nearest could
/// charge a cent more than the invoice total; truncation never can.
pub fn to_valid_decimal(amount: Decimal) -> Decimal {
    amount.trunc_with_scale(2)
}

pub(crate) fn amount_string(amount: Decimal) -> String {
    format!("{:.2}", to_valid_decimal(amount))
}

// ------------------------------------------------------------------
// Request payloads
// ------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAuthentication {
    name: Secret<String>,
    transaction_key: Secret<String>,
}

impl TryFrom<&MerchantConfig> for MerchantAuthentication {
    type Error = Error;

    fn try_from(config: &MerchantConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            name: config.api_login_id.clone(),
            transaction_key: config.transaction_key.clone(),
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    card_number: cards::CardNumber,
    /// `MM-YYYY`
    expiration_date: Secret<String>,
    card_code: Option<Secret<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentDetails {
    CreditCard(CreditCardDetails),
}

/// Refunds reference the settled transaction with the last four digits only;
/// the full PAN is never available at refund time.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefundCardDetails {
    pub card_number: String,
    pub expiration_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentDetails {
    pub credit_card: RefundCardDetails,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub enum TransactionType {
    #[serde(rename = "authOnlyTransaction")]
    AuthOnlyTransaction,
    #[serde(rename = "authCaptureTransaction")]
    AuthCaptureTransaction,
    #[serde(rename = "voidTransaction")]
    VoidTransaction,
    #[serde(rename = "refundTransaction")]
    RefundTransaction,
}

impl TransactionType {
    /// Default transaction type from merchant configuration; anything other
    /// than an explicit auth-only setting means authorize-and-capture.
    pub fn from_config(config: &MerchantConfig) -> Self {
        match config.transaction_type.as_str() {
            "authOnlyTransaction" => Self::AuthOnlyTransaction,
            _ => Self::AuthCaptureTransaction,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    pub first_name: Option<Secret<String>>,
    pub last_name: Option<Secret<String>>,
    pub company: Option<String>,
    pub address: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    pub country: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItems {
    pub line_item: Vec<LineItem>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureTransaction {
    transaction_type: TransactionType,
    amount: String,
    currency_code: Option<String>,
    payment: PaymentDetails,
    line_items: Option<LineItems>,
    bill_to: Option<BillTo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundTransaction {
    transaction_type: TransactionType,
    amount: String,
    payment: RefundPaymentDetails,
    #[serde(rename = "refTransId")]
    ref_trans_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidTransaction {
    transaction_type: TransactionType,
    #[serde(rename = "refTransId")]
    ref_trans_id: String,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest<T: Serialize> {
    merchant_authentication: MerchantAuthentication,
    ref_id: Option<String>,
    transaction_request: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequestWrapper<T: Serialize> {
    create_transaction_request: CreateTransactionRequest<T>,
}

// ------------------------------------------------------------------
// Recurring billing (ARB) payloads
// ------------------------------------------------------------------

/// The gateway also accepts day-based intervals; every term in the catalog
/// bills in months, so only that unit is wired.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Months,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScheduleInterval {
    pub length: u32,
    pub unit: IntervalUnit,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSchedule {
    pub interval: PaymentScheduleInterval,
    /// `YYYY-MM-DD`
    pub start_date: String,
    pub total_occurrences: u32,
    pub trial_occurrences: u32,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbSubscription {
    name: Option<String>,
    payment_schedule: Option<PaymentSchedule>,
    amount: Option<String>,
    payment: Option<PaymentDetails>,
    bill_to: Option<BillTo>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbCreateSubscription {
    merchant_authentication: MerchantAuthentication,
    ref_id: Option<String>,
    subscription: ArbSubscription,
}

#[derive(Debug, Serialize)]
pub struct ArbCreateSubscriptionRequest {
    #[serde(rename = "ARBCreateSubscriptionRequest")]
    arb_create_subscription_request: ArbCreateSubscription,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbUpdateSubscription {
    merchant_authentication: MerchantAuthentication,
    subscription_id: String,
    subscription: ArbSubscription,
}

#[derive(Debug, Serialize)]
pub struct ArbUpdateSubscriptionRequest {
    #[serde(rename = "ARBUpdateSubscriptionRequest")]
    arb_update_subscription_request: ArbUpdateSubscription,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbCancelSubscription {
    merchant_authentication: MerchantAuthentication,
    subscription_id: String,
}

#[derive(Debug, Serialize)]
pub struct ArbCancelSubscriptionRequest {
    #[serde(rename = "ARBCancelSubscriptionRequest")]
    arb_cancel_subscription_request: ArbCancelSubscription,
}

// ------------------------------------------------------------------
// Reporting payloads
// ------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledBatchListDetails {
    merchant_authentication: MerchantAuthentication,
    first_settlement_date: String,
    last_settlement_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSettledBatchListRequest {
    get_settled_batch_list_request: SettledBatchListDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListDetails {
    merchant_authentication: MerchantAuthentication,
    batch_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionListRequest {
    get_transaction_list_request: TransactionListDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsQuery {
    merchant_authentication: MerchantAuthentication,
    #[serde(rename = "transId")]
    transaction_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionDetailsRequest {
    get_transaction_details_request: TransactionDetailsQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListDetails {
    merchant_authentication: MerchantAuthentication,
    search_type: String,
}

#[derive(Debug, Serialize)]
pub struct ArbGetSubscriptionListRequest {
    #[serde(rename = "ARBGetSubscriptionListRequest")]
    arb_get_subscription_list_request: SubscriptionListDetails,
}

// ------------------------------------------------------------------
// Builders
// ------------------------------------------------------------------

/// Gateway credit-card payload from the collected card data. Expiry is
/// composed `MM-YYYY`.
pub fn build_credit_card_payment(card: &CardDetails) -> CustomResult<PaymentDetails, ProcessorError> {
    let month = card.expire_month.peek().trim();
    let year = card.expire_year.peek().trim();
    let cvv = card.cvv_number.peek().trim();
    if month.is_empty() {
        return Err(report!(ProcessorError::ValidationError {
            field_name: "expire_month",
        }));
    }
    if year.is_empty() {
        return Err(report!(ProcessorError::ValidationError {
            field_name: "expire_year",
        }));
    }
    if cvv.is_empty() {
        return Err(report!(ProcessorError::ValidationError {
            field_name: "cvv_number",
        }));
    }
    Ok(PaymentDetails::CreditCard(CreditCardDetails {
        card_number: card.card_number.clone(),
        expiration_date: Secret::new(format!("{month}-{year}")),
        card_code: Some(Secret::new(cvv.to_string())),
    }))
}

/// Variant dispatch over the payment instrument. Only card payments reach
/// the gateway today.
pub fn build_payment(method: &PaymentMethodData) -> CustomResult<PaymentDetails, ProcessorError> {
    match method {
        PaymentMethodData::CreditCard(card) => build_credit_card_payment(card),
        PaymentMethodData::BankAccount => Err(report!(ProcessorError::NotImplemented {
            payment_method: "bank_account",
        })),
        PaymentMethodData::PayPal => Err(report!(ProcessorError::NotImplemented {
            payment_method: "paypal",
        })),
        PaymentMethodData::Mobile => Err(report!(ProcessorError::NotImplemented {
            payment_method: "mobile",
        })),
    }
}

/// Gateway address payload; every field is truncated to the gateway's
/// documented maximum, never rejected for length.
pub fn build_billing_address(info: &PaymentInfo, address: &BillingAddress) -> BillTo {
    let street = match &address.address_2 {
        Some(address_2) if !address_2.is_empty() => {
            format!("{} {}", address.address_1, address_2)
        }
        _ => address.address_1.clone(),
    };
    BillTo {
        first_name: Some(Secret::new(truncate(&info.first_name(), limits::FIRST_NAME))),
        last_name: Some(Secret::new(truncate(&info.last_name(), limits::LAST_NAME))),
        company: info
            .payee_company
            .as_deref()
            .map(|company| truncate(company, limits::COMPANY)),
        address: Some(Secret::new(truncate(&street, limits::ADDRESS))),
        city: Some(truncate(&address.locality, limits::CITY)),
        state: Some(Secret::new(truncate(&address.state, limits::STATE))),
        zip: Some(Secret::new(truncate(&address.postal_code, limits::ZIP))),
        country: Some(address.country.gateway_name().to_string()),
    }
}

/// Ordered line-item payloads, source order preserved.
pub fn build_line_items(order_items: &[OrderItem]) -> LineItems {
    LineItems {
        line_item: order_items
            .iter()
            .map(|item| LineItem {
                item_id: truncate(&item.sku, limits::ITEM_ID),
                name: truncate(&item.name, limits::ITEM_NAME),
                description: item
                    .description
                    .as_deref()
                    .map(|description| truncate(description, limits::ITEM_DESCRIPTION)),
                quantity: item.quantity,
                unit_price: amount_string(item.price),
            })
            .collect(),
    }
}

/// Recurring billing schedule from the offer's term.
///
/// Fixed terms bill one full period at a time; a generic subscription term
/// reads its cadence from the offer's term details.
pub fn build_payment_schedule(
    offer: &Offer,
    start: PrimitiveDateTime,
) -> CustomResult<PaymentSchedule, ProcessorError> {
    use domain_types::enums::TermType;

    let (length, total_occurrences) = match offer.terms {
        TermType::MonthlySubscription => (1, 1),
        TermType::QuarterlySubscription => (4, 1),
        TermType::SemiAnnualSubscription => (6, 1),
        TermType::AnnualSubscription => (12, 1),
        TermType::Subscription => {
            let length = offer.term_details.period_length.ok_or_else(|| {
                report!(ProcessorError::MissingRequiredField {
                    field_name: "term_details.period_length",
                })
            })?;
            let occurrences = offer
                .term_details
                .payment_occurrences
                .unwrap_or(UNBOUNDED_OCCURRENCES);
            (length, occurrences)
        }
        TermType::Perpetual | TermType::OneTimeUse => {
            return Err(report!(ProcessorError::ValidationError {
                field_name: "terms",
            }))
        }
    };

    let date_format = format_description!("[year]-[month]-[day]");
    let start_date = start
        .format(&date_format)
        .map_err(|_| report!(ProcessorError::RequestEncodingFailed))?;

    Ok(PaymentSchedule {
        interval: PaymentScheduleInterval {
            length,
            unit: IntervalUnit::Months,
        },
        start_date,
        total_occurrences,
        trial_occurrences: offer.term_details.trial_occurrences.unwrap_or(0),
    })
}

fn build_ref_id(config: &MerchantConfig, profile_id: i64, invoice_id: i64) -> String {
    truncate(
        &format!("{profile_id}-{}-{invoice_id}", config.site_id),
        limits::REF_ID,
    )
}

/// Authorize-and-capture request for the invoice total plus line items and
/// billing address.
pub fn capture_request(
    config: &MerchantConfig,
    invoice: &Invoice,
    info: &PaymentInfo,
    billing: &BillingAddress,
) -> CustomResult<CreateTransactionRequestWrapper<CaptureTransaction>, ProcessorError> {
    let merchant_authentication = MerchantAuthentication::try_from(config)?;
    let payment = build_payment(&info.payment_method)?;

    Ok(CreateTransactionRequestWrapper {
        create_transaction_request: CreateTransactionRequest {
            merchant_authentication,
            ref_id: Some(build_ref_id(config, invoice.profile_id, invoice.id)),
            transaction_request: CaptureTransaction {
                transaction_type: TransactionType::from_config(config),
                amount: amount_string(invoice.total),
                currency_code: Some(invoice.currency.to_uppercase()),
                payment,
                line_items: (!invoice.order_items.is_empty())
                    .then(|| build_line_items(&invoice.order_items)),
                bill_to: Some(build_billing_address(info, billing)),
            },
        },
    })
}

/// Last four digits of the account number the gateway echoed back on the
/// original transaction, with a placeholder expiry.
pub fn masked_refund_card(payment: &Payment) -> CustomResult<RefundCardDetails, ProcessorError> {
    let account_number = payment
        .result
        .get("accountNumber")
        .or_else(|| {
            payment
                .result
                .get("transactionResponse")
                .and_then(|t| t.get("accountNumber"))
        })
        .and_then(Value::as_str)
        .ok_or_else(|| {
            report!(ProcessorError::MissingRequiredField {
                field_name: "accountNumber",
            })
        })?;
    let last4 = account_number
        .chars()
        .skip(account_number.chars().count().saturating_sub(4))
        .collect::<String>();
    Ok(RefundCardDetails {
        card_number: last4,
        expiration_date: MASKED_EXPIRATION.to_string(),
    })
}

pub fn refund_request(
    config: &MerchantConfig,
    payment: &Payment,
) -> CustomResult<CreateTransactionRequestWrapper<RefundTransaction>, ProcessorError> {
    let merchant_authentication = MerchantAuthentication::try_from(config)?;
    let transaction_id = payment.transaction.clone().ok_or_else(|| {
        report!(ProcessorError::MissingRequiredField {
            field_name: "transaction",
        })
    })?;

    Ok(CreateTransactionRequestWrapper {
        create_transaction_request: CreateTransactionRequest {
            merchant_authentication,
            ref_id: Some(build_ref_id(config, payment.id, payment.invoice_id)),
            transaction_request: RefundTransaction {
                transaction_type: TransactionType::RefundTransaction,
                amount: amount_string(payment.amount),
                payment: RefundPaymentDetails {
                    credit_card: masked_refund_card(payment)?,
                },
                ref_trans_id: transaction_id,
            },
        },
    })
}

pub fn void_request(
    config: &MerchantConfig,
    transaction_id: &str,
) -> CustomResult<CreateTransactionRequestWrapper<VoidTransaction>, ProcessorError> {
    Ok(CreateTransactionRequestWrapper {
        create_transaction_request: CreateTransactionRequest {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            ref_id: None,
            transaction_request: VoidTransaction {
                transaction_type: TransactionType::VoidTransaction,
                ref_trans_id: transaction_id.to_string(),
            },
        },
    })
}

pub fn create_subscription_request(
    config: &MerchantConfig,
    subscription: &Subscription,
    offer: &Offer,
    info: &PaymentInfo,
    billing: &BillingAddress,
    start: PrimitiveDateTime,
) -> CustomResult<ArbCreateSubscriptionRequest, ProcessorError> {
    let merchant_authentication = MerchantAuthentication::try_from(config)?;
    let payment = build_payment(&info.payment_method)?;
    let schedule = build_payment_schedule(offer, start)?;

    Ok(ArbCreateSubscriptionRequest {
        arb_create_subscription_request: ArbCreateSubscription {
            merchant_authentication,
            ref_id: Some(build_ref_id(
                config,
                subscription.profile_id,
                subscription.id,
            )),
            subscription: ArbSubscription {
                name: Some(subscription.name.clone()),
                payment_schedule: Some(schedule),
                amount: Some(amount_string(subscription.total)),
                payment: Some(payment),
                bill_to: Some(build_billing_address(info, billing)),
            },
        },
    })
}

/// Rebuilds only the payment method on an existing gateway subscription.
pub fn update_subscription_request(
    config: &MerchantConfig,
    subscription_id: &str,
    info: &PaymentInfo,
) -> CustomResult<ArbUpdateSubscriptionRequest, ProcessorError> {
    let merchant_authentication = MerchantAuthentication::try_from(config)?;
    let payment = build_payment(&info.payment_method)?;

    Ok(ArbUpdateSubscriptionRequest {
        arb_update_subscription_request: ArbUpdateSubscription {
            merchant_authentication,
            subscription_id: subscription_id.to_string(),
            subscription: ArbSubscription {
                name: None,
                payment_schedule: None,
                amount: None,
                payment: Some(payment),
                bill_to: None,
            },
        },
    })
}

pub fn cancel_subscription_request(
    config: &MerchantConfig,
    subscription_id: &str,
) -> CustomResult<ArbCancelSubscriptionRequest, ProcessorError> {
    Ok(ArbCancelSubscriptionRequest {
        arb_cancel_subscription_request: ArbCancelSubscription {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            subscription_id: subscription_id.to_string(),
        },
    })
}

pub(crate) fn format_gateway_datetime(
    value: PrimitiveDateTime,
) -> CustomResult<String, ProcessorError> {
    let date_format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    value
        .format(&date_format)
        .map_err(|_| report!(ProcessorError::RequestEncodingFailed))
}

pub fn settled_batch_list_request(
    config: &MerchantConfig,
    first_settlement_date: PrimitiveDateTime,
    last_settlement_date: PrimitiveDateTime,
) -> CustomResult<GetSettledBatchListRequest, ProcessorError> {
    Ok(GetSettledBatchListRequest {
        get_settled_batch_list_request: SettledBatchListDetails {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            first_settlement_date: format_gateway_datetime(first_settlement_date)?,
            last_settlement_date: format_gateway_datetime(last_settlement_date)?,
        },
    })
}

pub fn transaction_list_request(
    config: &MerchantConfig,
    batch_id: &str,
) -> CustomResult<GetTransactionListRequest, ProcessorError> {
    Ok(GetTransactionListRequest {
        get_transaction_list_request: TransactionListDetails {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            batch_id: batch_id.to_string(),
        },
    })
}

pub fn transaction_details_request(
    config: &MerchantConfig,
    transaction_id: &str,
) -> CustomResult<GetTransactionDetailsRequest, ProcessorError> {
    Ok(GetTransactionDetailsRequest {
        get_transaction_details_request: TransactionDetailsQuery {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            transaction_id: transaction_id.to_string(),
        },
    })
}

pub fn subscription_list_request(
    config: &MerchantConfig,
) -> CustomResult<ArbGetSubscriptionListRequest, ProcessorError> {
    Ok(ArbGetSubscriptionListRequest {
        arb_get_subscription_list_request: SubscriptionListDetails {
            merchant_authentication: MerchantAuthentication::try_from(config)?,
            search_type: "subscriptionActive".to_string(),
        },
    })
}

// ------------------------------------------------------------------
// Response payloads
// ------------------------------------------------------------------

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub code: String,
    pub text: String,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ResultCode {
    #[default]
    Ok,
    Error,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessages {
    pub result_code: ResultCode,
    #[serde(default)]
    pub message: Vec<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedMessage {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub error_code: String,
    pub error_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTransactionResponse {
    pub response_code: Option<String>,
    #[serde(rename = "transId")]
    pub transaction_id: Option<String>,
    pub account_number: Option<String>,
    pub messages: Option<Vec<NestedMessage>>,
    pub errors: Option<Vec<ErrorMessage>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponse {
    pub transaction_response: Option<GatewayTransactionResponse>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subscription_id: Option<String>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetails {
    pub batch_id: String,
    pub settlement_time_utc: Option<String>,
    pub settlement_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSettledBatchListResponse {
    pub batch_list: Option<Vec<BatchDetails>>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    #[serde(rename = "transId")]
    pub transaction_id: String,
    pub submit_time_utc: Option<String>,
    pub transaction_status: Option<String>,
    pub account_number: Option<String>,
    pub settle_amount: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionListResponse {
    pub transactions: Option<Vec<TransactionSummary>>,
    pub total_num_in_result_set: Option<i64>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    #[serde(rename = "transId")]
    pub transaction_id: String,
    pub transaction_type: Option<String>,
    pub transaction_status: Option<String>,
    pub response_code: Option<i64>,
    pub auth_amount: Option<f64>,
    pub settle_amount: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionDetailsResponse {
    pub transaction: Option<TransactionDetail>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub id: i64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub create_time_stamp_utc: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbGetSubscriptionListResponse {
    pub subscription_details: Option<Vec<SubscriptionSummary>>,
    pub total_num_in_result_set: Option<i64>,
    pub messages: ResponseMessages,
}

// ------------------------------------------------------------------
// Reconciliation
// ------------------------------------------------------------------

/// Deterministic interpretation of one transaction response.
///
/// Branches, in order: absent response; top-level Error; Ok without a nested
/// message block; Ok with a nested message block. Only the last one counts
/// as submitted.
pub fn reconcile_transaction(
    response: Option<&CreateTransactionResponse>,
) -> ReconciledTransaction {
    let Some(response) = response else {
        return ReconciledTransaction::not_submitted(MSG_NULL_RESPONSE);
    };

    let mut message = TransactionMessage::default();

    match response.messages.result_code {
        ResultCode::Error => {
            match response
                .transaction_response
                .as_ref()
                .and_then(|t| t.errors.as_ref())
                .and_then(|errors| errors.first())
            {
                Some(error) => {
                    message.error_code = Some(error.error_code.clone());
                    message.error_text = Some(error.error_text.clone());
                }
                None => {
                    if let Some(top) = response.messages.message.first() {
                        message.code = Some(top.code.clone());
                        message.message = Some(top.text.clone());
                    }
                }
            }
            ReconciledTransaction {
                submitted: false,
                message,
            }
        }
        ResultCode::Ok => {
            let nested = response.transaction_response.as_ref();
            match nested.and_then(|t| t.messages.as_ref()).and_then(|m| m.first()) {
                Some(approved) => {
                    message.msg = MSG_PAYMENT_COMPLETE.to_string();
                    message.trans_id =
                        nested.and_then(|t| t.transaction_id.clone());
                    message.response_code =
                        nested.and_then(|t| t.response_code.clone());
                    message.code = Some(approved.code.clone());
                    message.message = Some(approved.description.clone());
                    ReconciledTransaction {
                        submitted: true,
                        message,
                    }
                }
                None => {
                    message.msg = MSG_FAILED_TRANSACTION.to_string();
                    if let Some(error) = nested
                        .and_then(|t| t.errors.as_ref())
                        .and_then(|errors| errors.first())
                    {
                        message.error_code = Some(error.error_code.clone());
                        message.error_text = Some(error.error_text.clone());
                    }
                    ReconciledTransaction {
                        submitted: false,
                        message,
                    }
                }
            }
        }
    }
}

/// Two-branch variant for subscription responses; the top-level message
/// code/text is always captured.
pub fn reconcile_subscription(response: Option<&SubscriptionResponse>) -> ReconciledTransaction {
    let Some(response) = response else {
        return ReconciledTransaction::not_submitted(MSG_NULL_RESPONSE);
    };

    let mut message = TransactionMessage::default();
    if let Some(top) = response.messages.message.first() {
        message.code = Some(top.code.clone());
        message.message = Some(top.text.clone());
    }

    match response.messages.result_code {
        ResultCode::Ok => {
            message.subscription_id = response.subscription_id.clone();
            ReconciledTransaction {
                submitted: true,
                message,
            }
        }
        ResultCode::Error => ReconciledTransaction {
            submitted: false,
            message,
        },
    }
}

/// Audit copy of the raw gateway response with the bulk `errors`/`messages`
/// sub-objects removed to bound stored size.
pub fn audit_payload(raw: &Value) -> Value {
    let mut payload = raw.clone();
    if let Some(object) = payload.as_object_mut() {
        object.remove("messages");
        if let Some(transaction) = object
            .get_mut("transactionResponse")
            .and_then(Value::as_object_mut)
        {
            transaction.remove("errors");
            transaction.remove("messages");
        }
    }
    payload
}
