pub mod transformers;

#[cfg(test)]
mod test;

use domain_types::{
    date_time,
    enums::{InvoiceStatus, ReceiptStatus},
    payment_method_data::{BillingAddress, PaymentInfo},
    records::{Invoice, Offer, Payment, Receipt, Subscription},
    storage::{ReconciliationUnit, VendorStorage},
    CustomResult, ProcessorError,
};
use error_stack::ResultExt;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use time::PrimitiveDateTime;
use uuid::Uuid;

use self::transformers as authorizenet;
use crate::{
    configs::MerchantConfig,
    types::{
        AttemptStage, PaymentOutcome, ReconciledTransaction, RequestContext, SubscriptionOutcome,
    },
};

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

/// Gateway adapter for Authorize.Net.
///
/// One instance handles one in-flight gateway call at a time; callers needing
/// throughput run independent instances, each bound to its own invoice. The
/// adapter never retries: transport failures surface as `GatewayUnreachable`
/// and retry policy belongs to the caller.
#[derive(Debug)]
pub struct AuthorizeNetProcessor {
    config: MerchantConfig,
    client: reqwest::blocking::Client,
}

impl AuthorizeNetProcessor {
    pub const PROVIDER: &'static str = "authorizenet";

    /// Fails fast on missing merchant credentials, before any network call.
    pub fn new(config: MerchantConfig) -> CustomResult<Self, ProcessorError> {
        config.validate()?;
        tracing::debug!(stage = %AttemptStage::Configured, "merchant credentials loaded");
        Ok(Self {
            config,
            client: reqwest::blocking::Client::new(),
        })
    }

    pub fn config(&self) -> &MerchantConfig {
        &self.config
    }

    /// Authorize.Net prefixes its JSON responses with a UTF-8 BOM.
    fn preprocess_response_bytes(bytes: bytes::Bytes) -> bytes::Bytes {
        let (decoded, _) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        bytes::Bytes::copy_from_slice(decoded.as_bytes())
    }

    /// One blocking gateway round-trip. No adapter-level timeout; the
    /// caller's transport layer governs cancellation.
    fn submit<B, R>(&self, context: RequestContext<B>) -> CustomResult<(Value, R), ProcessorError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        tracing::debug!(stage = %context.stage, ref_id = ?context.ref_id, "submitting gateway request");
        let response = self
            .client
            .post(&self.config.base_url)
            .header(headers::CONTENT_TYPE, "application/json")
            .json(&context.body)
            .send()
            .change_context(ProcessorError::GatewayUnreachable)?;
        let context = context.advanced(AttemptStage::Submitted);

        let bytes = response
            .bytes()
            .change_context(ProcessorError::GatewayUnreachable)?;
        let bytes = Self::preprocess_response_bytes(bytes);
        let raw: Value = serde_json::from_slice(&bytes)
            .change_context(ProcessorError::ResponseDeserializationFailed)?;
        let parsed: R = serde_json::from_value(raw.clone())
            .change_context(ProcessorError::ResponseDeserializationFailed)?;
        tracing::debug!(stage = %context.advanced(AttemptStage::Reconciled).stage, "gateway response received");
        Ok((raw, parsed))
    }

    fn build_payment_record(
        &self,
        invoice: &Invoice,
        info: &PaymentInfo,
        billing: &BillingAddress,
        reconciled: &ReconciledTransaction,
        raw: &Value,
    ) -> Payment {
        let now = date_time::now();
        Payment {
            id: 0,
            uuid: Uuid::new_v4(),
            invoice_id: invoice.id,
            amount: authorizenet::to_valid_decimal(invoice.total),
            provider: Self::PROVIDER.to_string(),
            transaction: reconciled.message.trans_id.clone(),
            success: reconciled.submitted,
            payee_full_name: info.payee_full_name.clone(),
            payee_company: info.payee_company.clone(),
            billing_address: Some(billing.clone()),
            result: authorizenet::audit_payload(raw),
            created: now,
            updated: now,
        }
    }

    /// Authorize-and-capture for the invoice total. On reconciled success the
    /// invoice moves to `Complete` and one receipt is created per order item,
    /// all in one persistence unit; a gateway rejection records the failed
    /// payment attempt and leaves the invoice untouched for retry.
    pub fn process_payment(
        &self,
        invoice: &Invoice,
        info: &PaymentInfo,
        billing: &BillingAddress,
        store: &dyn VendorStorage,
    ) -> CustomResult<PaymentOutcome, ProcessorError> {
        let request = authorizenet::capture_request(&self.config, invoice, info, billing)?;
        let context = RequestContext::new(
            Some(format!("{}-{}", invoice.profile_id, invoice.id)),
            request,
        );
        let (raw, response): (Value, authorizenet::CreateTransactionResponse) =
            self.submit(context)?;
        let reconciled = authorizenet::reconcile_transaction(Some(&response));

        let payment = self.build_payment_record(invoice, info, billing, &reconciled, &raw);

        if !reconciled.submitted {
            tracing::warn!(
                code = ?reconciled.message.error_code,
                text = ?reconciled.message.error_text,
                "gateway rejected payment"
            );
        }
        let unit = Self::build_payment_unit(invoice, payment, &reconciled);

        let committed = store
            .commit_reconciliation(unit)
            .change_context(ProcessorError::StorageFailure)?;

        Ok(PaymentOutcome {
            reconciled,
            payment: committed.payments.into_iter().next(),
            receipts: committed.receipts,
        })
    }

    /// Everything one reconciled payment attempt writes. A submitted payment
    /// completes the invoice and yields one receipt per order item; a
    /// rejected one records only the failed attempt, leaving the invoice
    /// open for retry.
    pub(crate) fn build_payment_unit(
        invoice: &Invoice,
        payment: Payment,
        reconciled: &ReconciledTransaction,
    ) -> ReconciliationUnit {
        if !reconciled.submitted {
            return ReconciliationUnit {
                invoice: None,
                payments: vec![payment],
                receipts: Vec::new(),
            };
        }
        let mut completed = invoice.clone();
        completed.status = InvoiceStatus::Complete;
        let receipts = invoice
            .order_items
            .iter()
            .map(|item| {
                Receipt::new(
                    invoice.profile_id,
                    Some(item.id),
                    reconciled.message.trans_id.clone(),
                )
            })
            .collect();
        ReconciliationUnit {
            invoice: Some(completed),
            payments: vec![payment],
            receipts,
        }
    }

    /// Refund referencing the settled transaction. Only the last four card
    /// digits and a placeholder expiry ever leave the process; on confirmed
    /// refund the owning invoice moves to `Refunded`, and a rejected refund
    /// still records the attempt in the payment's audit trail.
    pub fn refund_payment(
        &self,
        payment: &Payment,
        store: &dyn VendorStorage,
    ) -> CustomResult<PaymentOutcome, ProcessorError> {
        let request = authorizenet::refund_request(&self.config, payment)?;
        let context = RequestContext::new(payment.transaction.clone(), request);
        let (raw, response): (Value, authorizenet::CreateTransactionResponse) =
            self.submit(context)?;
        let reconciled = authorizenet::reconcile_transaction(Some(&response));
        Self::apply_refund_outcome(payment, reconciled, authorizenet::audit_payload(&raw), store)
    }

    pub(crate) fn apply_refund_outcome(
        payment: &Payment,
        reconciled: ReconciledTransaction,
        refund_audit: Value,
        store: &dyn VendorStorage,
    ) -> CustomResult<PaymentOutcome, ProcessorError> {
        let mut attempted = payment.clone();
        if let Some(result) = attempted.result.as_object_mut() {
            result.insert("refund".to_string(), refund_audit);
        }

        if !reconciled.submitted {
            let committed = store
                .commit_reconciliation(ReconciliationUnit {
                    invoice: None,
                    payments: vec![attempted],
                    receipts: Vec::new(),
                })
                .change_context(ProcessorError::StorageFailure)?;
            return Ok(PaymentOutcome {
                reconciled,
                payment: committed.payments.into_iter().next(),
                receipts: Vec::new(),
            });
        }

        // A confirmed refund without its owning invoice cannot satisfy the
        // Refunded transition, so it is a hard failure, not a silent skip.
        let mut invoice = store
            .get_invoice(payment.invoice_id)
            .change_context(ProcessorError::StorageFailure)?
            .ok_or_else(|| {
                error_stack::report!(ProcessorError::StorageFailure)
                    .attach_printable("owning invoice not found for refunded payment")
            })?;
        invoice.status = InvoiceStatus::Refunded;

        let committed = store
            .commit_reconciliation(ReconciliationUnit {
                invoice: Some(invoice),
                payments: vec![attempted],
                receipts: Vec::new(),
            })
            .change_context(ProcessorError::StorageFailure)?;

        Ok(PaymentOutcome {
            reconciled,
            payment: committed.payments.into_iter().next(),
            receipts: Vec::new(),
        })
    }

    /// Void of an unsettled transaction; no local state changes.
    pub fn void_payment(
        &self,
        transaction_id: &str,
    ) -> CustomResult<ReconciledTransaction, ProcessorError> {
        let request = authorizenet::void_request(&self.config, transaction_id)?;
        let context = RequestContext::new(Some(transaction_id.to_string()), request);
        let (_, response): (Value, authorizenet::CreateTransactionResponse) =
            self.submit(context)?;
        Ok(authorizenet::reconcile_transaction(Some(&response)))
    }

    /// Creates a recurring billing subscription with the offer's computed
    /// schedule; the gateway-issued subscription id lands in the receipt's
    /// metadata.
    pub fn subscription_payment(
        &self,
        subscription: &Subscription,
        offer: &Offer,
        info: &PaymentInfo,
        billing: &BillingAddress,
        store: &dyn VendorStorage,
    ) -> CustomResult<SubscriptionOutcome, ProcessorError> {
        let request = authorizenet::create_subscription_request(
            &self.config,
            subscription,
            offer,
            info,
            billing,
            date_time::now(),
        )?;
        let context = RequestContext::new(
            Some(format!("{}-{}", subscription.profile_id, subscription.id)),
            request,
        );
        let (raw, response): (Value, authorizenet::SubscriptionResponse) = self.submit(context)?;
        let reconciled = authorizenet::reconcile_subscription(Some(&response));

        if !reconciled.submitted {
            tracing::warn!(
                code = ?reconciled.message.code,
                text = ?reconciled.message.message,
                "gateway rejected subscription"
            );
            return Ok(SubscriptionOutcome {
                reconciled,
                receipt: None,
            });
        }

        let mut receipt = Receipt::new(subscription.profile_id, None, None);
        if let Some(subscription_id) = &reconciled.message.subscription_id {
            receipt.set_meta("subscription_id", Value::String(subscription_id.clone()));
        }
        receipt.set_meta("raw", authorizenet::audit_payload(&raw));

        let committed = store
            .commit_reconciliation(ReconciliationUnit {
                invoice: None,
                payments: Vec::new(),
                receipts: vec![receipt],
            })
            .change_context(ProcessorError::StorageFailure)?;

        Ok(SubscriptionOutcome {
            reconciled,
            receipt: committed.receipts.into_iter().next(),
        })
    }

    /// Rebuilds the payment method on an existing gateway subscription.
    pub fn update_subscription_payment(
        &self,
        subscription_id: &str,
        info: &PaymentInfo,
    ) -> CustomResult<ReconciledTransaction, ProcessorError> {
        let request =
            authorizenet::update_subscription_request(&self.config, subscription_id, info)?;
        let context = RequestContext::new(Some(subscription_id.to_string()), request);
        let (_, response): (Value, authorizenet::SubscriptionResponse) = self.submit(context)?;
        Ok(authorizenet::reconcile_subscription(Some(&response)))
    }

    /// Cancels a gateway subscription. The receipt only moves to `Canceled`
    /// on a confirmed cancellation; a rejected cancel leaves it untouched.
    pub fn cancel_subscription_payment(
        &self,
        receipt: &Receipt,
        subscription_id: &str,
        store: &dyn VendorStorage,
    ) -> CustomResult<(ReconciledTransaction, Receipt), ProcessorError> {
        let request = authorizenet::cancel_subscription_request(&self.config, subscription_id)?;
        let context = RequestContext::new(Some(subscription_id.to_string()), request);
        let (_, response): (Value, authorizenet::SubscriptionResponse) = self.submit(context)?;
        let reconciled = authorizenet::reconcile_subscription(Some(&response));
        let receipt = Self::apply_cancel_outcome(receipt, &reconciled, store)?;
        Ok((reconciled, receipt))
    }

    pub(crate) fn apply_cancel_outcome(
        receipt: &Receipt,
        reconciled: &ReconciledTransaction,
        store: &dyn VendorStorage,
    ) -> CustomResult<Receipt, ProcessorError> {
        if !reconciled.submitted {
            return Ok(receipt.clone());
        }
        let mut canceled = receipt.clone();
        canceled.status = ReceiptStatus::Canceled;
        canceled.end_date = Some(date_time::now());
        let committed = store
            .commit_reconciliation(ReconciliationUnit {
                invoice: None,
                payments: Vec::new(),
                receipts: vec![canceled],
            })
            .change_context(ProcessorError::StorageFailure)?;
        committed.receipts.into_iter().next().ok_or_else(|| {
            error_stack::report!(ProcessorError::StorageFailure)
        })
    }

    /// Settled batches in the window; an empty report is a result, not an
    /// error.
    pub fn get_settled_batch_list(
        &self,
        first_settlement_date: PrimitiveDateTime,
        last_settlement_date: PrimitiveDateTime,
    ) -> CustomResult<Vec<authorizenet::BatchDetails>, ProcessorError> {
        let request = authorizenet::settled_batch_list_request(
            &self.config,
            first_settlement_date,
            last_settlement_date,
        )?;
        let context = RequestContext::new(None, request);
        let (_, response): (Value, authorizenet::GetSettledBatchListResponse) =
            self.submit(context)?;
        Ok(response.batch_list.unwrap_or_default())
    }

    /// Transactions in one settled batch.
    pub fn get_transaction_batch_list(
        &self,
        batch_id: &str,
    ) -> CustomResult<Vec<authorizenet::TransactionSummary>, ProcessorError> {
        let request = authorizenet::transaction_list_request(&self.config, batch_id)?;
        let context = RequestContext::new(Some(batch_id.to_string()), request);
        let (_, response): (Value, authorizenet::GetTransactionListResponse) =
            self.submit(context)?;
        Ok(response.transactions.unwrap_or_default())
    }

    pub fn get_transaction_detail(
        &self,
        transaction_id: &str,
    ) -> CustomResult<Option<authorizenet::TransactionDetail>, ProcessorError> {
        let request = authorizenet::transaction_details_request(&self.config, transaction_id)?;
        let context = RequestContext::new(Some(transaction_id.to_string()), request);
        let (_, response): (Value, authorizenet::GetTransactionDetailsResponse) =
            self.submit(context)?;
        Ok(response.transaction)
    }

    pub fn get_list_of_subscriptions(
        &self,
    ) -> CustomResult<Vec<authorizenet::SubscriptionSummary>, ProcessorError> {
        let request = authorizenet::subscription_list_request(&self.config)?;
        let context = RequestContext::new(None, request);
        let (_, response): (Value, authorizenet::ArbGetSubscriptionListResponse) =
            self.submit(context)?;
        Ok(response.subscription_details.unwrap_or_default())
    }
}
