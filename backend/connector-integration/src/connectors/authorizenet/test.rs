#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::expect_used)]
#[allow(clippy::panic)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use domain_types::{
        date_time,
        enums::{Country, InvoiceStatus, ReceiptStatus, TermType},
        payment_method_data::{BillingAddress, CardDetails, PaymentInfo, PaymentMethodData},
        records::{Invoice, Offer, OrderItem, Payment, Receipt, TermDetails},
        storage::{InMemoryStorage, ReconciliationUnit, VendorStorage},
        ProcessorError,
    };
    use hyperswitch_masking::Secret;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        configs::MerchantConfig,
        connectors::authorizenet::{transformers, AuthorizeNetProcessor},
        types::{ReconciledTransaction, TransactionMessage},
    };

    fn merchant_config() -> MerchantConfig {
        MerchantConfig {
            api_login_id: Secret::new("79MvGs6X".to_string()),
            transaction_key: Secret::new("4tbEK65F".to_string()),
            base_url: crate::configs::SANDBOX_BASE_URL.to_string(),
            currency: "usd".to_string(),
            transaction_type: "authCaptureTransaction".to_string(),
            site_id: 1,
        }
    }

    fn payment_info() -> PaymentInfo {
        PaymentInfo {
            payee_full_name: "Ada Lovelace".to_string(),
            payee_company: None,
            payment_method: PaymentMethodData::CreditCard(CardDetails {
                card_number: cards::CardNumber::from_str("4111111111111111").unwrap(),
                expire_month: Secret::new("04".to_string()),
                expire_year: Secret::new("2030".to_string()),
                cvv_number: Secret::new("123".to_string()),
            }),
        }
    }

    fn billing_address() -> BillingAddress {
        BillingAddress {
            address_1: "1 Infinite Loop".to_string(),
            address_2: None,
            locality: "Cupertino".to_string(),
            state: "CA".to_string(),
            postal_code: "95014".to_string(),
            country: Country::UnitedStates,
        }
    }

    fn invoice(total: &str, item_name: &str) -> Invoice {
        let mut invoice = Invoice::new(
            7,
            "usd",
            vec![OrderItem {
                id: 3,
                offer_id: 1,
                sku: "SKU-0001".to_string(),
                name: item_name.to_string(),
                description: Some("A purchasable thing".to_string()),
                quantity: 1,
                price: Decimal::from_str(total).unwrap(),
            }],
        );
        invoice.id = 11;
        invoice.total = Decimal::from_str(total).unwrap();
        invoice
    }

    pub mod builders {
        use super::*;

        #[test]
        fn amounts_truncate_toward_zero() {
            let truncated = transformers::to_valid_decimal(Decimal::from_str("10.999").unwrap());
            assert_eq!(truncated, Decimal::from_str("10.99").unwrap());
        }

        #[test]
        fn whole_amounts_keep_two_decimal_places_on_the_wire() {
            let request = transformers::capture_request(
                &merchant_config(),
                &invoice("10", "Widget"),
                &payment_info(),
                &billing_address(),
            )
            .unwrap();
            let value = serde_json::to_value(&request).unwrap();
            assert_eq!(
                value["createTransactionRequest"]["transactionRequest"]["amount"],
                json!("10.00")
            );
        }

        #[test]
        fn capture_request_truncates_amount_and_line_item_name() {
            let long_name = "X".repeat(50);
            let request = transformers::capture_request(
                &merchant_config(),
                &invoice("19.995", &long_name),
                &payment_info(),
                &billing_address(),
            )
            .unwrap();
            let value = serde_json::to_value(&request).unwrap();
            let transaction = &value["createTransactionRequest"]["transactionRequest"];
            assert_eq!(transaction["amount"], json!("19.99"));
            let name = transaction["lineItems"]["lineItem"][0]["name"]
                .as_str()
                .unwrap();
            assert_eq!(name.len(), 30);
        }

        #[test]
        fn expiration_date_is_month_dash_year() {
            let request = transformers::capture_request(
                &merchant_config(),
                &invoice("5.00", "Widget"),
                &payment_info(),
                &billing_address(),
            )
            .unwrap();
            let value = serde_json::to_value(&request).unwrap();
            assert_eq!(
                value["createTransactionRequest"]["transactionRequest"]["payment"]["creditCard"]
                    ["expirationDate"],
                json!("04-2030")
            );
        }

        #[test]
        fn missing_cvv_is_a_validation_error() {
            let mut info = payment_info();
            if let PaymentMethodData::CreditCard(card) = &mut info.payment_method {
                card.cvv_number = Secret::new(String::new());
            }
            let err = transformers::build_payment(&info.payment_method).unwrap_err();
            assert!(matches!(
                err.current_context(),
                ProcessorError::ValidationError { .. }
            ));
        }

        #[test]
        fn bank_account_payments_are_not_implemented() {
            let err = transformers::build_payment(&PaymentMethodData::BankAccount).unwrap_err();
            assert!(matches!(
                err.current_context(),
                ProcessorError::NotImplemented {
                    payment_method: "bank_account"
                }
            ));
        }

        #[test]
        fn overlong_address_fields_truncate_to_gateway_maxima() {
            let info = PaymentInfo {
                payee_full_name: format!("{} {}", "F".repeat(80), "L".repeat(80)),
                payee_company: Some("C".repeat(80)),
                payment_method: payment_info().payment_method,
            };
            let address = BillingAddress {
                address_1: "A".repeat(100),
                address_2: None,
                locality: "L".repeat(100),
                state: "S".repeat(100),
                postal_code: "Z".repeat(100),
                country: Country::UnitedStates,
            };
            let bill_to = transformers::build_billing_address(&info, &address);
            let value = serde_json::to_value(&bill_to).unwrap();
            assert_eq!(value["firstName"].as_str().unwrap().len(), 50);
            assert_eq!(value["lastName"].as_str().unwrap().len(), 50);
            assert_eq!(value["company"].as_str().unwrap().len(), 50);
            assert_eq!(value["address"].as_str().unwrap().len(), 60);
            assert_eq!(value["city"].as_str().unwrap().len(), 40);
            assert_eq!(value["state"].as_str().unwrap().len(), 40);
            assert_eq!(value["zip"].as_str().unwrap().len(), 20);
            assert_eq!(value["country"], json!("United States"));
        }

        #[test]
        fn line_item_order_is_preserved() {
            let items: Vec<OrderItem> = (0..3)
                .map(|n| OrderItem {
                    id: n,
                    offer_id: n,
                    sku: format!("SKU-{n}"),
                    name: format!("Item {n}"),
                    description: None,
                    quantity: 1,
                    price: Decimal::ONE,
                })
                .collect();
            let line_items = transformers::build_line_items(&items);
            let ids: Vec<&str> = line_items
                .line_item
                .iter()
                .map(|item| item.item_id.as_str())
                .collect();
            assert_eq!(ids, vec!["SKU-0", "SKU-1", "SKU-2"]);
        }

        fn offer(terms: TermType, details: TermDetails) -> Offer {
            Offer {
                id: 1,
                uuid: uuid::Uuid::new_v4(),
                name: "Monthly plan".to_string(),
                terms,
                term_details: details,
            }
        }

        #[test]
        fn fixed_terms_bill_one_period_at_their_cadence() {
            for (terms, months) in [
                (TermType::MonthlySubscription, 1),
                (TermType::QuarterlySubscription, 4),
                (TermType::SemiAnnualSubscription, 6),
                (TermType::AnnualSubscription, 12),
            ] {
                let schedule = transformers::build_payment_schedule(
                    &offer(terms, TermDetails::default()),
                    date_time::now(),
                )
                .unwrap();
                assert_eq!(schedule.interval.length, months);
                assert_eq!(schedule.total_occurrences, 1);
                assert_eq!(schedule.trial_occurrences, 0);
            }
        }

        #[test]
        fn generic_subscription_reads_the_offer_term_details() {
            let schedule = transformers::build_payment_schedule(
                &offer(
                    TermType::Subscription,
                    TermDetails {
                        payment_occurrences: Some(24),
                        period_length: Some(3),
                        trial_occurrences: Some(2),
                    },
                ),
                date_time::now(),
            )
            .unwrap();
            assert_eq!(schedule.interval.length, 3);
            assert_eq!(schedule.total_occurrences, 24);
            assert_eq!(schedule.trial_occurrences, 2);
        }

        #[test]
        fn generic_subscription_without_occurrences_is_unbounded() {
            let schedule = transformers::build_payment_schedule(
                &offer(
                    TermType::Subscription,
                    TermDetails {
                        payment_occurrences: None,
                        period_length: Some(1),
                        trial_occurrences: None,
                    },
                ),
                date_time::now(),
            )
            .unwrap();
            assert_eq!(schedule.total_occurrences, 9999);
        }

        #[test]
        fn refund_payload_masks_the_stored_card() {
            let payment = stored_payment("4111111111111111");
            let card = transformers::masked_refund_card(&payment).unwrap();
            assert_eq!(card.card_number, "1111");
            assert_eq!(card.expiration_date, "XXXX");
        }

        #[test]
        fn refund_request_references_the_original_transaction() {
            let payment = stored_payment("XXXX0015");
            let request = transformers::refund_request(&merchant_config(), &payment).unwrap();
            let value = serde_json::to_value(&request).unwrap();
            let transaction = &value["createTransactionRequest"]["transactionRequest"];
            assert_eq!(transaction["transactionType"], json!("refundTransaction"));
            assert_eq!(transaction["refTransId"], json!("60157"));
            assert_eq!(
                transaction["payment"]["creditCard"]["cardNumber"],
                json!("0015")
            );
            assert_eq!(
                transaction["payment"]["creditCard"]["expirationDate"],
                json!("XXXX")
            );
        }

        pub(super) fn stored_payment(account_number: &str) -> Payment {
            let now = date_time::now();
            Payment {
                id: 5,
                uuid: uuid::Uuid::new_v4(),
                invoice_id: 11,
                amount: Decimal::from_str("19.99").unwrap(),
                provider: AuthorizeNetProcessor::PROVIDER.to_string(),
                transaction: Some("60157".to_string()),
                success: true,
                payee_full_name: "Ada Lovelace".to_string(),
                payee_company: None,
                billing_address: None,
                result: json!({ "accountNumber": account_number }),
                created: now,
                updated: now,
            }
        }
    }

    pub mod reconcile {
        use super::{
            transformers::{
                reconcile_subscription, reconcile_transaction, CreateTransactionResponse,
                SubscriptionResponse,
            },
            *,
        };

        fn transaction_response(value: serde_json::Value) -> CreateTransactionResponse {
            serde_json::from_value(value).unwrap()
        }

        #[test]
        fn absent_response_is_a_null_response() {
            let reconciled = reconcile_transaction(None);
            assert!(!reconciled.submitted);
            assert_eq!(reconciled.message.msg, "Null Response");
        }

        #[test]
        fn ok_with_nested_messages_is_payment_complete() {
            let response = transaction_response(json!({
                "transactionResponse": {
                    "responseCode": "1",
                    "transId": "60157",
                    "accountNumber": "XXXX1111",
                    "messages": [
                        { "code": "1", "description": "This transaction has been approved." }
                    ]
                },
                "messages": {
                    "resultCode": "Ok",
                    "message": [ { "code": "I00001", "text": "Successful." } ]
                }
            }));
            let reconciled = reconcile_transaction(Some(&response));
            assert!(reconciled.submitted);
            assert_eq!(reconciled.message.msg, "Payment Complete");
            assert_eq!(reconciled.message.trans_id.as_deref(), Some("60157"));
            assert_eq!(reconciled.message.response_code.as_deref(), Some("1"));
            assert_eq!(reconciled.message.code.as_deref(), Some("1"));
            assert_eq!(
                reconciled.message.message.as_deref(),
                Some("This transaction has been approved.")
            );
        }

        #[test]
        fn ok_without_nested_messages_is_a_failed_transaction() {
            let response = transaction_response(json!({
                "transactionResponse": {
                    "responseCode": "2",
                    "transId": "0",
                    "errors": [
                        { "errorCode": "2", "errorText": "This transaction has been declined." }
                    ]
                },
                "messages": {
                    "resultCode": "Ok",
                    "message": [ { "code": "I00001", "text": "Successful." } ]
                }
            }));
            let reconciled = reconcile_transaction(Some(&response));
            assert!(!reconciled.submitted);
            assert_eq!(reconciled.message.msg, "Failed Transaction");
            assert_eq!(reconciled.message.error_code.as_deref(), Some("2"));
            assert_eq!(
                reconciled.message.error_text.as_deref(),
                Some("This transaction has been declined.")
            );
        }

        #[test]
        fn error_result_extracts_nested_errors_first() {
            let response = transaction_response(json!({
                "transactionResponse": {
                    "errors": [ { "errorCode": "6", "errorText": "The credit card number is invalid." } ]
                },
                "messages": {
                    "resultCode": "Error",
                    "message": [ { "code": "E00027", "text": "The transaction was unsuccessful." } ]
                }
            }));
            let reconciled = reconcile_transaction(Some(&response));
            assert!(!reconciled.submitted);
            assert_eq!(reconciled.message.error_code.as_deref(), Some("6"));
            assert_eq!(
                reconciled.message.error_text.as_deref(),
                Some("The credit card number is invalid.")
            );
        }

        #[test]
        fn error_result_without_nested_errors_falls_back_to_top_level_messages() {
            let response = transaction_response(json!({
                "messages": {
                    "resultCode": "Error",
                    "message": [ { "code": "E00007", "text": "User authentication failed." } ]
                }
            }));
            let reconciled = reconcile_transaction(Some(&response));
            assert!(!reconciled.submitted);
            assert_eq!(reconciled.message.code.as_deref(), Some("E00007"));
            assert_eq!(
                reconciled.message.message.as_deref(),
                Some("User authentication failed.")
            );
        }

        #[test]
        fn subscription_ok_captures_the_gateway_subscription_id() {
            let response: SubscriptionResponse = serde_json::from_value(json!({
                "subscriptionId": "145521",
                "messages": {
                    "resultCode": "Ok",
                    "message": [ { "code": "I00001", "text": "Successful." } ]
                }
            }))
            .unwrap();
            let reconciled = reconcile_subscription(Some(&response));
            assert!(reconciled.submitted);
            assert_eq!(
                reconciled.message.subscription_id.as_deref(),
                Some("145521")
            );
            assert_eq!(reconciled.message.code.as_deref(), Some("I00001"));
        }

        #[test]
        fn rejected_subscription_still_captures_the_message() {
            let response: SubscriptionResponse = serde_json::from_value(json!({
                "messages": {
                    "resultCode": "Error",
                    "message": [ { "code": "E00012", "text": "A duplicate subscription already exists." } ]
                }
            }))
            .unwrap();
            let reconciled = reconcile_subscription(Some(&response));
            assert!(!reconciled.submitted);
            assert!(reconciled.message.subscription_id.is_none());
            assert_eq!(reconciled.message.code.as_deref(), Some("E00012"));
        }

        #[test]
        fn audit_payload_strips_bulk_sub_objects() {
            let raw = json!({
                "transactionResponse": {
                    "transId": "60157",
                    "accountNumber": "XXXX1111",
                    "messages": [ { "code": "1", "description": "Approved." } ],
                    "errors": []
                },
                "messages": { "resultCode": "Ok", "message": [] }
            });
            let audit = transformers::audit_payload(&raw);
            assert!(audit.get("messages").is_none());
            let transaction = audit.get("transactionResponse").unwrap();
            assert!(transaction.get("messages").is_none());
            assert!(transaction.get("errors").is_none());
            assert_eq!(transaction["accountNumber"], json!("XXXX1111"));
        }
    }

    pub mod lifecycle {
        use super::*;

        fn receipt() -> Receipt {
            let mut receipt = Receipt::new(7, None, None);
            receipt.id = 9;
            receipt.set_meta(
                "subscription_id",
                serde_json::Value::String("145521".to_string()),
            );
            receipt
        }

        #[test]
        fn confirmed_cancel_moves_the_receipt_to_canceled() {
            let store = InMemoryStorage::new();
            let reconciled = ReconciledTransaction {
                submitted: true,
                ..Default::default()
            };
            let updated =
                AuthorizeNetProcessor::apply_cancel_outcome(&receipt(), &reconciled, &store)
                    .unwrap();
            assert_eq!(updated.status, ReceiptStatus::Canceled);
            assert!(updated.end_date.is_some());
            let stored = store.get_receipt(9).unwrap().unwrap();
            assert_eq!(stored.status, ReceiptStatus::Canceled);
        }

        #[test]
        fn rejected_cancel_leaves_the_receipt_unchanged() {
            let store = InMemoryStorage::new();
            let reconciled = ReconciledTransaction::not_submitted("");
            let untouched =
                AuthorizeNetProcessor::apply_cancel_outcome(&receipt(), &reconciled, &store)
                    .unwrap();
            assert_eq!(untouched.status, ReceiptStatus::Active);
            assert!(untouched.end_date.is_none());
            assert!(store.get_receipt(9).unwrap().is_none());
        }

        #[test]
        fn rejected_payment_leaves_the_invoice_untouched() {
            let inv = invoice("19.99", "Widget");
            let unit = AuthorizeNetProcessor::build_payment_unit(
                &inv,
                builders::stored_payment("XXXX1111"),
                &ReconciledTransaction::not_submitted("Failed Transaction"),
            );
            assert!(unit.invoice.is_none());
            assert!(unit.receipts.is_empty());
            assert_eq!(unit.payments.len(), 1);

            let store = InMemoryStorage::new();
            store
                .commit_reconciliation(ReconciliationUnit {
                    invoice: Some(inv.clone()),
                    ..Default::default()
                })
                .unwrap();
            store.commit_reconciliation(unit).unwrap();
            let stored = store.get_invoice(inv.id).unwrap().unwrap();
            assert_eq!(stored.status, InvoiceStatus::Pending);
        }

        #[test]
        fn submitted_payment_completes_the_invoice_with_one_receipt_per_item() {
            let mut inv = invoice("19.99", "Widget");
            inv.order_items.push(OrderItem {
                id: 4,
                offer_id: 2,
                sku: "SKU-0002".to_string(),
                name: "Gadget".to_string(),
                description: None,
                quantity: 1,
                price: Decimal::ONE,
            });
            let reconciled = ReconciledTransaction {
                submitted: true,
                message: TransactionMessage {
                    msg: "Payment Complete".to_string(),
                    trans_id: Some("60157".to_string()),
                    ..Default::default()
                },
            };
            let unit = AuthorizeNetProcessor::build_payment_unit(
                &inv,
                builders::stored_payment("XXXX1111"),
                &reconciled,
            );
            assert_eq!(
                unit.invoice.as_ref().unwrap().status,
                InvoiceStatus::Complete
            );
            assert_eq!(unit.receipts.len(), 2);
            assert!(unit
                .receipts
                .iter()
                .all(|receipt| receipt.transaction.as_deref() == Some("60157")));
            let item_ids: Vec<_> = unit
                .receipts
                .iter()
                .map(|receipt| receipt.order_item_id)
                .collect();
            assert_eq!(item_ids, vec![Some(3), Some(4)]);
        }

        #[test]
        fn confirmed_refund_marks_the_invoice_refunded() {
            let store = InMemoryStorage::new();
            let inv = invoice("19.99", "Widget");
            store
                .commit_reconciliation(ReconciliationUnit {
                    invoice: Some(inv.clone()),
                    ..Default::default()
                })
                .unwrap();
            let payment = builders::stored_payment("XXXX1111");
            let reconciled = ReconciledTransaction {
                submitted: true,
                ..Default::default()
            };
            let outcome = AuthorizeNetProcessor::apply_refund_outcome(
                &payment,
                reconciled,
                json!({ "transId": "60158" }),
                &store,
            )
            .unwrap();
            let stored = store.get_invoice(inv.id).unwrap().unwrap();
            assert_eq!(stored.status, InvoiceStatus::Refunded);
            let refunded = outcome.payment.unwrap();
            assert_eq!(refunded.result["refund"]["transId"], json!("60158"));
        }

        #[test]
        fn confirmed_refund_without_its_invoice_is_a_storage_failure() {
            let store = InMemoryStorage::new();
            let payment = builders::stored_payment("XXXX1111");
            let reconciled = ReconciledTransaction {
                submitted: true,
                ..Default::default()
            };
            let err = AuthorizeNetProcessor::apply_refund_outcome(
                &payment,
                reconciled,
                json!({}),
                &store,
            )
            .unwrap_err();
            assert!(matches!(
                err.current_context(),
                ProcessorError::StorageFailure
            ));
        }

        #[test]
        fn rejected_refund_records_the_failed_attempt() {
            let store = InMemoryStorage::new();
            let payment = builders::stored_payment("XXXX1111");
            let outcome = AuthorizeNetProcessor::apply_refund_outcome(
                &payment,
                ReconciledTransaction::not_submitted("Failed Transaction"),
                json!({ "errorCode": "54" }),
                &store,
            )
            .unwrap();
            assert!(!outcome.reconciled.submitted);
            let attempted = store.get_payment(payment.id).unwrap().unwrap();
            assert_eq!(attempted.result["refund"]["errorCode"], json!("54"));
        }

        #[test]
        fn blank_credentials_fail_before_any_network_call() {
            let config = MerchantConfig {
                api_login_id: Secret::new(String::new()),
                ..merchant_config()
            };
            let err = AuthorizeNetProcessor::new(config).unwrap_err();
            assert!(matches!(
                err.current_context(),
                ProcessorError::ConfigurationError {
                    field_name: "api_login_id"
                }
            ));
        }
    }
}
