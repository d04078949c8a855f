use domain_types::records::{Payment, Receipt};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Stages of one transaction attempt. An attempt only ever moves forward;
/// `Reconciled` is terminal.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStage {
    Configured,
    RequestBuilt,
    Submitted,
    Reconciled,
}

/// Immutable request context threaded through one gateway call.
///
/// Built once per attempt; advancing the stage produces a new value, so no
/// hidden state survives across operations.
#[derive(Debug)]
pub struct RequestContext<B> {
    pub ref_id: Option<String>,
    pub stage: AttemptStage,
    pub body: B,
}

impl<B> RequestContext<B> {
    pub fn new(ref_id: Option<String>, body: B) -> Self {
        Self {
            ref_id,
            stage: AttemptStage::RequestBuilt,
            body,
        }
    }

    pub fn advanced(self, stage: AttemptStage) -> Self {
        Self { stage, ..self }
    }
}

/// Uniform interpretation of one gateway response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub msg: String,
    pub trans_id: Option<String>,
    pub response_code: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub error_code: Option<String>,
    pub error_text: Option<String>,
    pub subscription_id: Option<String>,
}

/// Outcome of reconciling a single gateway response. A non-Ok gateway result
/// surfaces here as `submitted = false`, not as an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledTransaction {
    pub submitted: bool,
    pub message: TransactionMessage,
}

impl ReconciledTransaction {
    pub fn not_submitted(msg: &str) -> Self {
        Self {
            submitted: false,
            message: TransactionMessage {
                msg: msg.to_string(),
                ..Default::default()
            },
        }
    }
}

/// What one payment attempt left behind.
#[derive(Debug)]
pub struct PaymentOutcome {
    pub reconciled: ReconciledTransaction,
    pub payment: Option<Payment>,
    pub receipts: Vec<Receipt>,
}

/// What one subscription-create attempt left behind.
#[derive(Debug)]
pub struct SubscriptionOutcome {
    pub reconciled: ReconciledTransaction,
    pub receipt: Option<Receipt>,
}
