//! Domain records and shared types for the vendor payment subsystem.
//!
//! These are passive data holders consumed by the payment processor; all
//! state transitions on them happen in response to a reconciled gateway
//! outcome, never speculatively.

pub mod enums;
pub mod errors;
pub mod payment_method_data;
pub mod records;
pub mod storage;

pub use errors::{CustomResult, ProcessorError, StorageError};

pub mod date_time {
    use time::{OffsetDateTime, PrimitiveDateTime};

    /// Current UTC wall-clock time without the offset component.
    pub fn now() -> PrimitiveDateTime {
        let utc = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc.date(), utc.time())
    }
}
