pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Failures surfaced by the payment processor.
///
/// Gateway rejections are deliberately absent: a non-Ok gateway result is an
/// expected business outcome and is reported through the reconciled
/// transaction record (`submitted = false`), not through this enum.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("merchant configuration missing or invalid: {field_name}")]
    ConfigurationError { field_name: &'static str },

    #[error("invalid payment information: {field_name}")]
    ValidationError { field_name: &'static str },

    #[error("payment gateway unreachable")]
    GatewayUnreachable,

    #[error("failed to encode gateway request")]
    RequestEncodingFailed,

    #[error("failed to deserialize gateway response")]
    ResponseDeserializationFailed,

    #[error("payment method not implemented: {payment_method}")]
    NotImplemented { payment_method: &'static str },

    #[error("missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },

    #[error("storage operation failed")]
    StorageFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("record not found: {entity}")]
    NotFound { entity: &'static str },

    #[error("storage unavailable")]
    Unavailable,
}
