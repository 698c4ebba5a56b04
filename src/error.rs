use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A structured rejection returned by the payment provider.
///
/// The payload is the provider's JSON error body kept verbatim
/// (`name`, `message`, `debug_id`, `details`), so callers can surface it
/// without knowing every error shape in advance.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    pub status: u16,
    pub payload: Value,
}

impl ProviderError {
    pub fn new(status: u16, payload: Value) -> Self {
        Self { status, payload }
    }

    /// The provider's machine-readable error name, e.g. `UNPROCESSABLE_ENTITY`.
    pub fn name(&self) -> Option<&str> {
        self.payload.get("name").and_then(Value::as_str)
    }

    /// The first `details[].issue` code, e.g. `ORDER_NOT_APPROVED`.
    pub fn issue(&self) -> Option<&str> {
        self.payload
            .get("details")
            .and_then(Value::as_array)
            .and_then(|details| details.first())
            .and_then(|detail| detail.get("issue"))
            .and_then(Value::as_str)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider returned {}: {}", self.status, self.payload)
    }
}

impl std::error::Error for ProviderError {}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Approval input closed before the order was approved")]
    ApprovalAborted,
    #[error("Failed to read approval input: {0}")]
    ApprovalInput(std::io::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
