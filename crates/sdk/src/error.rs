use thiserror::Error;

/// Errors that can occur in the Paynow client SDK
#[derive(Error, Debug)]
pub enum PaynowError {
    /// A payment was submitted without a transaction reference
    #[error("Transaction reference is not set")]
    EmptyTransactionReference,

    /// A payment was submitted with no line items and no amount
    #[error("Cart has no items")]
    EmptyCart,

    /// Mobile number failed validation for the express checkout flow
    #[error("Invalid mobile number: {0}")]
    InvalidPhone(String),

    /// The requested mobile money method is not supported
    #[error("Mobile money method not implemented: {0}")]
    UnsupportedMethod(String),

    /// An inbound message carried a hash that did not verify
    #[error("Response hash verification failed")]
    HashMismatch,

    /// The gateway rejected the merchant integration id or key
    #[error("Integration rejected by gateway: {0}")]
    InvalidIntegration(String),

    /// Connection error (non-success response from the gateway)
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<paynow_types::UnsupportedMethodError> for PaynowError {
    fn from(err: paynow_types::UnsupportedMethodError) -> Self {
        PaynowError::UnsupportedMethod(err.0)
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, PaynowError>;
