//! Typed views over the gateway's form-encoded response maps.
//!
//! All three inbound cases (initiate acknowledgment, status poll, and
//! the asynchronous status-update callback) verify the same way: if the
//! raw map carries a `hash` field it must verify against the integration
//! key before any result object is constructed. A map without a hash is
//! accepted unverified (some gateway error acknowledgments are unsigned)
//! and logged.

use paynow_types::{FieldMap, TransactionStatus};
use serde::Serialize;
use tracing::warn;

use crate::{
    error::{PaynowError, Result},
    hash,
};

/// Refuse to build a result from a map whose hash does not verify.
fn verify_if_signed(fields: &FieldMap, integration_key: &str) -> Result<()> {
    if fields.contains(hash::HASH_FIELD) {
        if !hash::verify(fields, integration_key) {
            return Err(PaynowError::HashMismatch);
        }
    } else {
        warn!("Gateway message carries no hash field, integrity not verified");
    }
    Ok(())
}

/// Acknowledgment returned by the gateway when a transaction is initiated.
#[derive(Debug, Clone, Serialize)]
pub struct InitiateResponse {
    success: bool,
    poll_url: Option<String>,
    redirect_url: Option<String>,
    instructions: Option<String>,
    error: Option<String>,
    raw: FieldMap,
}

impl InitiateResponse {
    pub(crate) fn from_fields(raw: FieldMap, integration_key: &str) -> Result<Self> {
        verify_if_signed(&raw, integration_key)?;

        let success = raw
            .get("status")
            .is_some_and(|status| status.eq_ignore_ascii_case("ok"));

        Ok(Self {
            success,
            poll_url: raw.get("pollurl").map(str::to_string),
            redirect_url: raw.get("browserurl").map(str::to_string),
            instructions: raw.get("instructions").map(str::to_string),
            error: raw.get("error").map(str::to_string),
            raw,
        })
    }

    /// Whether the gateway accepted the transaction.
    pub fn success(&self) -> bool {
        self.success
    }

    /// URL to poll for the transaction's status.
    pub fn poll_url(&self) -> Option<&str> {
        self.poll_url.as_deref()
    }

    /// URL to redirect the customer's browser to for checkout.
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    /// Customer-facing payment instructions (mobile express checkout).
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Gateway error message when the initiation failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The full response map, including fields this SDK does not model.
    pub fn raw(&self) -> &FieldMap {
        &self.raw
    }
}

/// Transaction status, from a poll or from the gateway's callback.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    reference: Option<String>,
    paynow_reference: Option<String>,
    amount: Option<f64>,
    status: TransactionStatus,
    poll_url: Option<String>,
    raw: FieldMap,
}

impl StatusResponse {
    pub(crate) fn from_fields(raw: FieldMap, integration_key: &str) -> Result<Self> {
        verify_if_signed(&raw, integration_key)?;

        let status = raw
            .get("status")
            .map(TransactionStatus::from)
            .unwrap_or_else(|| TransactionStatus::Unknown(String::new()));

        Ok(Self {
            reference: raw.get("reference").map(str::to_string),
            paynow_reference: raw.get("paynowreference").map(str::to_string),
            amount: raw.get("amount").and_then(|amount| amount.parse().ok()),
            status,
            poll_url: raw.get("pollurl").map(str::to_string),
            raw,
        })
    }

    /// The merchant transaction reference.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The gateway's own reference for the transaction.
    pub fn paynow_reference(&self) -> Option<&str> {
        self.paynow_reference.as_deref()
    }

    /// Transaction amount, when the gateway sent a parseable decimal.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// Current transaction status.
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Whether the transaction has been paid.
    pub fn paid(&self) -> bool {
        self.status == TransactionStatus::Paid
    }

    /// URL to poll for this transaction's status.
    pub fn poll_url(&self) -> Option<&str> {
        self.poll_url.as_deref()
    }

    /// The full response map, including fields this SDK does not model.
    pub fn raw(&self) -> &FieldMap {
        &self.raw
    }
}
