use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Gateway-side state of a transaction.
///
/// Parsed case-insensitively from the gateway's wire tokens; tokens this
/// SDK does not know yet are preserved in [`TransactionStatus::Unknown`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction paid, funds credited to the merchant account.
    Paid,
    /// Paid, but the merchant has not yet confirmed delivery.
    AwaitingDelivery,
    /// Paid and the merchant confirmed delivery.
    Delivered,
    /// Transaction created on the gateway, not yet paid.
    Created,
    /// Customer sent to the payment method, payment pending.
    Sent,
    /// Transaction cancelled by the customer or the gateway.
    Cancelled,
    /// Customer opened a dispute against the transaction.
    Disputed,
    /// Transaction refunded to the customer.
    Refunded,
    /// Payment attempt failed.
    Failed,
    /// A wire token this SDK does not recognize.
    Unknown(String),
}

impl TransactionStatus {
    /// The gateway wire token for this status.
    pub fn wire_token(&self) -> &str {
        match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::AwaitingDelivery => "awaiting delivery",
            TransactionStatus::Delivered => "delivered",
            TransactionStatus::Created => "created",
            TransactionStatus::Sent => "sent",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Disputed => "disputed",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Unknown(token) => token,
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "paid" => TransactionStatus::Paid,
            "awaiting delivery" => TransactionStatus::AwaitingDelivery,
            "delivered" => TransactionStatus::Delivered,
            "created" => TransactionStatus::Created,
            "sent" => TransactionStatus::Sent,
            "cancelled" => TransactionStatus::Cancelled,
            "disputed" => TransactionStatus::Disputed,
            "refunded" => TransactionStatus::Refunded,
            "failed" => TransactionStatus::Failed,
            other => TransactionStatus::Unknown(other.to_string()),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_token())
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_token())
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(TransactionStatus::from(token.as_str()))
    }
}

/// The requested mobile money method is not supported by this SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mobile money method not implemented: {0}")]
pub struct UnsupportedMethodError(pub String);

/// Mobile money method for express checkout.
///
/// Ecocash is the only method the gateway's express flow supports today;
/// parsing anything else fails so the check happens at the type boundary,
/// before a request is ever formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobileMoneyMethod {
    Ecocash,
}

impl MobileMoneyMethod {
    /// The gateway wire token for this method.
    pub fn wire_token(&self) -> &str {
        match self {
            MobileMoneyMethod::Ecocash => "ecocash",
        }
    }
}

impl FromStr for MobileMoneyMethod {
    type Err = UnsupportedMethodError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ecocash" => Ok(MobileMoneyMethod::Ecocash),
            other => Err(UnsupportedMethodError(other.to_string())),
        }
    }
}

impl Display for MobileMoneyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_token())
    }
}
