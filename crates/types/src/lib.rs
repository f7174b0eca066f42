//! Shared wire-level types for the Paynow gateway SDK.
//!
//! Everything the gateway sends or receives is a flat, ordered set of
//! text fields. This crate defines that representation ([`FieldMap`]),
//! the canonicalization applied to values before they are hashed or
//! transmitted ([`FieldValue`]), and the enums for the gateway's status
//! and mobile-money wire tokens.

pub mod fields;
pub mod status;

pub use fields::{FieldMap, FieldValue};
pub use status::{MobileMoneyMethod, TransactionStatus, UnsupportedMethodError};
