//! Paynow SDK
//!
//! This crate provides a client for the Paynow payment gateway: build a
//! payment from cart line items, submit it for web or mobile-money
//! checkout, poll for its status, and interpret the gateway's
//! asynchronous status-update callbacks. Every message in both
//! directions is authenticated with a SHA-512 hash over the ordered
//! field values and the merchant's integration key.
//!
//! # Overview
//!
//! The SDK is built from four pieces:
//!
//! - [`Payment`] - cart builder (reference plus line items or a flat amount)
//! - [`Paynow`] - the client: formats, signs, and submits requests
//! - [`InitiateResponse`] / [`StatusResponse`] - verified, typed views
//!   over the gateway's responses
//! - [`HttpTransport`] - the pluggable HTTP seam, with a reqwest-backed
//!   default
//!
//! # Quick Start
//!
//! ```ignore
//! use paynow_sdk::{Config, Payment, Paynow};
//!
//! #[tokio::main]
//! async fn main() -> paynow_sdk::Result<()> {
//!     let config = Config::new("your-integration-id", "your-integration-key")
//!         .with_return_url("https://merchant.example/return")
//!         .with_result_url("https://merchant.example/result");
//!     let client = Paynow::new(config);
//!
//!     // Build the cart
//!     let mut payment = Payment::new("INV001");
//!     payment.add("Book", 10.00).add("Pen", 1.50);
//!
//!     // Standard web checkout: redirect the customer afterwards
//!     let response = client.send(&payment).await?;
//!     if response.success() {
//!         println!("redirect to {}", response.redirect_url().unwrap_or_default());
//!
//!         // Later: check where the transaction got to
//!         let status = client.poll_transaction(response.poll_url().unwrap()).await?;
//!         if status.paid() {
//!             // fulfil the order
//!         }
//!     }
//!
//!     // Or: mobile money express checkout
//!     let response = client.send_mobile(&payment, "0771234567", "ecocash").await?;
//!     println!("{:?}", response.instructions());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Status updates
//!
//! The gateway also pushes status updates to the configured result URL.
//! The embedding web server routes that request's form-encoded body into
//! [`Paynow::process_status_update`]:
//!
//! ```ignore
//! use paynow_sdk::FieldMap;
//!
//! let update = client.process_status_update(FieldMap::from_form_body(&body))?;
//! println!("{} is now {}", update.reference().unwrap_or("?"), update.status());
//! ```

pub mod client;
pub mod error;
pub mod hash;
pub mod response;
pub mod transaction;
pub mod transport;

// Re-export main types at crate root
pub use client::{Config, Paynow, URL_INITIATE_MOBILE_TRANSACTION, URL_INITIATE_TRANSACTION};
pub use error::{PaynowError, Result};
pub use paynow_types::{FieldMap, FieldValue, MobileMoneyMethod, TransactionStatus};
pub use response::{InitiateResponse, StatusResponse};
pub use transaction::{LineItem, Payment};
pub use transport::{HttpMethod, HttpTransport, ReqwestTransport, RequestDescriptor};
