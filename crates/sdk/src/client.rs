//! The [`Paynow`] client: request formatting, signing, and the
//! transaction lifecycle operations.
//!
//! Outbound requests are built in a fixed canonical order, which is part
//! of the wire contract because the integrity hash covers the values in
//! this order: the payment's own fields (`reference`, the `itemN` /
//! `amountN` pairs or `amount`, `total`), then `resulturl`, `returnurl`,
//! `id`, then (for mobile express checkout) `phone` and `method`, with
//! `hash` always last.

use paynow_types::{FieldMap, MobileMoneyMethod};
use tracing::{debug, info, warn};

use crate::{
    error::{PaynowError, Result},
    hash,
    response::{InitiateResponse, StatusResponse},
    transaction::Payment,
    transport::{HttpTransport, ReqwestTransport, RequestDescriptor},
};

/// Gateway endpoint for standard web checkout initiation.
pub const URL_INITIATE_TRANSACTION: &str =
    "https://www.paynow.co.zw/interface/initiatetransaction";

/// Gateway endpoint for mobile express checkout initiation.
pub const URL_INITIATE_MOBILE_TRANSACTION: &str =
    "https://www.paynow.co.zw/interface/remotetransaction";

/// Merchant integration configuration.
///
/// The integration key is the shared secret behind every hash this SDK
/// computes or verifies; it is never placed in a field map.
#[derive(Debug, Clone)]
pub struct Config {
    integration_id: String,
    integration_key: String,
    return_url: String,
    result_url: String,
}

impl Config {
    /// Create a configuration from the merchant's integration credentials.
    pub fn new(integration_id: impl Into<String>, integration_key: impl Into<String>) -> Self {
        Self {
            integration_id: integration_id.into(),
            integration_key: integration_key.into(),
            return_url: String::new(),
            result_url: String::new(),
        }
    }

    /// Set the URL the customer's browser returns to after checkout.
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = url.into();
        self
    }

    /// Set the URL the gateway posts status updates to.
    pub fn with_result_url(mut self, url: impl Into<String>) -> Self {
        self.result_url = url.into();
        self
    }

    /// Replace the return URL.
    pub fn set_return_url(&mut self, url: impl Into<String>) {
        self.return_url = url.into();
    }

    /// Replace the result URL.
    pub fn set_result_url(&mut self, url: impl Into<String>) {
        self.result_url = url.into();
    }

    /// The merchant integration id.
    pub fn integration_id(&self) -> &str {
        &self.integration_id
    }

    /// The return URL.
    pub fn return_url(&self) -> &str {
        &self.return_url
    }

    /// The result URL.
    pub fn result_url(&self) -> &str {
        &self.result_url
    }
}

/// Client for the Paynow gateway.
///
/// One client is shared by all operations of a session. It holds no
/// mutable state, so a single instance can serve concurrent calls as
/// long as the transport can.
///
/// # Example
///
/// ```ignore
/// use paynow_sdk::{Config, Payment, Paynow};
///
/// let config = Config::new("1201", "integration-key")
///     .with_return_url("https://merchant.example/return")
///     .with_result_url("https://merchant.example/result");
/// let client = Paynow::new(config);
///
/// let mut payment = Payment::new("INV001");
/// payment.add("Book", 10.00);
///
/// let response = client.send(&payment).await?;
/// if response.success() {
///     // redirect the customer, keep the poll URL
///     let poll_url = response.poll_url().unwrap().to_string();
///     let status = client.poll_transaction(&poll_url).await?;
///     println!("{}", status.status());
/// }
/// ```
pub struct Paynow<T = ReqwestTransport> {
    config: Config,
    transport: T,
}

impl Paynow<ReqwestTransport> {
    /// Create a client with the default reqwest transport.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            transport: ReqwestTransport::new(),
        }
    }
}

impl<T: HttpTransport> Paynow<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// The merchant configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initiate a standard web checkout.
    ///
    /// Fails with [`PaynowError::EmptyTransactionReference`] or
    /// [`PaynowError::EmptyCart`] before any transport call when the
    /// payment is incomplete. On success the returned acknowledgment
    /// carries the browser redirect URL and the poll URL.
    pub async fn send(&self, payment: &Payment) -> Result<InitiateResponse> {
        let mut fields = self.build_request(payment)?;
        self.sign(&mut fields);

        debug!(reference = payment.reference(), "Initiating transaction");
        self.initiate(URL_INITIATE_TRANSACTION, fields, payment).await
    }

    /// Initiate a mobile money express checkout.
    ///
    /// `method` is the wire token of the mobile money method (only
    /// `"ecocash"` is implemented); `phone` must be a valid Econet
    /// subscriber number. Both are validated before a request is
    /// formatted, in addition to the [`send`](Paynow::send)
    /// preconditions.
    pub async fn send_mobile(
        &self,
        payment: &Payment,
        phone: &str,
        method: &str,
    ) -> Result<InitiateResponse> {
        let method: MobileMoneyMethod = method.parse()?;
        let phone = phone.trim();
        if !is_valid_ecocash_number(phone) {
            return Err(PaynowError::InvalidPhone(phone.to_string()));
        }

        let mut fields = self.build_request(payment)?;
        fields.set("phone", phone);
        fields.set("method", method.wire_token());
        self.sign(&mut fields);

        debug!(reference = payment.reference(), %method, "Initiating mobile transaction");
        self.initiate(URL_INITIATE_MOBILE_TRANSACTION, fields, payment)
            .await
    }

    /// Poll the gateway for a transaction's current status.
    ///
    /// `url` is the poll URL returned in an initiate acknowledgment or a
    /// status update. Polling is an idempotent read and may be repeated
    /// any number of times.
    pub async fn poll_transaction(&self, url: &str) -> Result<StatusResponse> {
        let url = url.trim();
        debug!(url, "Polling transaction status");

        let request = RequestDescriptor::post(url, FieldMap::new());
        let raw = self.transport.execute(&request).await?;
        StatusResponse::from_fields(raw, &self.config.integration_key)
    }

    /// Interpret the gateway's asynchronous status-update callback.
    ///
    /// The embedding web layer owns the inbound request and passes its
    /// form-encoded body here explicitly; parse it with
    /// [`FieldMap::from_form_body`]. No outbound call is made.
    pub fn process_status_update(&self, raw: FieldMap) -> Result<StatusResponse> {
        let response = StatusResponse::from_fields(raw, &self.config.integration_key)?;
        info!(
            reference = response.reference(),
            status = %response.status(),
            "Processed status update"
        );
        Ok(response)
    }

    /// Build the unsigned field map for a checkout initiation.
    fn build_request(&self, payment: &Payment) -> Result<FieldMap> {
        if payment.reference().is_none() {
            return Err(PaynowError::EmptyTransactionReference);
        }
        if payment.count() == 0 {
            return Err(PaynowError::EmptyCart);
        }

        let mut fields = payment.to_fields();
        fields.set("resulturl", self.config.result_url.as_str());
        fields.set("returnurl", self.config.return_url.as_str());
        fields.set("id", self.config.integration_id.as_str());
        Ok(fields)
    }

    /// Append the integrity hash; must be the last field written.
    fn sign(&self, fields: &mut FieldMap) {
        let digest = hash::make(fields, &self.config.integration_key);
        fields.set(hash::HASH_FIELD, digest);
    }

    async fn initiate(
        &self,
        url: &str,
        fields: FieldMap,
        payment: &Payment,
    ) -> Result<InitiateResponse> {
        let request = RequestDescriptor::post(url, fields);
        let raw = self.transport.execute(&request).await?;
        let response = InitiateResponse::from_fields(raw, &self.config.integration_key)?;

        if let Some(error) = response.error() {
            if error.to_ascii_lowercase().contains("integration") {
                return Err(PaynowError::InvalidIntegration(error.to_string()));
            }
        }

        if response.success() {
            info!(reference = payment.reference(), "Transaction initiated");
        } else {
            warn!(
                reference = payment.reference(),
                error = response.error(),
                "Gateway rejected transaction initiation"
            );
        }
        Ok(response)
    }
}

/// Econet subscriber numbers: ten digits, `07`, then `7` or `8`, then
/// seven more digits.
fn is_valid_ecocash_number(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 10
        && phone.starts_with("07")
        && matches!(bytes[2], b'7' | b'8')
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;

    /// Transport double: counts calls, records the last request, and
    /// replies with a canned field map.
    struct StubTransport {
        calls: AtomicUsize,
        response: FieldMap,
        last_request: Mutex<Option<RequestDescriptor>>,
    }

    impl StubTransport {
        fn returning(response: FieldMap) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response,
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> RequestDescriptor {
            self.last_request
                .lock()
                .unwrap()
                .clone()
                .expect("no request was executed")
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn execute(&self, request: &RequestDescriptor) -> Result<FieldMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(self.response.clone())
        }
    }

    const KEY: &str = "integration-key";

    fn config() -> Config {
        Config::new("1201", KEY)
            .with_return_url("https://merchant.example/return")
            .with_result_url("https://merchant.example/result")
    }

    fn signed(mut fields: FieldMap) -> FieldMap {
        let digest = hash::make(&fields, KEY);
        fields.set(hash::HASH_FIELD, digest);
        fields
    }

    fn ok_response() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set("status", "Ok");
        fields.set("browserurl", "https://gateway.example/pay/abc");
        fields.set("pollurl", "https://gateway.example/poll/abc");
        signed(fields)
    }

    fn book_payment() -> Payment {
        let mut payment = Payment::new("INV001");
        payment.add("Book", 10.0);
        payment
    }

    #[tokio::test]
    async fn test_send_without_reference_never_touches_the_transport() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let mut payment = Payment::default();
        payment.add("Book", 10.0);

        let err = client.send(&payment).await.unwrap_err();
        assert!(matches!(err, PaynowError::EmptyTransactionReference));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_with_empty_cart_never_touches_the_transport() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client.send(&Payment::new("INV001")).await.unwrap_err();
        assert!(matches!(err, PaynowError::EmptyCart));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_formats_the_canonical_request() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let response = client.send(&book_payment()).await.unwrap();
        assert!(response.success());

        let request = stub.last_request();
        assert_eq!(request.url(), URL_INITIATE_TRANSACTION);

        let fields = request.fields();
        assert_eq!(fields.get("reference"), Some("INV001"));
        assert_eq!(fields.get("item1"), Some("Book"));
        assert_eq!(fields.get("amount1"), Some("10.00"));
        assert_eq!(fields.get("total"), Some("10.00"));
        assert_eq!(fields.get("resulturl"), Some("https://merchant.example/result"));
        assert_eq!(fields.get("returnurl"), Some("https://merchant.example/return"));
        assert_eq!(fields.get("id"), Some("1201"));

        let digest = fields.get("hash").unwrap();
        assert_eq!(digest.len(), 128);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert!(hash::verify(fields, KEY));
    }

    #[tokio::test]
    async fn test_send_mobile_accepts_a_valid_ecocash_number() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let response = client
            .send_mobile(&book_payment(), "0771234567", "ecocash")
            .await
            .unwrap();
        assert!(response.success());

        let request = stub.last_request();
        assert_eq!(request.url(), URL_INITIATE_MOBILE_TRANSACTION);
        let fields = request.fields();
        assert_eq!(fields.get("phone"), Some("0771234567"));
        assert_eq!(fields.get("method"), Some("ecocash"));
        assert!(hash::verify(fields, KEY));
    }

    #[tokio::test]
    async fn test_send_mobile_rejects_a_malformed_number() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client
            .send_mobile(&book_payment(), "012345", "ecocash")
            .await
            .unwrap_err();
        assert!(matches!(err, PaynowError::InvalidPhone(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_mobile_rejects_an_unsupported_method() {
        let stub = StubTransport::returning(ok_response());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client
            .send_mobile(&book_payment(), "0771234567", "telecash")
            .await
            .unwrap_err();
        assert!(matches!(err, PaynowError::UnsupportedMethod(ref m) if m.as_str() == "telecash"));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsigned_response_still_constructs() {
        let mut response = FieldMap::new();
        response.set("status", "Ok");
        response.set("pollurl", "https://gateway.example/poll/abc");

        let stub = StubTransport::returning(response);
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let response = client.send(&book_payment()).await.unwrap();
        assert!(response.success());
    }

    #[tokio::test]
    async fn test_bad_response_hash_aborts() {
        let mut response = FieldMap::new();
        response.set("status", "Ok");
        response.set("hash", "0BAD");

        let stub = StubTransport::returning(response);
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client.send(&book_payment()).await.unwrap_err();
        assert!(matches!(err, PaynowError::HashMismatch));
    }

    #[tokio::test]
    async fn test_gateway_integration_rejection_surfaces() {
        let mut response = FieldMap::new();
        response.set("status", "Error");
        response.set("error", "Invalid integration id");

        let stub = StubTransport::returning(response);
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client.send(&book_payment()).await.unwrap_err();
        assert!(matches!(err, PaynowError::InvalidIntegration(_)));
    }

    #[tokio::test]
    async fn test_gateway_errors_come_back_as_failed_responses() {
        let mut response = FieldMap::new();
        response.set("status", "Error");
        response.set("error", "Invalid amount");

        let stub = StubTransport::returning(response);
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let response = client.send(&book_payment()).await.unwrap();
        assert!(!response.success());
        assert_eq!(response.error(), Some("Invalid amount"));
    }

    #[tokio::test]
    async fn test_poll_transaction_trims_the_url_and_sends_no_fields() {
        let mut status = FieldMap::new();
        status.set("reference", "INV001");
        status.set("status", "paid");

        let stub = StubTransport::returning(signed(status));
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let response = client
            .poll_transaction("  https://gateway.example/poll/abc \n")
            .await
            .unwrap();
        assert!(response.paid());

        let request = stub.last_request();
        assert_eq!(request.url(), "https://gateway.example/poll/abc");
        assert!(request.fields().is_empty());
    }

    #[test]
    fn test_process_status_update_from_a_webhook_body() {
        let mut update = FieldMap::new();
        update.set("reference", "INV001");
        update.set("paynowreference", "10023");
        update.set("amount", "10.00");
        update.set("status", "paid");
        let update = signed(update);

        let stub = StubTransport::returning(FieldMap::new());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let body = update.to_form_body();
        let response = client
            .process_status_update(FieldMap::from_form_body(&body))
            .unwrap();
        assert!(response.paid());
        assert_eq!(response.paynow_reference(), Some("10023"));
        assert_eq!(response.amount(), Some(10.0));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn test_process_status_update_rejects_a_tampered_body() {
        let mut update = FieldMap::new();
        update.set("reference", "INV001");
        update.set("status", "created");
        let mut update = signed(update);
        update.set("status", "paid");

        let stub = StubTransport::returning(FieldMap::new());
        let client = Paynow::with_transport(config(), Arc::clone(&stub));

        let err = client.process_status_update(update).unwrap_err();
        assert!(matches!(err, PaynowError::HashMismatch));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_ecocash_number("0771234567"));
        assert!(is_valid_ecocash_number("0781234567"));
        assert!(!is_valid_ecocash_number("012345"));
        assert!(!is_valid_ecocash_number("0751234567"));
        assert!(!is_valid_ecocash_number("07712345678"));
        assert!(!is_valid_ecocash_number("077123456a"));
    }
}
