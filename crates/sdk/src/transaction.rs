use paynow_types::FieldMap;
use serde::{Deserialize, Serialize};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name of the item
    pub name: String,

    /// Item price as a decimal amount
    pub price: f64,
}

/// A payment being assembled for submission to the gateway.
///
/// A payment carries a merchant transaction reference and either an
/// ordered list of cart lines or a single flat amount. It holds no
/// network or hashing logic; [`to_fields`](Payment::to_fields) is its
/// only contract with the rest of the SDK.
///
/// # Example
///
/// ```
/// use paynow_sdk::Payment;
///
/// let mut payment = Payment::new("INV001");
/// payment.add("Book", 10.00).add("Pen", 1.50);
/// assert_eq!(payment.count(), 2);
/// assert_eq!(payment.total(), 11.50);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payment {
    reference: String,
    items: Vec<LineItem>,
    flat_amount: Option<f64>,
}

impl Payment {
    /// Create a payment with the given merchant reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into().trim().to_string(),
            items: Vec::new(),
            flat_amount: None,
        }
    }

    /// Create a payment for a single flat amount, with no cart lines.
    pub fn with_amount(reference: impl Into<String>, amount: f64) -> Self {
        Self {
            reference: reference.into().trim().to_string(),
            items: Vec::new(),
            flat_amount: Some(amount),
        }
    }

    /// Add a cart line.
    pub fn add(&mut self, name: impl Into<String>, price: f64) -> &mut Self {
        self.items.push(LineItem {
            name: name.into(),
            price,
        });
        self
    }

    /// Set the merchant transaction reference.
    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into().trim().to_string();
    }

    /// The merchant transaction reference, if set and non-empty.
    pub fn reference(&self) -> Option<&str> {
        if self.reference.is_empty() {
            None
        } else {
            Some(&self.reference)
        }
    }

    /// Number of cart lines; a flat-amount payment counts as one.
    pub fn count(&self) -> usize {
        if self.items.is_empty() {
            usize::from(self.flat_amount.is_some())
        } else {
            self.items.len()
        }
    }

    /// The cart lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total amount: the flat amount, or the sum of cart line prices.
    pub fn total(&self) -> f64 {
        match self.flat_amount {
            Some(amount) => amount,
            None => self.items.iter().map(|item| item.price).sum(),
        }
    }

    /// Serialize into the gateway field layout.
    ///
    /// Yields `reference`, then `item1`/`amount1`, `item2`/`amount2`, …
    /// in insertion order (or a single `amount` for a flat payment),
    /// then `total`.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set("reference", self.reference.as_str());

        if self.items.is_empty() {
            fields.set("amount", self.total());
        } else {
            for (index, item) in self.items.iter().enumerate() {
                fields.set(format!("item{}", index + 1), item.name.as_str());
                fields.set(format!("amount{}", index + 1), item.price);
            }
        }
        fields.set("total", self.total());
        fields
    }
}
