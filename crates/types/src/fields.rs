use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A single canonicalized field value.
///
/// The gateway hashes and transmits the *text* form of every field, so
/// all values are coerced to a string exactly once, here: strings are
/// trimmed, amounts are rendered as two-decimal text. Both the standard
/// and the mobile checkout flows build their requests through this type,
/// so they cannot drift apart in how values are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue(String);

impl FieldValue {
    /// The canonical text form of this value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value, returning the canonical text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue(value.trim().to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue(value.trim().to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue(value.trim().to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        // Gateway amounts are decimal text with two places
        FieldValue(format!("{:.2}", value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue(value.to_string())
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue(value.to_string())
    }
}

/// An insertion-ordered map of field name to canonical text value.
///
/// The integrity hash is computed over the values *in map order*, so the
/// order fields are inserted is part of the wire contract. Outbound maps
/// are built in the canonical request order; inbound maps preserve
/// whatever order the transport delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap(IndexMap<String, String>);

impl FieldMap {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, canonicalizing the value.
    ///
    /// Inserting an existing key overwrites its value in place without
    /// changing its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into().into_string());
    }

    /// Get a field value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a field, returning its value.
    ///
    /// Uses a shift removal so the relative order of the remaining
    /// fields is unchanged.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to a MIME form-encoded body (`key=value&key=value`).
    pub fn to_form_body(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Parse a MIME form-encoded body into a field map.
    ///
    /// Values are percent-decoded but otherwise kept verbatim, in the
    /// order they appear in the body: the integrity hash on an inbound
    /// message covers exactly the bytes the gateway sent.
    pub fn from_form_body(body: &str) -> Self {
        let mut map = IndexMap::new();
        for (key, value) in form_urlencoded::parse(body.trim().as_bytes()) {
            map.insert(key.into_owned(), value.into_owned());
        }
        FieldMap(map)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
