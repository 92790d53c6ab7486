use std::fmt;

use serde_json::{Map, Value};

/// Opaque contact identifier.
///
/// Compared by exact string equality; the dataset encoding (plain string or
/// `{"$oid": ...}`) is resolved by the loader before a value reaches here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(String);

impl ContactId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A directory record.
///
/// Only `id`, `full_name` and `is_favourite` have meaning to the service.
/// Both are kept as the stored JSON values: the dataset is not validated
/// beyond presence, so a malformed value only fails the operations that
/// read it. Every other field of the source record is kept in `attributes`
/// and handed back to clients untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub full_name: Value,
    pub favourite: Value,
    pub attributes: Map<String, Value>,
}

impl Contact {
    #[must_use]
    pub fn new(id: impl Into<ContactId>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: Value::String(full_name.into()),
            favourite: Value::Bool(false),
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_favourite(mut self, is_favourite: bool) -> Self {
        self.favourite = Value::Bool(is_favourite);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Strictly `true`; truthy non-boolean values do not count.
    #[must_use]
    pub fn is_favourite(&self) -> bool {
        matches!(self.favourite, Value::Bool(true))
    }

    /// Case-insensitive substring match against `full_name`.
    ///
    /// `needle` must already be lowercased. Returns `None` when the stored
    /// name is not a string.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> Option<bool> {
        self.full_name
            .as_str()
            .map(|name| name.to_lowercase().contains(needle))
    }

    /// Store the negation of the current flag, read by truthiness, so a
    /// malformed stored value still toggles to a boolean.
    pub fn toggle_favourite(&mut self) {
        self.favourite = Value::Bool(!is_truthy(&self.favourite));
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
