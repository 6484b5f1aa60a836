//! Named-parameter accessors.
//!
//! Each transport family carries request parameters differently: buffer and
//! stream messages embed a JSON object, server transports carry a query
//! string or form fields. The [`Params`] trait puts one uniform lookup
//! interface in front of all of them so handlers never see the source.
//!
//! An accessor is exclusively owned by its envelope and dropped with it.

use serde_json::{Map, Value};
use std::fmt;

/// Uniform read-only access to a request's named parameters.
pub trait Params: fmt::Debug {
    /// Number of parameters present.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a parameter named `name` is present.
    fn has(&self, name: &str) -> bool;

    /// The value of `name`, rendered as text.
    fn get(&self, name: &str) -> Option<String>;
}

/// The empty parameter source, used before parse and by transports that
/// carry no parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParams;

impl Params for NoParams {
    fn len(&self) -> usize {
        0
    }

    fn has(&self, _name: &str) -> bool {
        false
    }

    fn get(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Parameters carried as a JSON object, the buffer/stream variant.
///
/// Non-string values are rendered with their JSON notation, so `{"n": 3}`
/// yields `get("n") == Some("3")`.
#[derive(Debug, Default)]
pub struct JsonParams {
    entries: Map<String, Value>,
}

impl JsonParams {
    #[must_use]
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Build from an optional JSON value; anything but an object yields an
    /// empty source.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        Self {
            entries: value
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl Params for JsonParams {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// Parameters carried as a url-encoded query string, the server variant.
///
/// Duplicate names keep every occurrence; lookup returns the last one.
#[derive(Debug, Default)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a query string (without the leading `?`), decoding each pair.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let entries = url::form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { entries }
    }
}

impl Params for QueryParams {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    fn get(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .rfind(|(n, _)| n == name)
            .map(|(_, value)| value.clone())
    }
}
