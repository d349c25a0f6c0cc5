//! Event Content
//!
//! The payload attached to a detected event is an open-ended mapping of
//! unknown depth. It is held as a recursive variant so consumers can do a
//! structural case split instead of probing JSON values at runtime.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A single value inside an event's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Nested mapping. JSON arrays land here keyed by element index.
    Nested(ContentMap),
}

impl ContentValue {
    /// Whether the value counts as present for display purposes.
    ///
    /// `null`, `false`, zero and the empty string are falsy. Any nested
    /// mapping is truthy, even an empty one.
    pub fn is_truthy(&self) -> bool {
        match self {
            ContentValue::Null => false,
            ContentValue::Bool(b) => *b,
            ContentValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            ContentValue::Text(s) => !s.is_empty(),
            ContentValue::Nested(_) => true,
        }
    }

    /// Textual form of a scalar value, `None` for nested mappings.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            ContentValue::Null => Some("null".to_string()),
            ContentValue::Bool(b) => Some(b.to_string()),
            ContentValue::Number(n) => Some(number_text(n)),
            ContentValue::Text(s) => Some(s.clone()),
            ContentValue::Nested(_) => None,
        }
    }

    /// Returns the nested mapping if this value is one.
    pub fn as_nested(&self) -> Option<&ContentMap> {
        match self {
            ContentValue::Nested(map) => Some(map),
            _ => None,
        }
    }

    /// Converts back into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            ContentValue::Null => Value::Null,
            ContentValue::Bool(b) => Value::Bool(*b),
            ContentValue::Number(n) => Value::Number(n.clone()),
            ContentValue::Text(s) => Value::String(s.clone()),
            ContentValue::Nested(map) => map.to_json(),
        }
    }
}

/// Formats a number the way a browser would print it: integral floats lose
/// their fractional part, and magnitudes from `1e21` up or below `1e-6` use
/// exponent form with a signed exponent.
fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(v) if v != 0.0 && (v.abs() >= 1e21 || v.abs() < 1e-6) => exponent_text(v),
        Some(v) if v.fract() == 0.0 => format!("{}", v as i128),
        Some(v) => v.to_string(),
        None => n.to_string(),
    }
}

fn exponent_text(v: f64) -> String {
    let formatted = format!("{:e}", v);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl From<Value> for ContentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ContentValue::Null,
            Value::Bool(b) => ContentValue::Bool(b),
            Value::Number(n) => ContentValue::Number(n),
            Value::String(s) => ContentValue::Text(s),
            Value::Array(items) => ContentValue::Nested(ContentMap::from_array(items)),
            Value::Object(map) => ContentValue::Nested(ContentMap::from(map)),
        }
    }
}

impl Serialize for ContentValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(ContentValue::from)
    }
}

/// Ordered mapping from string keys to content values.
///
/// Keys keep the order they had in the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMap {
    entries: Vec<(String, ContentValue)>,
}

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, replacing any existing value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: ContentValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose value is truthy, in source order.
    pub fn truthy_entries(&self) -> impl Iterator<Item = (&str, &ContentValue)> {
        self.iter().filter(|(_, v)| v.is_truthy())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a mapping from a JSON array, keyed by element index.
    fn from_array(items: Vec<Value>) -> Self {
        Self {
            entries: items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), ContentValue::from(v)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl From<Map<String, Value>> for ContentMap {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ContentValue::from(v)))
                .collect(),
        }
    }
}

impl Serialize for ContentMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(ContentMap::from)
    }
}
