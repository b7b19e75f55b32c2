//! Record attribute values.
//!
//! The attribute value space is a closed tagged union. A one-key JSON
//! object whose sole key is the literal `"/"` and whose value is a string
//! is a link to another record; everything else maps structurally. Links
//! are a distinct variant so storage never has to inspect shapes twice;
//! resolution is a separate read-path pass and links are never followed on
//! write.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key marking a link object in client JSON.
pub const LINK_KEY: &str = "/";

/// An open map from attribute name to value. BTreeMap keeps keys sorted,
/// which the canonical encoding relies on.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Reference to another record by content id.
    Link { id: String },
    List(Vec<AttributeValue>),
    Object(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Structural conversion from client JSON.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttributeValue::Int(i)
                } else {
                    AttributeValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => AttributeValue::Text(s),
            Value::Array(items) => {
                AttributeValue::List(items.into_iter().map(AttributeValue::from_json).collect())
            }
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(id)) = map.get(LINK_KEY) {
                        return AttributeValue::Link { id: id.clone() };
                    }
                }
                AttributeValue::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, AttributeValue::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// The JSON form used for canonical encoding and presentation.
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::Null => Value::Null,
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Int(i) => Value::from(*i),
            AttributeValue::Float(f) => {
                serde_json::Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
            AttributeValue::Text(s) => Value::String(s.clone()),
            AttributeValue::Link { id } => {
                let mut map = serde_json::Map::new();
                map.insert(LINK_KEY.to_string(), Value::String(id.clone()));
                Value::Object(map)
            }
            AttributeValue::List(items) => {
                Value::Array(items.iter().map(AttributeValue::to_json).collect())
            }
            AttributeValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// The target id if this value is a link.
    pub fn link_target(&self) -> Option<&str> {
        match self {
            AttributeValue::Link { id } => Some(id),
            _ => None,
        }
    }
}

/// Parse a whole attribute map from client JSON. Rejects non-object roots.
pub fn attributes_from_json(value: Value) -> Option<Attributes> {
    match value {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(k, v)| (k, AttributeValue::from_json(v)))
                .collect(),
        ),
        _ => None,
    }
}

/// The JSON form of a whole attribute map.
pub fn attributes_to_json(attributes: &Attributes) -> Value {
    Value::Object(
        attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

/// Ids of every link-valued attribute, in key order.
pub fn link_targets(attributes: &Attributes) -> Vec<String> {
    attributes
        .values()
        .filter_map(|value| value.link_target().map(str::to_string))
        .collect()
}
