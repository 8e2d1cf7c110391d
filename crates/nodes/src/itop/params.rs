//! Typed parameter bags for the iTop node.
//!
//! The host hands every item a JSON parameter bag of the form
//! `{"resource": "...", "operation": "...", ...}`. It is decoded here into a
//! closed set of operations, so shape errors are reported before any request
//! is built.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::organization::OrganizationOperation;
use super::person::PersonOperation;
use super::ticket::TicketOperation;
use crate::NodeError;

/// One resource/operation pair with its parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resource", rename_all = "camelCase")]
pub enum ITopParameters {
    Ticket(TicketOperation),
    Person(PersonOperation),
    Organization(OrganizationOperation),
}

impl ITopParameters {
    pub fn from_value(value: Value) -> Result<Self, NodeError> {
        serde_json::from_value(value).map_err(|e| NodeError::Validation(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Value enums
// ---------------------------------------------------------------------------

/// Impact / urgency scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Lifecycle status of persons and organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notify {
    Yes,
    No,
}

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

/// A user-supplied extension attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomField {
    pub field_id: String,
    pub field_value: String,
}

/// Entries with an empty id or value are ignored.
pub fn custom_field_map(entries: &[CustomField]) -> Map<String, Value> {
    entries
        .iter()
        .filter(|f| !f.field_id.is_empty() && !f.field_value.is_empty())
        .map(|f| (f.field_id.clone(), Value::String(f.field_value.clone())))
        .collect()
}

// ---------------------------------------------------------------------------
// Field maps
// ---------------------------------------------------------------------------

/// Serialise a field struct, dropping nulls and empty strings.
pub fn field_map<T: Serialize>(fields: &T) -> Result<Map<String, Value>, NodeError> {
    match serde_json::to_value(fields).map_err(|e| NodeError::Validation(e.to_string()))? {
        Value::Object(map) => Ok(compact(map)),
        other => Err(NodeError::Validation(format!(
            "expected a field object, got {other}"
        ))),
    }
}

/// Drop entries whose value is null or an empty string.
pub fn compact(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, v)| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

/// Overlay `layer` onto `base`. Existing keys keep their position.
pub fn merge(mut base: Map<String, Value>, layer: Map<String, Value>) -> Map<String, Value> {
    for (k, v) in layer {
        base.insert(k, v);
    }
    base
}

// ---------------------------------------------------------------------------
// Id parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn parse_raw<E: serde::de::Error>(raw: RawId) -> Result<Option<u64>, E> {
    match raw {
        RawId::Number(n) => Ok(Some(n)),
        RawId::Text(s) if s.trim().is_empty() => Ok(None),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid id '{s}'"))),
    }
}

/// Accept `123` or `"123"`.
pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse_raw::<D::Error>(RawId::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("id must not be empty"))
}

/// Like [`deserialize_id`], mapping null and `""` to `None`.
pub(crate) fn deserialize_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<RawId>::deserialize(deserializer)? {
        Some(raw) => parse_raw(raw),
        None => Ok(None),
    }
}

/// Ids of 0 mean "not set" in filters.
pub(crate) fn non_zero(id: Option<u64>) -> Option<u64> {
    id.filter(|id| *id != 0)
}

/// Reject empty mandatory strings.
pub(crate) fn require(value: &str, what: &str) -> Result<(), NodeError> {
    if value.trim().is_empty() {
        return Err(NodeError::Validation(format!("{what} is required")));
    }
    Ok(())
}
