//! Request and response envelopes exchanged with the web service.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{ITopError, ALL_FIELDS};

/// Name stamped into the audit comment of every write.
pub const AUDIT_TOOL_NAME: &str = "rusty";

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The fixed `core/*` operation vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "core/create",
            Self::Get => "core/get",
            Self::Update => "core/update",
            Self::Delete => "core/delete",
        }
    }

    /// Writes carry an audit comment.
    pub fn is_write(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ObjectKey
// ---------------------------------------------------------------------------

/// Lookup key: a numeric primary key or an OQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ObjectKey {
    Id(u64),
    Query(String),
}

impl From<u64> for ObjectKey {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<String> for ObjectKey {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

// ---------------------------------------------------------------------------
// ApiRequest
// ---------------------------------------------------------------------------

/// One call against the web service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub operation: Operation,
    pub class: String,
    pub key: Option<ObjectKey>,
    pub fields: Option<Map<String, Value>>,
    pub output_fields: String,
}

/// Wire shape of the `json_data` form field. Field order is the wire order.
#[derive(Serialize)]
struct JsonData<'a> {
    operation: Operation,
    class: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a ObjectKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_fields: Option<&'a str>,
}

impl ApiRequest {
    pub fn new(operation: Operation, class: impl Into<String>) -> Self {
        Self {
            operation,
            class: class.into(),
            key: None,
            fields: None,
            output_fields: ALL_FIELDS.to_owned(),
        }
    }

    pub fn create(class: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self::new(Operation::Create, class).with_fields(fields)
    }

    pub fn get(class: impl Into<String>, key: impl Into<ObjectKey>) -> Self {
        Self::new(Operation::Get, class).with_key(key)
    }

    pub fn update(class: impl Into<String>, id: u64, fields: Map<String, Value>) -> Self {
        Self::new(Operation::Update, class).with_key(id).with_fields(fields)
    }

    pub fn delete(class: impl Into<String>, id: u64) -> Self {
        Self::new(Operation::Delete, class).with_key(id)
    }

    pub fn with_key(mut self, key: impl Into<ObjectKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_output_fields(mut self, output_fields: impl Into<String>) -> Self {
        self.output_fields = output_fields.into();
        self
    }

    /// `"<tool> automation - <operation> <class>"` for writes, `None` for reads.
    pub fn audit_comment(&self) -> Option<String> {
        self.operation
            .is_write()
            .then(|| format!("{AUDIT_TOOL_NAME} automation - {} {}", self.operation, self.class))
    }

    /// Serialise the `json_data` form field.
    ///
    /// # Errors
    /// [`ITopError::InvalidRequest`] if a key is missing on get/update/delete
    /// or present on create.
    pub fn json_data(&self) -> Result<String, ITopError> {
        match (self.operation, &self.key) {
            (Operation::Create, Some(_)) => {
                return Err(ITopError::InvalidRequest(format!(
                    "{} must not carry a key",
                    self.operation
                )));
            }
            (Operation::Get | Operation::Update | Operation::Delete, None) => {
                return Err(ITopError::InvalidRequest(format!(
                    "{} requires a key",
                    self.operation
                )));
            }
            _ => {}
        }

        let output_fields = match self.output_fields.as_str() {
            "" | ALL_FIELDS => None,
            other => Some(other),
        };

        let data = JsonData {
            operation: self.operation,
            class: &self.class,
            comment: self.audit_comment(),
            key: self.key.as_ref(),
            fields: self.fields.as_ref(),
            output_fields,
        };
        Ok(serde_json::to_string(&data)?)
    }
}

// ---------------------------------------------------------------------------
// ApiResponse
// ---------------------------------------------------------------------------

/// Top-level response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub version: Option<String>,
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub objects: Option<ObjectMap>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// One entry of the `objects` map.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub key: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Map<String, Value>,
}

impl ApiObject {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `objects` map, kept in the order the entries appeared on the wire.
#[derive(Debug, Clone, Default)]
pub struct ObjectMap(Vec<(String, ApiObject)>);

impl ObjectMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiObject)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn first(&self) -> Option<(&str, &ApiObject)> {
        self.iter().next()
    }
}

impl<'de> Deserialize<'de> for ObjectMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectMapVisitor;

        impl<'de> Visitor<'de> for ObjectMapVisitor {
            type Value = ObjectMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of iTop objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ObjectMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, object)) = access.next_entry::<String, ApiObject>()? {
                    entries.push((key, object));
                }
                Ok(ObjectMap(entries))
            }
        }

        deserializer.deserialize_map(ObjectMapVisitor)
    }
}
