//! Flattening of response envelopes into `{id, ...fields}` records.

use serde_json::{Map, Value};
use tracing::warn;

use crate::{ApiObject, ApiResponse, ITopError};

/// A flat output record: `id` first, then the object's fields.
pub type Record = Map<String, Value>;

/// Result of a bulk fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchAll {
    /// Successfully fetched objects, in response order.
    pub records: Vec<Record>,
    /// Objects skipped because their own `code` was non-zero.
    pub dropped: usize,
}

/// Parse an object key (`145` or `"145"`) as an integer id.
pub fn parse_id(key: &Value) -> Result<i64, ITopError> {
    match key {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ITopError::InvalidKey(key.to_string()))
}

impl ApiObject {
    /// Merge the key (as `id`) with the field map. A field named `id`
    /// overrides the value but the key stays in first position.
    pub fn to_record(&self) -> Result<Record, ITopError> {
        let mut record = Record::new();
        record.insert("id".to_owned(), Value::from(parse_id(&self.key)?));
        for (name, value) in &self.fields {
            record.insert(name.clone(), value.clone());
        }
        Ok(record)
    }
}

/// Extract exactly one record from a single-object response.
///
/// # Errors
/// - [`ITopError::NoObjects`] if `objects` is absent or null.
/// - [`ITopError::EmptyObjects`] if `objects` has no entries.
/// - [`ITopError::Object`] if the first object's `code` is non-zero.
pub fn extract_object(response: &ApiResponse) -> Result<Record, ITopError> {
    let objects = response.objects.as_ref().ok_or(ITopError::NoObjects)?;
    let (_, object) = objects.first().ok_or(ITopError::EmptyObjects)?;

    if !object.is_success() {
        return Err(ITopError::Object(object.message.clone()));
    }

    object.to_record()
}

/// Keep every successful object of a bulk response; failures are counted.
pub fn collect_records(response: &ApiResponse) -> FetchAll {
    let mut result = FetchAll::default();

    let Some(objects) = response.objects.as_ref() else {
        return result;
    };

    for (object_key, object) in objects.iter() {
        if !object.is_success() {
            warn!(object_key, code = object.code, message = %object.message, "dropping failed object");
            result.dropped += 1;
            continue;
        }
        match object.to_record() {
            Ok(record) => result.records.push(record),
            Err(e) => {
                warn!(object_key, "dropping object: {e}");
                result.dropped += 1;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: Value) -> ApiResponse {
        serde_json::from_value(value).expect("valid envelope")
    }

    #[test]
    fn single_object_is_flattened_with_numeric_id() {
        let resp = response(json!({
            "code": 0,
            "objects": {
                "UserRequest::145": {
                    "code": 0, "message": "created", "class": "UserRequest", "key": "145",
                    "fields": { "title": "Printer down", "status": "new" }
                }
            }
        }));

        let record = extract_object(&resp).unwrap();
        assert_eq!(
            Value::Object(record),
            json!({ "id": 145, "title": "Printer down", "status": "new" })
        );
    }

    #[test]
    fn id_comes_first_in_the_record() {
        let resp = response(json!({
            "code": 0,
            "objects": { "Person::3": { "code": 0, "key": 3, "fields": { "name": "Doe" } } }
        }));
        let record = extract_object(&resp).unwrap();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name"]);
    }

    #[test]
    fn missing_or_null_objects_fail() {
        assert!(matches!(
            extract_object(&response(json!({ "code": 0 }))),
            Err(ITopError::NoObjects)
        ));
        assert!(matches!(
            extract_object(&response(json!({ "code": 0, "objects": null }))),
            Err(ITopError::NoObjects)
        ));
    }

    #[test]
    fn empty_objects_fail() {
        let err = extract_object(&response(json!({ "code": 0, "objects": {} }))).unwrap_err();
        assert!(matches!(err, ITopError::EmptyObjects));
    }

    #[test]
    fn failed_object_surfaces_its_message() {
        let resp = response(json!({
            "code": 0,
            "objects": { "Person::1": { "code": 1, "message": "Access denied", "key": 1, "fields": {} } }
        }));
        let err = extract_object(&resp).unwrap_err();
        assert!(matches!(&err, ITopError::Object(m) if m == "Access denied"));
        assert_eq!(err.to_string(), "iTop API error: Access denied");
    }

    #[test]
    fn only_the_first_object_is_considered() {
        let resp = response(json!({
            "code": 0,
            "objects": {
                "Person::4": { "code": 0, "key": "4", "fields": { "name": "First" } },
                "Person::5": { "code": 1, "message": "ignored", "key": "5", "fields": {} }
            }
        }));
        assert_eq!(extract_object(&resp).unwrap()["name"], "First");
    }

    #[test]
    fn bulk_collect_drops_failed_objects() {
        let resp = response(json!({
            "code": 0,
            "objects": {
                "Person::1": { "code": 0, "key": 1, "fields": { "name": "X" } },
                "Person::2": { "code": 1, "key": 2, "fields": { "name": "Y" } }
            }
        }));

        let fetched = collect_records(&resp);
        assert_eq!(fetched.dropped, 1);
        assert_eq!(fetched.records.len(), 1);
        assert_eq!(Value::Object(fetched.records[0].clone()), json!({ "id": 1, "name": "X" }));
    }

    #[test]
    fn bulk_collect_without_objects_is_empty() {
        let fetched = collect_records(&response(json!({ "code": 0, "objects": null })));
        assert_eq!(fetched, FetchAll::default());
    }

    #[test]
    fn unparsable_keys_are_rejected() {
        assert!(matches!(parse_id(&json!("abc")), Err(ITopError::InvalidKey(_))));
        assert!(matches!(parse_id(&Value::Null), Err(ITopError::InvalidKey(_))));
        assert_eq!(parse_id(&json!(" 42 ")).unwrap(), 42);
    }
}
