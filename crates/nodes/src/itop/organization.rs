//! Organization resource.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use itop::{ApiRequest, OqlQuery, ALL_FIELDS};

use super::params::{
    custom_field_map, deserialize_id, deserialize_opt_id, field_map, merge, non_zero, require,
    CustomField, Status,
};
use super::Plan;
use crate::NodeError;

pub const ORGANIZATION_CLASS: &str = "Organization";

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", deny_unknown_fields)]
pub enum OrganizationOperation {
    Create {
        name: String,
        #[serde(default)]
        fields: OrganizationFields,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    Get {
        #[serde(deserialize_with = "deserialize_id")]
        organization_id: u64,
    },
    Update {
        #[serde(deserialize_with = "deserialize_id")]
        organization_id: u64,
        #[serde(default)]
        fields: OrganizationFields,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    Delete {
        #[serde(deserialize_with = "deserialize_id")]
        organization_id: u64,
    },
    GetAll {
        #[serde(default)]
        filters: OrganizationFilters,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationFields {
    pub name: Option<String>,
    pub code: Option<String>,
    pub status: Option<Status>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationFilters {
    pub status: Option<Status>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub parent_id: Option<u64>,
}

impl OrganizationFilters {
    pub fn query(&self) -> OqlQuery {
        OqlQuery::select(ORGANIZATION_CLASS)
            .and_eq_opt("status", self.status.map(Status::as_str))
            .and_eq_opt("parent_id", non_zero(self.parent_id))
    }
}

pub fn plan(operation: &OrganizationOperation) -> Result<Plan, NodeError> {
    let plan = match operation {
        OrganizationOperation::Create {
            name,
            fields,
            custom_fields,
        } => {
            require(name, "organization name")?;
            let mut base = Map::new();
            base.insert("name".into(), Value::from(name.as_str()));
            let extra = merge(field_map(fields)?, custom_field_map(custom_fields));
            Plan::One(ApiRequest::create(ORGANIZATION_CLASS, merge(base, extra)))
        }
        OrganizationOperation::Get { organization_id } => {
            Plan::One(ApiRequest::get(ORGANIZATION_CLASS, *organization_id))
        }
        OrganizationOperation::Update {
            organization_id,
            fields,
            custom_fields,
        } => Plan::One(ApiRequest::update(
            ORGANIZATION_CLASS,
            *organization_id,
            merge(field_map(fields)?, custom_field_map(custom_fields)),
        )),
        OrganizationOperation::Delete { organization_id } => Plan::Delete {
            request: ApiRequest::delete(ORGANIZATION_CLASS, *organization_id)
                .with_fields(Map::new()),
            id: *organization_id,
        },
        OrganizationOperation::GetAll { filters } => Plan::Many {
            query: filters.query(),
            output_fields: ALL_FIELDS.to_owned(),
        },
    };
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::itop::ITopParameters;

    fn org_plan(params: Value) -> Result<Plan, NodeError> {
        match ITopParameters::from_value(params)? {
            ITopParameters::Organization(op) => plan(&op),
            other => panic!("not an organization operation: {other:?}"),
        }
    }

    #[test]
    fn create_overlays_custom_fields() {
        let plan = org_plan(json!({
            "resource": "organization",
            "operation": "create",
            "name": "Acme",
            "fields": { "code": "ACM", "status": "active" },
            "custom_fields": [{ "fieldId": "code", "fieldValue": "ACME-2" }]
        }))
        .unwrap();
        let Plan::One(request) = plan else { panic!("expected a single-object plan") };
        assert_eq!(
            Value::Object(request.fields.unwrap()),
            json!({ "name": "Acme", "code": "ACME-2", "status": "active" })
        );
    }

    #[test]
    fn create_requires_a_name() {
        let err = org_plan(json!({ "resource": "organization", "operation": "create", "name": "" }))
            .err()
            .unwrap();
        assert!(matches!(err, NodeError::Validation(m) if m.contains("organization name")));
    }

    #[test]
    fn delete_sends_an_empty_field_map() {
        let plan = org_plan(json!({
            "resource": "organization", "operation": "delete", "organization_id": "12"
        }))
        .unwrap();
        let Plan::Delete { request, id } = plan else { panic!("expected a delete plan") };
        assert_eq!(id, 12);
        assert_eq!(request.fields, Some(Map::new()));
    }

    #[test]
    fn get_all_filters_status_then_parent() {
        let plan = org_plan(json!({
            "resource": "organization",
            "operation": "getAll",
            "filters": { "parent_id": 3, "status": "inactive" }
        }))
        .unwrap();
        let Plan::Many { query, output_fields } = plan else { panic!("expected a bulk plan") };
        assert_eq!(
            query.to_string(),
            "SELECT Organization WHERE status = 'inactive' AND parent_id = 3"
        );
        assert_eq!(output_fields, "*");
    }

    #[test]
    fn update_with_no_fields_sends_an_empty_map() {
        let plan = org_plan(json!({
            "resource": "organization", "operation": "update", "organization_id": 2
        }))
        .unwrap();
        let Plan::One(request) = plan else { panic!("expected a single-object plan") };
        assert_eq!(request.fields, Some(Map::new()));
        assert_eq!(request.key, Some(itop::ObjectKey::Id(2)));
    }
}
