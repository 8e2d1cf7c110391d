//! Person resource.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use itop::{ApiRequest, OqlQuery, ALL_FIELDS};

use super::params::{
    custom_field_map, deserialize_id, deserialize_opt_id, field_map, merge, non_zero, require,
    CustomField, Notify, Status,
};
use super::Plan;
use crate::NodeError;

pub const PERSON_CLASS: &str = "Person";

/// Attributes requested unless related objects are asked for. Excludes the
/// potentially large linked-object lists.
pub const BASIC_PERSON_FIELDS: &str = "id,name,first_name,email,status,org_id,org_name,\
manager_id,manager_name,function,phone,mobile_phone,location_id,location_name,\
employee_number,friendlyname,notify,location_id_friendlyname,obsolescence_flag,\
obsolescence_date";

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", deny_unknown_fields)]
pub enum PersonOperation {
    Create {
        /// Last name.
        name: String,
        first_name: String,
        #[serde(deserialize_with = "deserialize_id")]
        org_id: u64,
        #[serde(default)]
        fields: PersonFields,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    Get {
        #[serde(deserialize_with = "deserialize_id")]
        person_id: u64,
        #[serde(default)]
        options: OutputOptions,
    },
    Update {
        #[serde(deserialize_with = "deserialize_id")]
        person_id: u64,
        #[serde(default)]
        fields: PersonFields,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    Delete {
        #[serde(deserialize_with = "deserialize_id")]
        person_id: u64,
    },
    GetAll {
        #[serde(default)]
        filters: PersonFilters,
        #[serde(default)]
        options: OutputOptions,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonFields {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub org_id: Option<u64>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub function: Option<String>,
    pub status: Option<Status>,
    pub employee_number: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub location_id: Option<u64>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub manager_id: Option<u64>,
    pub notify: Option<Notify>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonFilters {
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub org_id: Option<u64>,
    pub status: Option<Status>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub manager_id: Option<u64>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub location_id: Option<u64>,
}

impl PersonFilters {
    pub fn query(&self) -> OqlQuery {
        OqlQuery::select(PERSON_CLASS)
            .and_eq_opt("org_id", non_zero(self.org_id))
            .and_eq_opt("status", self.status.map(Status::as_str))
            .and_eq_opt("manager_id", non_zero(self.manager_id))
            .and_eq_opt("location_id", non_zero(self.location_id))
    }
}

/// Output-field narrowing for person reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputOptions {
    #[serde(alias = "includeRelated")]
    pub include_related: bool,
    #[serde(alias = "outputFields")]
    pub output_fields: Option<String>,
}

impl OutputOptions {
    /// Basic fields by default; with `include_related`, the explicit list if
    /// one was given, otherwise everything.
    pub fn resolve(&self) -> &str {
        if !self.include_related {
            return BASIC_PERSON_FIELDS;
        }
        match self.output_fields.as_deref() {
            Some(list) if !list.trim().is_empty() => list,
            _ => ALL_FIELDS,
        }
    }
}

fn write_fields(fields: &PersonFields, custom: &[CustomField]) -> Result<Map<String, Value>, NodeError> {
    Ok(merge(field_map(fields)?, custom_field_map(custom)))
}

pub fn plan(operation: &PersonOperation) -> Result<Plan, NodeError> {
    let plan = match operation {
        PersonOperation::Create {
            name,
            first_name,
            org_id,
            fields,
            custom_fields,
        } => {
            require(name, "person last name")?;
            require(first_name, "person first name")?;

            let mut base = Map::new();
            base.insert("name".into(), Value::from(name.as_str()));
            base.insert("first_name".into(), Value::from(first_name.as_str()));
            base.insert("org_id".into(), Value::from(*org_id));

            let fields = merge(base, write_fields(fields, custom_fields)?);
            Plan::One(ApiRequest::create(PERSON_CLASS, fields))
        }
        PersonOperation::Get { person_id, options } => Plan::One(
            ApiRequest::get(PERSON_CLASS, *person_id).with_output_fields(options.resolve()),
        ),
        PersonOperation::Update {
            person_id,
            fields,
            custom_fields,
        } => Plan::One(ApiRequest::update(
            PERSON_CLASS,
            *person_id,
            write_fields(fields, custom_fields)?,
        )),
        // Unlike tickets, person deletes send an explicit empty field map.
        PersonOperation::Delete { person_id } => Plan::Delete {
            request: ApiRequest::delete(PERSON_CLASS, *person_id).with_fields(Map::new()),
            id: *person_id,
        },
        PersonOperation::GetAll { filters, options } => Plan::Many {
            query: filters.query(),
            output_fields: options.resolve().to_owned(),
        },
    };
    Ok(plan)
}
