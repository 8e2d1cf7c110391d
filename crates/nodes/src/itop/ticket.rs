//! Ticket resource, backed by the `UserRequest` class.

use serde::{Deserialize, Serialize};

use itop::{ApiRequest, OqlQuery, ALL_FIELDS};

use super::params::{deserialize_id, deserialize_opt_id, field_map, non_zero, Level};
use super::Plan;
use crate::NodeError;

pub const TICKET_CLASS: &str = "UserRequest";

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", deny_unknown_fields)]
pub enum TicketOperation {
    Create {
        #[serde(default)]
        fields: TicketFields,
    },
    Get {
        #[serde(deserialize_with = "deserialize_id")]
        ticket_id: u64,
    },
    Update {
        #[serde(deserialize_with = "deserialize_id")]
        ticket_id: u64,
        #[serde(default)]
        fields: TicketFields,
    },
    Delete {
        #[serde(deserialize_with = "deserialize_id")]
        ticket_id: u64,
    },
    GetAll {
        #[serde(default)]
        filters: TicketFilters,
    },
}

/// Writable ticket attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketFields {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub caller_id: Option<u64>,
    pub impact: Option<Level>,
    pub urgency: Option<Level>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub service_id: Option<u64>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub team_id: Option<u64>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub agent_id: Option<u64>,
    pub operational_status: Option<String>,
}

/// Equality filters for `getAll`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketFilters {
    pub operational_status: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub caller_id: Option<u64>,
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub team_id: Option<u64>,
    pub impact: Option<Level>,
    pub urgency: Option<Level>,
}

impl TicketFilters {
    /// Conditions are emitted in a fixed order regardless of input order.
    pub fn query(&self) -> OqlQuery {
        OqlQuery::select(TICKET_CLASS)
            .and_eq_opt(
                "operational_status",
                self.operational_status.as_deref().filter(|s| !s.is_empty()),
            )
            .and_eq_opt("caller_id", non_zero(self.caller_id))
            .and_eq_opt("team_id", non_zero(self.team_id))
            .and_eq_opt("impact", self.impact.map(Level::as_str))
            .and_eq_opt("urgency", self.urgency.map(Level::as_str))
    }
}

pub fn plan(operation: &TicketOperation) -> Result<Plan, NodeError> {
    let plan = match operation {
        TicketOperation::Create { fields } => {
            Plan::One(ApiRequest::create(TICKET_CLASS, field_map(fields)?))
        }
        TicketOperation::Get { ticket_id } => Plan::One(ApiRequest::get(TICKET_CLASS, *ticket_id)),
        TicketOperation::Update { ticket_id, fields } => Plan::One(ApiRequest::update(
            TICKET_CLASS,
            *ticket_id,
            field_map(fields)?,
        )),
        // Ticket deletes carry no field map at all.
        TicketOperation::Delete { ticket_id } => Plan::Delete {
            request: ApiRequest::delete(TICKET_CLASS, *ticket_id),
            id: *ticket_id,
        },
        TicketOperation::GetAll { filters } => Plan::Many {
            query: filters.query(),
            output_fields: ALL_FIELDS.to_owned(),
        },
    };
    Ok(plan)
}
