//! Lookup lists (`{name, value}` pairs) used to populate selection
//! parameters such as the organization of a person.
//!
//! All helpers return an empty list when no credentials are configured.
//! Teams and locations are optional in an iTop installation, so failures
//! fetching them also yield an empty list.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use itop::{FetchAll, ITopClient, ITopError, OqlQuery, Record};

use super::ITopNode;
use crate::{ExecutionContext, NodeError};

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub name: String,
    pub value: i64,
}

fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn record_id(record: &Record) -> i64 {
    record.get("id").and_then(Value::as_i64).unwrap_or_default()
}

/// `name`, falling back to `"<label> <id>"`.
fn named_entry(record: &Record, label: &str) -> OptionEntry {
    let id = record_id(record);
    let name = text(record, "name")
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{label} {id}"));
    OptionEntry { name, value: id }
}

/// `"<first_name> <name>"` when both are set, else `name`, else `"Person <id>"`.
fn person_entry(record: &Record) -> OptionEntry {
    let id = record_id(record);
    let name = match (text(record, "first_name"), text(record, "name")) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (_, Some(last)) => last.to_owned(),
        _ => format!("Person {id}"),
    };
    OptionEntry { name, value: id }
}

/// Case-insensitive alphabetical order, ties broken by exact name.
fn sorted(mut entries: Vec<OptionEntry>) -> Vec<OptionEntry> {
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

/// Lookups filter on `status = "active"` with double quotes.
fn active(class: &str) -> OqlQuery {
    OqlQuery::select(class).and_raw(r#"status = "active""#)
}

impl ITopNode {
    fn lookup_client(&self, ctx: &ExecutionContext) -> Option<ITopClient> {
        match self.client(ctx) {
            Ok(client) => Some(client),
            Err(e) => {
                debug!("no iTop credentials for lookup: {e}");
                None
            }
        }
    }

    /// Active organizations.
    pub async fn list_organizations(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<Vec<OptionEntry>, NodeError> {
        let Some(client) = self.lookup_client(ctx) else {
            return Ok(Vec::new());
        };
        let fetched = client.fetch_all(&active("Organization"), "id,name").await?;
        Ok(sorted(
            fetched
                .records
                .iter()
                .map(|r| named_entry(r, "Organization"))
                .collect(),
        ))
    }

    /// Active persons, labelled with their full name.
    pub async fn list_persons(&self, ctx: &ExecutionContext) -> Result<Vec<OptionEntry>, NodeError> {
        let Some(client) = self.lookup_client(ctx) else {
            return Ok(Vec::new());
        };
        let fetched = client.fetch_all(&active("Person"), "id,name,first_name,email").await?;
        Ok(sorted(fetched.records.iter().map(person_entry).collect()))
    }

    /// All teams; empty if the installation has none.
    pub async fn list_teams(&self, ctx: &ExecutionContext) -> Result<Vec<OptionEntry>, NodeError> {
        let Some(client) = self.lookup_client(ctx) else {
            return Ok(Vec::new());
        };
        let teams = client.fetch_all(&OqlQuery::select("Team"), "id,name").await;
        Ok(optional(teams, "Team"))
    }

    /// Active locations; empty if the installation has none.
    pub async fn list_locations(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<Vec<OptionEntry>, NodeError> {
        let Some(client) = self.lookup_client(ctx) else {
            return Ok(Vec::new());
        };
        let locations = client.fetch_all(&active("Location"), "id,name").await;
        Ok(optional(locations, "Location"))
    }
}

fn optional(result: Result<FetchAll, ITopError>, label: &str) -> Vec<OptionEntry> {
    match result {
        Ok(fetched) => sorted(
            fetched
                .records
                .iter()
                .map(|r| named_entry(r, label))
                .collect(),
        ),
        Err(e) => {
            warn!("{label} lookup not available: {e}");
            Vec::new()
        }
    }
}
