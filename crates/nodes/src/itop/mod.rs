//! The iTop node: create/read/update/delete/list on tickets, persons and
//! organizations of an iTop instance.
//!
//! Each item is decoded into [`ITopParameters`], turned into a [`Plan`] by
//! the resource module, and the plan is run with exactly one HTTP round trip.

pub mod load_options;
pub mod organization;
pub mod params;
pub mod person;
pub mod ticket;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use itop::{ApiRequest, Credentials, ITopClient, OqlQuery};

use crate::{ExecutableNode, ExecutionContext, NodeError};

pub use load_options::OptionEntry;
pub use params::ITopParameters;

/// What a single item will do against the web service.
#[derive(Debug, Clone)]
pub enum Plan {
    /// One object in, one flat record out.
    One(ApiRequest),
    /// Delete, answered with `{success: true, id}`.
    Delete { request: ApiRequest, id: u64 },
    /// OQL lookup, every successful object out.
    Many { query: OqlQuery, output_fields: String },
}

impl ITopParameters {
    /// Validate the parameters and map them onto a request plan.
    pub fn plan(&self) -> Result<Plan, NodeError> {
        match self {
            Self::Ticket(op) => ticket::plan(op),
            Self::Person(op) => person::plan(op),
            Self::Organization(op) => organization::plan(op),
        }
    }
}

impl Plan {
    pub async fn run(self, client: &ITopClient) -> Result<Vec<Value>, NodeError> {
        match self {
            Self::One(request) => {
                let record = client.request_one(&request).await?;
                Ok(vec![Value::Object(record)])
            }
            Self::Delete { request, id } => {
                client.request(&request).await?;
                Ok(vec![json!({ "success": true, "id": id })])
            }
            Self::Many {
                query,
                output_fields,
            } => {
                let fetched = client.fetch_all(&query, &output_fields).await?;
                Ok(fetched.records.into_iter().map(Value::Object).collect())
            }
        }
    }
}

/// Node talking to the iTop REST/JSON web service.
///
/// Holds one connection pool shared by every item and lookup call.
#[derive(Debug, Clone, Default)]
pub struct ITopNode {
    http: reqwest::Client,
}

impl ITopNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn client(&self, ctx: &ExecutionContext) -> Result<ITopClient, NodeError> {
        let credentials = Credentials::from_secrets(&ctx.secrets)?;
        Ok(ITopClient::with_http_client(credentials, self.http.clone()))
    }
}

#[async_trait]
impl ExecutableNode for ITopNode {
    #[instrument(skip_all, fields(node = %ctx.node_name))]
    async fn execute(
        &self,
        parameters: Value,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Value>, NodeError> {
        let plan = ITopParameters::from_value(parameters)?.plan()?;
        debug!(?plan, "planned iTop call");

        let client = self.client(ctx)?;
        plan.run(&client).await
    }
}

#[cfg(test)]
mod node_tests;
