//! HTTP transport for the iTop web service.
//!
//! One form-encoded POST per call, no retries and no client-side timeout
//! beyond the `reqwest` defaults.

use std::error::Error as StdError;
use std::io;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::credentials::mask;
use crate::extract::{collect_records, extract_object};
use crate::{ApiRequest, ApiResponse, Credentials, FetchAll, ITopError, OqlQuery, Record};

/// `json_data` of the connectivity check.
#[derive(Serialize)]
struct ListOperations {
    operation: &'static str,
}

/// Client bound to one iTop instance.
#[derive(Debug, Clone)]
pub struct ITopClient {
    http: Client,
    credentials: Credentials,
    endpoint: String,
}

impl ITopClient {
    /// Create a client with a default `reqwest` connection pool.
    pub fn new(credentials: Credentials) -> Result<Self, ITopError> {
        let http = Client::builder().build()?;
        Ok(Self::with_http_client(credentials, http))
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_http_client(credentials: Credentials, http: Client) -> Self {
        let endpoint = credentials.endpoint();
        Self {
            http,
            credentials,
            endpoint,
        }
    }

    /// Send one request and return the envelope when its top-level code is 0.
    ///
    /// # Errors
    /// - [`ITopError::ConnectionRefused`] when the server refuses the connection.
    /// - [`ITopError::Api`] when the envelope's `code` is non-zero.
    /// - [`ITopError::Transport`] for any other transport/decoding failure.
    #[instrument(skip(self, request), fields(operation = %request.operation, class = %request.class))]
    pub async fn request(&self, request: &ApiRequest) -> Result<ApiResponse, ITopError> {
        let json_data = request.json_data()?;
        debug!(json_data = %json_data, "sending iTop request");

        let response = self.post(json_data).await?;
        if !response.is_success() {
            return Err(ITopError::api(response.code, response.message));
        }
        Ok(response)
    }

    /// Send a single-object request and flatten the result.
    pub async fn request_one(&self, request: &ApiRequest) -> Result<Record, ITopError> {
        let response = self.request(request).await?;
        extract_object(&response)
    }

    /// Run an OQL lookup and return every successfully fetched object.
    ///
    /// Objects whose own `code` is non-zero are skipped and counted in
    /// [`FetchAll::dropped`].
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn fetch_all(
        &self,
        query: &OqlQuery,
        output_fields: &str,
    ) -> Result<FetchAll, ITopError> {
        let request = ApiRequest::get(query.class(), query.to_string())
            .with_output_fields(output_fields);
        let response = self.request(&request).await?;

        let fetched = collect_records(&response);
        info!(
            records = fetched.records.len(),
            dropped = fetched.dropped,
            "bulk fetch complete"
        );
        Ok(fetched)
    }

    /// Call `list_operations` to validate the credentials.
    #[instrument(skip(self), fields(url = %self.credentials.url(), user = %mask(self.credentials.username())))]
    pub async fn check_credentials(&self) -> Result<(), ITopError> {
        let json_data = serde_json::to_string(&ListOperations {
            operation: "list_operations",
        })?;
        let response = self.post(json_data).await?;
        if !response.is_success() {
            return Err(ITopError::api(response.code, response.message));
        }
        info!("iTop credentials accepted");
        Ok(())
    }

    async fn post(&self, json_data: String) -> Result<ApiResponse, ITopError> {
        let form = [
            ("auth_user", self.credentials.username()),
            ("auth_pwd", self.credentials.password()),
            ("json_data", json_data.as_str()),
        ];

        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(classify)?
            .error_for_status()?;

        Ok(response.json::<ApiResponse>().await?)
    }
}

/// Distinguish a refused connection from other transport failures.
fn classify(err: reqwest::Error) -> ITopError {
    if is_connection_refused(&err) {
        ITopError::ConnectionRefused(err)
    } else {
        ITopError::Transport(err)
    }
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = cause.source();
    }
    false
}
