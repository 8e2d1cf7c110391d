//! `itop` crate — typed client for the iTop REST/JSON web service.
//!
//! Every call is a single form-encoded POST to
//! `<base>/webservices/rest.php?version=1.3` whose `json_data` field carries
//! the operation. Responses are envelopes keyed by `<class>::<key>`, each
//! object individually success/failure coded; [`extract`] reshapes them into
//! flat `{id, ...fields}` records.

pub mod client;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod oql;

pub use client::ITopClient;
pub use credentials::{Credentials, CredentialsError};
pub use envelope::{ApiObject, ApiRequest, ApiResponse, ObjectKey, Operation};
pub use error::ITopError;
pub use extract::{collect_records, extract_object, FetchAll, Record};
pub use oql::{OqlQuery, OqlValue};

/// REST API version requested on every call.
pub const API_VERSION: &str = "1.3";

/// Path of the REST endpoint, relative to the instance base URL.
pub const API_PATH: &str = "/webservices/rest.php";

/// Wildcard accepted by `output_fields`; never sent on the wire.
pub const ALL_FIELDS: &str = "*";
