//! Error taxonomy for calls against the iTop web service.

use thiserror::Error;

/// Fallback when an envelope reports failure without a message.
pub const UNKNOWN_API_ERROR: &str = "Unknown iTop API error";

/// Errors returned by [`crate::ITopClient`] and the response helpers.
#[derive(Debug, Error)]
pub enum ITopError {
    /// The TCP connection was refused by the remote host.
    #[error("Connection refused. Please check your iTop URL and ensure the server is running.")]
    ConnectionRefused(#[source] reqwest::Error),

    /// The envelope's top-level `code` was non-zero.
    #[error("{message}")]
    Api { code: i64, message: String },

    /// A single object inside an otherwise successful envelope failed.
    #[error("iTop API error: {0}")]
    Object(String),

    /// `objects` was absent or null.
    #[error("No objects returned from iTop API")]
    NoObjects,

    /// `objects` was present but empty.
    #[error("No objects found in response")]
    EmptyObjects,

    /// An object key could not be read as an integer id.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The request envelope violates the key/operation contract.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport or decoding failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// `json_data` could not be encoded.
    #[error("failed to encode json_data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ITopError {
    /// Build an envelope-level error, substituting the fallback message.
    pub fn api(code: i64, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_owned());
        Self::Api { code, message }
    }
}
