//! Connection settings for an iTop instance.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::{API_PATH, API_VERSION};

/// Secret names looked up by [`Credentials::from_secrets`].
pub const SECRET_URL: &str = "itop_url";
pub const SECRET_USERNAME: &str = "itop_username";
pub const SECRET_PASSWORD: &str = "itop_password";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("missing iTop credential '{0}'")]
    Missing(&'static str),
}

/// Base URL plus the user/password pair sent as `auth_user`/`auth_pwd`.
#[derive(Clone)]
pub struct Credentials {
    url: String,
    username: String,
    password: String,
}

impl Credentials {
    /// Validate and normalise a credential triple. Trailing slashes on the
    /// URL are dropped so the API path can be appended verbatim.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let url = url.into().trim().trim_end_matches('/').to_owned();
        let username = username.into();
        let password = password.into();

        if url.is_empty() {
            return Err(CredentialsError::Missing("url"));
        }
        if username.is_empty() {
            return Err(CredentialsError::Missing("username"));
        }
        if password.is_empty() {
            return Err(CredentialsError::Missing("password"));
        }

        Ok(Self { url, username, password })
    }

    /// Read credentials out of a workflow's decrypted secrets.
    pub fn from_secrets(secrets: &HashMap<String, String>) -> Result<Self, CredentialsError> {
        let get = |name: &'static str| {
            secrets
                .get(name)
                .cloned()
                .ok_or(CredentialsError::Missing(name))
        };
        Self::new(get(SECRET_URL)?, get(SECRET_USERNAME)?, get(SECRET_PASSWORD)?)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Full REST endpoint, including the version query parameter.
    pub fn endpoint(&self) -> String {
        format!("{}{API_PATH}?version={API_VERSION}", self.url)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &mask(&self.username))
            .field("password", &"***")
            .finish()
    }
}

/// Mask a value for logging, keeping a short prefix when long enough.
pub(crate) fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..2].iter().collect();
        format!("{head}{}", "*".repeat(chars.len() - 2))
    }
}
