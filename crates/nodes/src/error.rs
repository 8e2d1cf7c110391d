//! Node-level error type.

use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// None of these are retried; the engine either records them against the
/// item or aborts the batch.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The parameter bag did not describe a valid operation.
    #[error("invalid parameters: {0}")]
    Validation(String),

    /// No usable credentials in the execution context.
    #[error(transparent)]
    Credentials(#[from] itop::CredentialsError),

    /// The upstream call failed.
    #[error(transparent)]
    ITop(#[from] itop::ITopError),
}
