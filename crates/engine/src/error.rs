//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

/// Errors produced while running a batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An item failed and failure tolerance is disabled; later items were
    /// not run.
    #[error("item {index} failed: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: NodeError,
    },
}

impl EngineError {
    /// The underlying node error.
    pub fn node_error(&self) -> &NodeError {
        match self {
            Self::ItemFailed { source, .. } => source,
        }
    }
}
