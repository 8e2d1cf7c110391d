//! The `ExecutableNode` trait — the contract every node must fulfil.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::NodeError;

/// Shared context passed to every node during execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Display name of the node being run, used in logs.
    pub node_name: String,
    /// Decrypted secrets scoped to this workflow.
    pub secrets: HashMap<String, String>,
}

impl ExecutionContext {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            secrets: HashMap::new(),
        }
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

/// The core node trait.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Execute the node for one input item.
    ///
    /// `parameters` is the item's resolved parameter bag. The returned
    /// records are emitted in order, each paired with this item.
    async fn execute(
        &self,
        parameters: Value,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Value>, NodeError>;
}
