//! `MockNode` — a test double for `ExecutableNode`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use crate::{ExecutableNode, ExecutionContext, NodeError};

/// Behaviour injected into `MockNode` at construction time.
pub enum MockBehaviour {
    /// Echo the parameters back as a single record.
    Echo,
    /// Fail every item with a validation error.
    Fail(String),
    /// Fail only items whose parameters contain `"fail": true`.
    FailFlagged(String),
}

/// A mock node that records every call it receives.
pub struct MockNode {
    pub name: String,
    pub behaviour: MockBehaviour,
    /// All parameter bags seen by this node (in call order).
    pub calls: Arc<Mutex<Vec<Value>>>,
}

impl MockNode {
    fn with(name: impl Into<String>, behaviour: MockBehaviour) -> Self {
        Self {
            name: name.into(),
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo(name: impl Into<String>) -> Self {
        Self::with(name, MockBehaviour::Echo)
    }

    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with(name, MockBehaviour::Fail(msg.into()))
    }

    pub fn failing_flagged(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with(name, MockBehaviour::FailFlagged(msg.into()))
    }

    /// Number of times this node has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    async fn execute(&self, parameters: Value, _ctx: &ExecutionContext) -> Result<Vec<Value>, NodeError> {
        self.calls.lock().unwrap().push(parameters.clone());

        match &self.behaviour {
            MockBehaviour::Echo => Ok(vec![json!({ "node": self.name, "parameters": parameters })]),
            MockBehaviour::Fail(msg) => Err(NodeError::Validation(msg.clone())),
            MockBehaviour::FailFlagged(msg) => {
                if parameters["fail"] == Value::Bool(true) {
                    Err(NodeError::Validation(msg.clone()))
                } else {
                    Ok(vec![json!({ "node": self.name, "parameters": parameters })])
                }
            }
        }
    }
}
