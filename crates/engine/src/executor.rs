//! Batch executor.
//!
//! `NodeExecutor` walks the items of a [`Batch`] in order:
//! 1. Resolves the item's parameter bag.
//! 2. Executes the node once (a single upstream round trip).
//! 3. Emits every returned record paired with the item index.
//! 4. On failure, either records `{error: <message>}` for the item
//!    (`continue_on_fail`) or stops and returns the error.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, instrument, warn};

use nodes::{ExecutableNode, ExecutionContext};

use crate::{Batch, EngineError, OutputItem};

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Record item failures as error records instead of aborting.
    pub continue_on_fail: bool,
}

/// Runs one node over a batch of items.
pub struct NodeExecutor {
    node: Arc<dyn ExecutableNode>,
    config: ExecutorConfig,
}

impl NodeExecutor {
    pub fn new(node: Arc<dyn ExecutableNode>, config: ExecutorConfig) -> Self {
        Self { node, config }
    }

    /// Run every item and collect the output records.
    ///
    /// # Errors
    /// [`EngineError::ItemFailed`] for the first failing item when
    /// `continue_on_fail` is off; nothing after it is run.
    #[instrument(skip_all, fields(node = %ctx.node_name, items = batch.items.len()))]
    pub async fn run(
        &self,
        batch: &Batch,
        ctx: &ExecutionContext,
    ) -> Result<Vec<OutputItem>, EngineError> {
        let mut output = Vec::new();

        for index in 0..batch.items.len() {
            let parameters = batch.item_parameters(index);

            match self.node.execute(parameters, ctx).await {
                Ok(records) => {
                    output.extend(records.into_iter().map(|json| OutputItem {
                        json,
                        paired_item: index,
                    }));
                }
                Err(e) if self.config.continue_on_fail => {
                    warn!("item {index} failed, continuing: {e}");
                    output.push(OutputItem {
                        json: json!({ "error": e.to_string() }),
                        paired_item: index,
                    });
                }
                Err(e) => {
                    error!("item {index} failed: {e}");
                    return Err(EngineError::ItemFailed { index, source: e });
                }
            }
        }

        info!(records = output.len(), "batch complete");
        Ok(output)
    }
}
