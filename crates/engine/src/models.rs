//! Input and output shapes of a batch run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters shared by every item, plus per-item overrides.
///
/// The parameters an item runs with are the shared bag with that item's
/// entries laid over it (shallow, key by key).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub items: Vec<Map<String, Value>>,
}

impl Batch {
    pub fn new(parameters: Map<String, Value>, items: Vec<Map<String, Value>>) -> Self {
        Self { parameters, items }
    }

    /// A batch of one item with no overrides.
    pub fn single(parameters: Map<String, Value>) -> Self {
        Self::new(parameters, vec![Map::new()])
    }

    /// Resolved parameter bag for item `index`.
    pub fn item_parameters(&self, index: usize) -> Value {
        let mut resolved = self.parameters.clone();
        if let Some(overrides) = self.items.get(index) {
            for (k, v) in overrides {
                resolved.insert(k.clone(), v.clone());
            }
        }
        Value::Object(resolved)
    }
}

/// One emitted record and the index of the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    pub json: Value,
    pub paired_item: usize,
}
