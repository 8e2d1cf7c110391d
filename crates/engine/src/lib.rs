//! `engine` crate — runs a node over a batch of input items.
//!
//! Items are processed strictly in input order, one at a time. A failure
//! either aborts the batch or, with `continue_on_fail`, is recorded as an
//! `{error}` record paired with the failing item.

pub mod models;
pub mod error;
pub mod executor;

pub use models::{Batch, OutputItem};
pub use error::EngineError;
pub use executor::{ExecutorConfig, NodeExecutor};
