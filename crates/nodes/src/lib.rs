//! `nodes` crate — the `ExecutableNode` trait and built-in node implementations.
//!
//! Every node must implement [`ExecutableNode`]. The engine crate dispatches
//! execution through this trait object, one input item at a time.

pub mod error;
pub mod traits;
pub mod mock;
pub mod itop;

pub use error::NodeError;
pub use traits::{ExecutableNode, ExecutionContext};
pub use crate::itop::ITopNode;
