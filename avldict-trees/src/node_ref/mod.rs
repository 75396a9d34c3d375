//! Primitives for referencing tree nodes held in an arena. Nodes are
//! addressed by pointer, owned by a node store, and released explicitly.

mod r#impl;
mod node_store;
mod node_manager;

pub use crate::node_ref::r#impl::{Node, NodeRef, Pointer};
pub use crate::node_ref::node_store::{MemNodeStore, NodeStore};
pub use crate::node_ref::node_manager::NodeManager;
