mod document;
mod tree;

pub use document::{Document, Node};
pub use tree::{Axis, NodeId, NodeKind, Overflow, ScrollMetrics, ScrollTree};
