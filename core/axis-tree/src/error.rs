//! FILENAME: core/axis-tree/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Cannot remove the root node: {0}")]
    RootRemoval(String),

    #[error("Malformed tree: {0}")]
    Malformed(String),
}
