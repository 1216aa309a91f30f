//! FILENAME: core/axis-tree/src/lib.rs
//! PURPOSE: Labeled header trees for the two axes of a pivot table.
//! CONTEXT: Each axis (rows, columns) is one `AxisTree`: a flat node list
//! with explicit parent/children references. Leaves are axis coordinates.
//!
//! Layers:
//! - `node`: The node record (what a header IS)
//! - `tree`: Mutations and queries over one axis (HOW we edit it)
//! - `error`: Typed failures for rejected mutations

pub mod error;
pub mod node;
pub mod tree;

pub use error::TreeError;
pub use node::{ChildIds, Node, NodeId};
pub use tree::AxisTree;
