//! FILENAME: core/pivot-store/src/lib.rs
//! PURPOSE: State container for the hierarchical pivot grid.
//! CONTEXT: Holds the row tree, the column tree, the data values and the
//! undo history. The front end sends `PivotAction`s (drag end, rename,
//! insert, delete, ...) and reads back a `PivotView` to render.

pub mod action;
pub mod config;
pub mod demo;
pub mod error;
pub mod history;
pub mod snapshot;
pub mod store;

pub use action::PivotAction;
pub use config::StoreConfig;
pub use error::StoreError;
pub use history::{StoreChange, Transaction, UndoStack};
pub use snapshot::StoreSnapshot;
pub use store::PivotStore;

// Re-export the model crates so callers need a single dependency.
pub use axis_tree::{AxisTree, Node, NodeId, TreeError};
pub use pivot_engine::{Axis, DataValue, LayoutOptions, PivotCellType, PivotData, PivotView};
