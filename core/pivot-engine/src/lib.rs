//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot table layout subsystem.
//!
//! This crate turns two header trees (from `axis-tree`) and a sparse set of
//! data values into a merged-cell grid the front end can render directly.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot table IS)
//! - `data`: Values addressed by (row leaf, column leaf)
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `engine`: Leaf flattening and span calculation (HOW we lay it out)

pub mod definition;
pub mod data;
pub mod view;
pub mod engine;

pub use definition::*;
pub use data::*;
pub use view::*;
pub use engine::{calculate_pivot, layout_axis, AxisLayout, HeaderSpan, PivotCalculator};
