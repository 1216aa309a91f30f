//! FILENAME: core/pivot-store/src/error.rs

use axis_tree::TreeError;
use pivot_engine::Axis;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot move {active} onto {over}: they do not share a parent")]
    CrossParentMove { active: String, over: String },

    #[error("{id} is not a leaf of the {axis} axis")]
    NotALeaf { axis: Axis, id: String },
}
