//! FILENAME: core/pivot-store/src/action.rs
//! PURPOSE: User intents the store understands.
//! CONTEXT: The front end sends these over the bridge as tagged JSON,
//! e.g. `{"type":"dragEnd","axis":"column","activeId":"q1","overId":"q3"}`.

use axis_tree::NodeId;
use pivot_engine::{Axis, DataValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PivotAction {
    /// Move `active_id` to the position of `over_id` among `parent_id`'s children.
    Reorder {
        axis: Axis,
        parent_id: NodeId,
        active_id: NodeId,
        over_id: NodeId,
    },
    Rename {
        axis: Axis,
        id: NodeId,
        label: String,
    },
    /// Append a new leaf under `parent_id`.
    Insert {
        axis: Axis,
        parent_id: NodeId,
        id: NodeId,
        label: String,
    },
    /// Remove a node with its whole subtree.
    Delete { axis: Axis, id: NodeId },
    /// A header drag finished. `over_id` is absent when dropped outside any header.
    DragEnd {
        axis: Axis,
        active_id: NodeId,
        #[serde(default)]
        over_id: Option<NodeId>,
    },
    SetValue {
        row_id: NodeId,
        column_id: NodeId,
        value: DataValue,
    },
}

impl PivotAction {
    /// Human-readable description (used for undo history and logs).
    pub fn description(&self) -> String {
        match self {
            PivotAction::Reorder { axis, active_id, .. } => format!("Reorder {} {}", axis, active_id),
            PivotAction::Rename { axis, id, .. } => format!("Rename {} {}", axis, id),
            PivotAction::Insert { axis, id, .. } => format!("Insert {} {}", axis, id),
            PivotAction::Delete { axis, id } => format!("Delete {} {}", axis, id),
            PivotAction::DragEnd { axis, active_id, .. } => format!("Move {} {}", axis, active_id),
            PivotAction::SetValue { row_id, column_id, .. } => {
                format!("Set value ({}, {})", row_id, column_id)
            }
        }
    }
}
