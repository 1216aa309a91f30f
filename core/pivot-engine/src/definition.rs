//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a pivot table:
//! the two header trees and the layout options. These structures are
//! - Serializable (for snapshots and the front-end bridge)
//! - Cheap to clone as immutable snapshots of user intent

use serde::{Deserialize, Serialize};
use axis_tree::AxisTree;

// ============================================================================
// AXIS
// ============================================================================

/// One of the two independent header trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// LAYOUT OPTIONS
// ============================================================================

/// Controls how the pivot table is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    /// Append a column holding the sum of each data row.
    pub total_column: bool,

    /// Append a row holding the sum of each data column.
    pub total_row: bool,

    /// Header text of the total row/column.
    pub total_label: String,

    /// Text to fill data cells that have no value.
    pub empty_cell_text: Option<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            total_column: false,
            total_row: false,
            total_label: "Total".to_string(),
            empty_cell_text: None,
        }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete definition of a pivot table's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotDefinition {
    /// Row header tree (left side).
    pub rows: AxisTree,

    /// Column header tree (top).
    pub columns: AxisTree,

    #[serde(default)]
    pub layout: LayoutOptions,

    /// Version for cache coherency with the front end.
    #[serde(default)]
    pub version: u64,
}

impl PivotDefinition {
    pub fn new(rows: AxisTree, columns: AxisTree) -> Self {
        PivotDefinition {
            rows,
            columns,
            layout: LayoutOptions::default(),
            version: 0,
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisTree {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisTree {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    /// Increments the version (for cache invalidation).
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults_fill_missing_fields() {
        let layout: LayoutOptions = serde_json::from_str(r#"{"totalRow":true}"#).unwrap();
        assert!(layout.total_row);
        assert!(!layout.total_column);
        assert_eq!(layout.total_label, "Total");
    }

    #[test]
    fn test_axis_accessors() {
        let mut def = PivotDefinition::new(AxisTree::new("r", "Rows"), AxisTree::new("c", "Cols"));
        assert_eq!(def.axis(Axis::Column).root_id(), "c");
        def.axis_mut(Axis::Row).insert("r", "a", "A").unwrap();
        assert_eq!(def.rows.len(), 2);

        def.bump_version();
        assert_eq!(def.version, 1);
        assert_eq!(Axis::Row.to_string(), "row");
    }
}
