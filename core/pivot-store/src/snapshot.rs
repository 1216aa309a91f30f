//! FILENAME: core/pivot-store/src/snapshot.rs
//! PURPOSE: Serializable copy of the store contents (trees, data, layout).
//! CONTEXT: Deserializing validates both trees, so a loaded snapshot always
//! satisfies the single-root, no-cycle invariants.

use axis_tree::AxisTree;
use pivot_engine::{LayoutOptions, PivotData};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub rows: AxisTree,
    pub columns: AxisTree,
    #[serde(default)]
    pub data: PivotData,
    #[serde(default)]
    pub layout: LayoutOptions,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_snapshot_defaults_data_and_layout() {
        let json = r#"{
            "rows": [{"id": "r", "label": "Rows"}],
            "columns": [{"id": "c", "label": "Columns"}]
        }"#;
        let snapshot = StoreSnapshot::from_json(json).unwrap();
        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.layout, LayoutOptions::default());
        assert_eq!(snapshot.rows.root_id(), "r");
    }

    #[test]
    fn test_malformed_tree_is_rejected() {
        let json = r#"{
            "rows": [{"id": "r", "label": "Rows", "children": ["ghost"]}],
            "columns": [{"id": "c", "label": "Columns"}]
        }"#;
        assert!(matches!(
            StoreSnapshot::from_json(json),
            Err(StoreError::Json(_))
        ));
    }
}
