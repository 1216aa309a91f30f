//! FILENAME: core/pivot-store/src/config.rs
//! PURPOSE: Store settings, loadable from JSON with defaults for missing keys.

use pivot_engine::LayoutOptions;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Maximum number of undo operations to keep in history.
pub const DEFAULT_MAX_UNDO: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Depth of the undo history.
    pub max_undo: usize,

    /// Layout applied to stores created from this config.
    pub layout: LayoutOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            max_undo: DEFAULT_MAX_UNDO,
            layout: LayoutOptions::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.max_undo, 100);
    }

    #[test]
    fn test_partial_json() {
        let config =
            StoreConfig::from_json(r#"{"maxUndo": 5, "layout": {"totalColumn": true}}"#).unwrap();
        assert_eq!(config.max_undo, 5);
        assert!(config.layout.total_column);
        assert_eq!(config.layout.total_label, "Total");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            StoreConfig::from_json("{\"maxUndo\": \"lots\"}"),
            Err(StoreError::Json(_))
        ));
    }
}
