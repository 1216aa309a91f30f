//! FILENAME: core/pivot-engine/src/data.rs
//! Pivot Data - values addressed by (row leaf, column leaf).

use std::mem;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use axis_tree::NodeId;

use crate::definition::Axis;

/// A single value stored at a row/column leaf intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum DataValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl DataValue {
    pub fn text(s: impl Into<String>) -> Self {
        DataValue::Text(s.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataValue::Empty)
    }

    /// Display string for a view cell.
    pub fn display(&self) -> String {
        match self {
            DataValue::Empty => String::new(),
            DataValue::Number(n) => format!("{}", n),
            DataValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

/// One stored value, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    pub row: NodeId,
    pub column: NodeId,
    pub value: DataValue,
}

/// Sparse value store for the data area, keyed by row leaf then column leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DataEntry>", into = "Vec<DataEntry>")]
pub struct PivotData {
    rows: FxHashMap<NodeId, FxHashMap<NodeId, DataValue>>,
}

impl PivotData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<&DataValue> {
        self.rows.get(row)?.get(column)
    }

    /// Stores a value and returns the one it replaced.
    /// Setting `DataValue::Empty` clears the cell.
    pub fn set(
        &mut self,
        row: impl Into<NodeId>,
        column: impl Into<NodeId>,
        value: DataValue,
    ) -> Option<DataValue> {
        let (row, column) = (row.into(), column.into());
        if value.is_empty() {
            return self.remove(&row, &column);
        }
        self.rows.entry(row).or_default().insert(column, value)
    }

    pub fn remove(&mut self, row: &str, column: &str) -> Option<DataValue> {
        let columns = self.rows.get_mut(row)?;
        let previous = columns.remove(column);
        if columns.is_empty() {
            self.rows.remove(row);
        }
        previous
    }

    /// Removes every value addressed by one of `ids` on `axis`.
    /// Returns the removed entries so callers can restore them.
    pub fn remove_node_values(&mut self, axis: Axis, ids: &[NodeId]) -> Vec<DataEntry> {
        let ids: FxHashSet<&str> = ids.iter().map(String::as_str).collect();
        self.remove_where(|row, column| match axis {
            Axis::Row => ids.contains(row),
            Axis::Column => ids.contains(column),
        })
    }

    /// Removes every value whose (row, column) key matches `pred`.
    /// Returns the removed entries sorted by key.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<DataEntry>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let mut removed = Vec::new();
        self.rows.retain(|row, columns| {
            columns.retain(|column, value| {
                if pred(row, column) {
                    removed.push(DataEntry {
                        row: row.clone(),
                        column: column.clone(),
                        value: mem::take(value),
                    });
                    false
                } else {
                    true
                }
            });
            !columns.is_empty()
        });
        sort_entries(&mut removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All stored values as (row, column, value), in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &DataValue)> {
        self.rows.iter().flat_map(|(row, columns)| {
            columns.iter().map(move |(column, value)| (row, column, value))
        })
    }
}

fn sort_entries(entries: &mut [DataEntry]) {
    entries.sort_by(|a, b| (&a.row, &a.column).cmp(&(&b.row, &b.column)));
}

impl From<Vec<DataEntry>> for PivotData {
    fn from(entries: Vec<DataEntry>) -> Self {
        let mut data = PivotData::new();
        for entry in entries {
            data.set(entry.row, entry.column, entry.value);
        }
        data
    }
}

impl From<PivotData> for Vec<DataEntry> {
    fn from(data: PivotData) -> Self {
        let mut entries: Vec<DataEntry> = data
            .rows
            .into_iter()
            .flat_map(|(row, columns)| {
                columns.into_iter().map(move |(column, value)| DataEntry {
                    row: row.clone(),
                    column,
                    value,
                })
            })
            .collect();
        sort_entries(&mut entries);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_and_empty_clears() {
        let mut data = PivotData::new();
        assert_eq!(data.set("us", "q1", 10.0.into()), None);
        assert_eq!(data.set("us", "q1", 12.0.into()), Some(DataValue::Number(10.0)));
        assert_eq!(data.get("us", "q1"), Some(&DataValue::Number(12.0)));

        assert_eq!(data.set("us", "q1", DataValue::Empty), Some(DataValue::Number(12.0)));
        assert!(data.get("us", "q1").is_none());
        assert!(data.is_empty());
    }

    #[test]
    fn test_remove_node_values_by_axis() {
        let mut data = PivotData::new();
        data.set("us", "q1", 1.0.into());
        data.set("us", "q2", 2.0.into());
        data.set("ca", "q1", 3.0.into());

        let removed = data.remove_node_values(Axis::Column, &["q1".to_string()]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].row, "ca");
        assert_eq!(data.len(), 1);

        let removed = data.remove_node_values(Axis::Row, &["us".to_string()]);
        assert_eq!(removed[0].value, DataValue::Number(2.0));
        assert!(data.is_empty());
    }

    #[test]
    fn test_remove_where_drops_emptied_rows() {
        let mut data = PivotData::new();
        data.set("us", "q1", 1.0.into());
        data.set("ca", "q1", 2.0.into());
        data.set("ca", "q2", 3.0.into());

        let removed = data.remove_where(|row, column| row == "us" || column == "q2");
        let keys: Vec<(&str, &str)> = removed
            .iter()
            .map(|e| (e.row.as_str(), e.column.as_str()))
            .collect();
        assert_eq!(keys, [("ca", "q2"), ("us", "q1")]);
        assert_eq!(data.len(), 1);
        assert_eq!(data.iter().count(), 1);
        assert_eq!(data.remove("us", "q1"), None);
        assert_eq!(data, PivotData::from(vec![DataEntry {
            row: "ca".to_string(),
            column: "q1".to_string(),
            value: 2.0.into(),
        }]));
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut data = PivotData::new();
        data.set("us", "q1", 5.0.into());
        data.set("us", "q2", "n/a".into());

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"row": "us", "column": "q1", "value": {"type": "number", "value": 5.0}},
                {"row": "us", "column": "q2", "value": {"type": "text", "value": "n/a"}}
            ])
        );

        let back: PivotData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::Number(1200.0).display(), "1200");
        assert_eq!(DataValue::Number(2.5).display(), "2.5");
        assert_eq!(DataValue::Empty.display(), "");
    }
}
