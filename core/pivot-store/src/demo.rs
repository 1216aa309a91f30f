//! FILENAME: core/pivot-store/src/demo.rs
//! PURPOSE: Mock regional sales figures for demos, tests and benchmarks.
//! CONTEXT: Rows are regions → countries, columns are years → quarters
//! (2024 only has half-years, so the two year groups differ in width).

use axis_tree::{AxisTree, TreeError};
use pivot_engine::{DataValue, PivotData};

use crate::config::StoreConfig;
use crate::store::PivotStore;

pub const ROW_ROOT: &str = "rows";
pub const COLUMN_ROOT: &str = "columns";

type Group<'a> = (&'a str, &'a str, &'a [(&'a str, &'a str)]);

const REGIONS: &[Group<'static>] = &[
    (
        "na",
        "North America",
        &[("us", "United States"), ("ca", "Canada"), ("mx", "Mexico")],
    ),
    (
        "eu",
        "Europe",
        &[("de", "Germany"), ("fr", "France"), ("uk", "United Kingdom")],
    ),
    ("apac", "Asia Pacific", &[("jp", "Japan"), ("au", "Australia")]),
];

const PERIODS: &[Group<'static>] = &[
    (
        "y2023",
        "2023",
        &[
            ("y2023-q1", "Q1"),
            ("y2023-q2", "Q2"),
            ("y2023-q3", "Q3"),
            ("y2023-q4", "Q4"),
        ],
    ),
    ("y2024", "2024", &[("y2024-h1", "H1"), ("y2024-h2", "H2")]),
];

fn build_tree(root: &str, label: &str, groups: &[Group<'_>]) -> Result<AxisTree, TreeError> {
    let mut tree = AxisTree::new(root, label);
    for (group_id, group_label, leaves) in groups {
        tree.insert(root, *group_id, *group_label)?;
        for (leaf_id, leaf_label) in leaves.iter() {
            tree.insert(group_id, *leaf_id, *leaf_label)?;
        }
    }
    Ok(tree)
}

pub fn sample_rows() -> Result<AxisTree, TreeError> {
    build_tree(ROW_ROOT, "Region", REGIONS)
}

pub fn sample_columns() -> Result<AxisTree, TreeError> {
    build_tree(COLUMN_ROOT, "Period", PERIODS)
}

/// One value per (row leaf, column leaf) pair, derived from their positions.
pub fn sample_data(rows: &AxisTree, columns: &AxisTree) -> PivotData {
    let mut data = PivotData::new();
    let column_leaves = columns.leaf_ids(columns.root_id());
    for (ri, row) in rows.leaf_ids(rows.root_id()).into_iter().enumerate() {
        for (ci, column) in column_leaves.iter().enumerate() {
            let value = 100.0 + (ri * 10 + ci) as f64;
            data.set(row, *column, DataValue::Number(value));
        }
    }
    data
}

pub fn sample_store(config: &StoreConfig) -> Result<PivotStore, TreeError> {
    let rows = sample_rows()?;
    let columns = sample_columns()?;
    let data = sample_data(&rows, &columns);
    Ok(PivotStore::with_config(rows, columns, data, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shapes() {
        let rows = sample_rows().unwrap();
        let columns = sample_columns().unwrap();
        assert_eq!(rows.leaf_count(ROW_ROOT), 8);
        assert_eq!(columns.leaf_count(COLUMN_ROOT), 6);
        assert_eq!(sample_data(&rows, &columns).len(), 48);
    }

    #[test]
    fn test_sample_values() {
        let store = sample_store(&StoreConfig::default()).unwrap();
        assert_eq!(store.value("us", "y2023-q1"), Some(&DataValue::Number(100.0)));
        assert_eq!(store.value("ca", "y2023-q2"), Some(&DataValue::Number(111.0)));
        assert_eq!(store.value("au", "y2024-h2"), Some(&DataValue::Number(175.0)));
    }
}
