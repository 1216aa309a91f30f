//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for pivot store integration tests.

#![allow(dead_code)]

use pivot_store::demo::sample_store;
use pivot_store::{Axis, AxisTree, NodeId, PivotStore, StoreConfig};

/// Test harness wrapping a store seeded with the demo data set.
pub struct TestHarness {
    pub store: PivotStore,
}

impl TestHarness {
    /// Demo store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        TestHarness {
            store: sample_store(&config).expect("demo trees are well-formed"),
        }
    }

    /// Demo store with a total row and a total column.
    pub fn with_totals() -> Self {
        let mut config = StoreConfig::default();
        config.layout.total_column = true;
        config.layout.total_row = true;
        Self::with_config(config)
    }

    pub fn children(&self, axis: Axis, id: &str) -> Vec<NodeId> {
        self.store.axis(axis).children(id).to_vec()
    }

    /// Sorted ids of every node on an axis.
    pub fn node_ids(&self, axis: Axis) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .store
            .axis(axis)
            .nodes()
            .iter()
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Display text of one view row (spanned cells skipped).
    pub fn view_row(&self, row: usize) -> Vec<String> {
        self.store
            .view()
            .row_text(row)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Both trees still satisfy every structural invariant.
    pub fn assert_well_formed(&self) {
        for axis in [Axis::Row, Axis::Column] {
            let nodes = self.store.axis(axis).nodes().to_vec();
            if let Err(err) = AxisTree::from_nodes(nodes) {
                panic!("{} tree is malformed: {}", axis, err);
            }
        }
    }
}
