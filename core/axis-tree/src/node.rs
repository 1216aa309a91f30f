//! FILENAME: core/axis-tree/src/node.rs
//! PURPOSE: A single labeled header node.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Unique identifier of a node within one axis.
pub type NodeId = String;

/// Ordered child identifiers. Most header groups have a handful of children.
pub type ChildIds = SmallVec<[NodeId; 4]>;

/// One entry in an axis tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Text shown in the header cell.
    pub label: String,

    /// Absent only for the root.
    #[serde(default)]
    pub parent_id: Option<NodeId>,

    /// Child identifiers in display order.
    #[serde(default)]
    pub children: ChildIds,
}

impl Node {
    /// Creates a root node (no parent, no children).
    pub fn root(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            parent_id: None,
            children: ChildIds::new(),
        }
    }

    /// Creates a leaf attached to `parent_id`.
    pub fn leaf(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        parent_id: impl Into<NodeId>,
    ) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            parent_id: Some(parent_id.into()),
            children: ChildIds::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Index of `child` within this node's child sequence.
    pub fn child_position(&self, child: &str) -> Option<usize> {
        self.children.iter().position(|c| c == child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_and_root_flags() {
        let root = Node::root("root", "All");
        assert!(root.is_root());
        assert!(root.is_leaf());

        let leaf = Node::leaf("q1", "Q1", "root");
        assert!(!leaf.is_root());
        assert_eq!(leaf.parent_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_deserialize_defaults_missing_fields() {
        let node: Node = serde_json::from_str(r#"{"id":"a","label":"A"}"#).unwrap();
        assert!(node.parent_id.is_none());
        assert!(node.children.is_empty());

        let node: Node = serde_json::from_str(
            r#"{"id":"b","label":"B","parentId":"a","children":["c","d"]}"#,
        )
        .unwrap();
        assert_eq!(node.parent_id.as_deref(), Some("a"));
        assert_eq!(node.child_position("d"), Some(1));
    }
}
