//! FILENAME: core/axis-tree/src/tree.rs
//! PURPOSE: One axis of header nodes and the mutations the grid supports.
//! CONTEXT: Nodes live in a flat list (insertion order) with an id index.
//! Every public mutation either succeeds and keeps the tree well-formed,
//! or fails with a `TreeError` and leaves the tree untouched.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::{Node, NodeId};

/// A labeled tree with exactly one root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct AxisTree {
    nodes: Vec<Node>,
    index: FxHashMap<NodeId, usize>,
    root_id: NodeId,
}

impl AxisTree {
    /// Creates a tree holding only its root.
    pub fn new(root_id: impl Into<NodeId>, root_label: impl Into<String>) -> Self {
        let root = Node::root(root_id, root_label);
        let root_id = root.id.clone();
        let mut index = FxHashMap::default();
        index.insert(root_id.clone(), 0);
        AxisTree {
            nodes: vec![root],
            index,
            root_id,
        }
    }

    /// Builds a tree from a flat node list, checking every structural invariant.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, TreeError> {
        let mut index = FxHashMap::default();
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), pos).is_some() {
                return Err(TreeError::DuplicateId(node.id.clone()));
            }
        }

        let roots: Vec<&Node> = nodes.iter().filter(|n| n.is_root()).collect();
        if roots.len() != 1 {
            return Err(TreeError::Malformed(format!(
                "expected exactly one root, found {}",
                roots.len()
            )));
        }
        let root_id = roots[0].id.clone();

        for node in &nodes {
            if let Some(parent_id) = &node.parent_id {
                let parent = index
                    .get(parent_id)
                    .map(|&pos| &nodes[pos])
                    .ok_or_else(|| TreeError::ParentNotFound(parent_id.clone()))?;
                let listed = parent.children.iter().filter(|c| **c == node.id).count();
                if listed != 1 {
                    return Err(TreeError::Malformed(format!(
                        "{} is listed {} times under its parent {}",
                        node.id, listed, parent_id
                    )));
                }
            }

            for child_id in &node.children {
                let child = index
                    .get(child_id)
                    .map(|&pos| &nodes[pos])
                    .ok_or_else(|| TreeError::NodeNotFound(child_id.clone()))?;
                if child.parent_id.as_deref() != Some(node.id.as_str()) {
                    return Err(TreeError::Malformed(format!(
                        "{} lists child {} whose parent is {:?}",
                        node.id, child_id, child.parent_id
                    )));
                }
            }
        }

        let tree = AxisTree {
            nodes,
            index,
            root_id,
        };

        // Parent links are consistent at this point, so anything the root
        // cannot reach sits on a cycle.
        let reachable = tree.descendants(&tree.root_id).len();
        if reachable != tree.nodes.len() {
            return Err(TreeError::Malformed(format!(
                "{} node(s) unreachable from root {}",
                tree.nodes.len() - reachable,
                tree.root_id
            )));
        }

        Ok(tree)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn root(&self) -> &Node {
        &self.nodes[self.index[&self.root_id]]
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in flat-list order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child ids of `id`, empty if the node is a leaf or unknown.
    pub fn children(&self, id: &str) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        self.get(id)
            .and_then(|n| n.parent_id.as_deref())
            .and_then(|p| self.get(p))
    }

    /// Index of `id` among its siblings.
    pub fn position_in_parent(&self, id: &str) -> Option<usize> {
        self.parent_of(id).and_then(|p| p.child_position(id))
    }

    /// The shared parent of two distinct siblings, if they have one.
    pub fn common_parent(&self, a: &str, b: &str) -> Option<&str> {
        let pa = self.get(a)?.parent_id.as_deref()?;
        let pb = self.get(b)?.parent_id.as_deref()?;
        (pa == pb).then_some(pa)
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self, id: &str) -> Option<usize> {
        let mut node = self.get(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent_id.as_deref().and_then(|p| self.get(p)) {
            depth += 1;
            node = parent;
        }
        Some(depth)
    }

    /// Depth of the deepest node (0 for a lone root).
    pub fn max_depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root_id.as_str(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            for child in self.children(id) {
                stack.push((child.as_str(), depth + 1));
            }
        }
        max
    }

    /// `id` and everything below it, depth-first pre-order.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current.to_string());
            for child in self.children(current).iter().rev() {
                stack.push(child.as_str());
            }
        }
        out
    }

    /// Leaves of the subtree at `id` in display order. A leaf yields itself.
    pub fn leaf_ids(&self, id: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let Some(start) = self.get(id) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node.id.as_str());
                continue;
            }
            for child in node.children.iter().rev() {
                if let Some(c) = self.get(child) {
                    stack.push(c);
                }
            }
        }
        out
    }

    /// Number of leaves under `id`; the width of its merged header cell.
    pub fn leaf_count(&self, id: &str) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = self.get(id).into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                count += 1;
            } else {
                stack.extend(node.children.iter().filter_map(|c| self.get(c)));
            }
        }
        count
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Moves `active_id` to the position currently held by `over_id`
    /// within `parent_id`'s children. Returns false when nothing moved.
    pub fn reorder_sibling(
        &mut self,
        parent_id: &str,
        active_id: &str,
        over_id: &str,
    ) -> Result<bool, TreeError> {
        let parent = self
            .node_mut(parent_id)
            .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;

        let not_a_child = |child: &str| TreeError::NotAChild {
            parent: parent_id.to_string(),
            child: child.to_string(),
        };
        let from = parent
            .child_position(active_id)
            .ok_or_else(|| not_a_child(active_id))?;
        let to = parent
            .child_position(over_id)
            .ok_or_else(|| not_a_child(over_id))?;

        if from == to {
            return Ok(false);
        }
        let moved = parent.children.remove(from);
        parent.children.insert(to, moved);
        Ok(true)
    }

    pub fn rename(&mut self, id: &str, label: impl Into<String>) -> Result<(), TreeError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        node.label = label.into();
        Ok(())
    }

    /// Appends a new leaf under `parent_id`.
    pub fn insert(
        &mut self,
        parent_id: &str,
        id: impl Into<NodeId>,
        label: impl Into<String>,
    ) -> Result<(), TreeError> {
        let id = id.into();
        if self.contains(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        let parent = self
            .node_mut(parent_id)
            .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
        parent.children.push(id.clone());

        self.nodes.push(Node::leaf(id.clone(), label, parent_id));
        self.index.insert(id, self.nodes.len() - 1);
        Ok(())
    }

    /// Removes `id` and its whole subtree. Returns the removed ids in
    /// depth-first pre-order.
    pub fn remove_subtree(&mut self, id: &str) -> Result<Vec<NodeId>, TreeError> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        let Some(parent_id) = node.parent_id.clone() else {
            return Err(TreeError::RootRemoval(id.to_string()));
        };

        if let Some(parent) = self.node_mut(&parent_id) {
            parent.children.retain(|c| c != id);
        }

        let removed = self.descendants(id);
        {
            let doomed: FxHashSet<&str> = removed.iter().map(String::as_str).collect();
            self.nodes.retain(|n| !doomed.contains(n.id.as_str()));
        }
        self.reindex();

        Ok(removed)
    }

    /// Consumes the tree, returning the flat node list.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let pos = *self.index.get(id)?;
        self.nodes.get_mut(pos)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id.clone(), pos);
        }
    }
}

impl TryFrom<Vec<Node>> for AxisTree {
    type Error = TreeError;

    fn try_from(nodes: Vec<Node>) -> Result<Self, Self::Error> {
        AxisTree::from_nodes(nodes)
    }
}

impl From<AxisTree> for Vec<Node> {
    fn from(tree: AxisTree) -> Self {
        tree.into_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root
    /// ├── na
    /// │   ├── us
    /// │   └── ca
    /// ├── eu
    /// │   ├── de
    /// │   ├── fr
    /// │   └── it
    /// └── apac
    fn sample_tree() -> AxisTree {
        let mut tree = AxisTree::new("root", "All regions");
        tree.insert("root", "na", "North America").unwrap();
        tree.insert("root", "eu", "Europe").unwrap();
        tree.insert("root", "apac", "Asia Pacific").unwrap();
        tree.insert("na", "us", "United States").unwrap();
        tree.insert("na", "ca", "Canada").unwrap();
        tree.insert("eu", "de", "Germany").unwrap();
        tree.insert("eu", "fr", "France").unwrap();
        tree.insert("eu", "it", "Italy").unwrap();
        tree
    }

    fn ids(tree: &AxisTree) -> Vec<String> {
        let mut ids: Vec<String> = tree.nodes().iter().map(|n| n.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_reorder_moves_to_target_position() {
        let mut tree = sample_tree();

        assert_eq!(tree.reorder_sibling("eu", "de", "it"), Ok(true));
        assert_eq!(tree.children("eu"), ["fr", "it", "de"]);

        assert_eq!(tree.reorder_sibling("eu", "de", "fr"), Ok(true));
        assert_eq!(tree.children("eu"), ["de", "fr", "it"]);
    }

    #[test]
    fn test_reorder_preserves_child_set() {
        let mut tree = sample_tree();
        let mut before: Vec<NodeId> = tree.children("root").to_vec();

        tree.reorder_sibling("root", "apac", "na").unwrap();
        let mut after: Vec<NodeId> = tree.children("root").to_vec();
        assert_eq!(after, ["apac", "na", "eu"]);

        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_same_node_is_noop() {
        let mut tree = sample_tree();
        assert_eq!(tree.reorder_sibling("eu", "fr", "fr"), Ok(false));
        assert_eq!(tree.children("eu"), ["de", "fr", "it"]);
    }

    #[test]
    fn test_reorder_rejects_non_siblings() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let err = tree.reorder_sibling("eu", "de", "us").unwrap_err();
        assert_eq!(
            err,
            TreeError::NotAChild {
                parent: "eu".to_string(),
                child: "us".to_string()
            }
        );
        assert!(matches!(
            tree.reorder_sibling("nowhere", "de", "fr"),
            Err(TreeError::ParentNotFound(_))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename() {
        let mut tree = sample_tree();
        tree.rename("de", "Deutschland").unwrap();
        assert_eq!(tree.get("de").unwrap().label, "Deutschland");

        assert_eq!(
            tree.rename("xx", "Nope"),
            Err(TreeError::NodeNotFound("xx".to_string()))
        );
    }

    #[test]
    fn test_insert_appends_leaf() {
        let mut tree = sample_tree();
        tree.insert("apac", "jp", "Japan").unwrap();

        assert_eq!(tree.children("apac"), ["jp"]);
        let jp = tree.get("jp").unwrap();
        assert_eq!(jp.parent_id.as_deref(), Some("apac"));
        assert!(jp.is_leaf());
        assert_eq!(tree.nodes().last().unwrap().id, "jp");
    }

    #[test]
    fn test_insert_missing_parent_or_duplicate_is_rejected() {
        let mut tree = sample_tree();
        let before = tree.clone();

        assert_eq!(
            tree.insert("latam", "br", "Brazil"),
            Err(TreeError::ParentNotFound("latam".to_string()))
        );
        assert_eq!(
            tree.insert("eu", "us", "Duplicate"),
            Err(TreeError::DuplicateId("us".to_string()))
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_subtree_removes_exactly_descendants() {
        let mut tree = sample_tree();
        let mut expected = ids(&tree);

        let removed = tree.remove_subtree("eu").unwrap();
        assert_eq!(removed, ["eu", "de", "fr", "it"]);

        expected.retain(|id| !removed.contains(id));
        assert_eq!(ids(&tree), expected);
        assert_eq!(tree.children("root"), ["na", "apac"]);

        // Index stays coherent after the flat list shrinks.
        assert_eq!(tree.get("apac").unwrap().label, "Asia Pacific");
        assert_eq!(tree.get("ca").unwrap().label, "Canada");
        assert!(tree.get("fr").is_none());
    }

    #[test]
    fn test_remove_root_or_unknown_is_rejected() {
        let mut tree = sample_tree();
        assert_eq!(
            tree.remove_subtree("root"),
            Err(TreeError::RootRemoval("root".to_string()))
        );
        assert_eq!(
            tree.remove_subtree("mars"),
            Err(TreeError::NodeNotFound("mars".to_string()))
        );
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_insert_then_delete_restores_state() {
        let mut tree = sample_tree();
        let children_before = tree.children("na").to_vec();
        let ids_before = ids(&tree);

        tree.insert("na", "mx", "Mexico").unwrap();
        tree.remove_subtree("mx").unwrap();

        assert_eq!(tree.children("na"), children_before.as_slice());
        assert_eq!(ids(&tree), ids_before);
    }

    #[test]
    fn test_leaf_count_matches_leaf_ids() {
        let tree = sample_tree();
        for node in tree.nodes() {
            assert_eq!(tree.leaf_count(&node.id), tree.leaf_ids(&node.id).len());
        }
        assert_eq!(
            tree.leaf_ids("root"),
            ["us", "ca", "de", "fr", "it", "apac"]
        );
        assert_eq!(tree.leaf_count("eu"), 3);
        assert_eq!(tree.leaf_count("us"), 1);
        assert_eq!(tree.leaf_count("missing"), 0);
        assert!(tree.leaf_ids("missing").is_empty());
    }

    #[test]
    fn test_deep_chain_traversals() {
        let mut tree = AxisTree::new("r", "Root");
        let mut parent = "r".to_string();
        for i in 0..20_000 {
            let id = format!("n{}", i);
            tree.insert(&parent, &id, "Level").unwrap();
            parent = id;
        }

        assert_eq!(tree.leaf_count("r"), 1);
        assert_eq!(tree.leaf_ids("r"), ["n19999"]);
        assert_eq!(tree.max_depth(), 20_000);
        assert_eq!(tree.depth("n19999"), Some(20_000));

        let restored = AxisTree::from_nodes(tree.clone().into_nodes()).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_depth_and_relationships() {
        let tree = sample_tree();
        assert_eq!(tree.depth("root"), Some(0));
        assert_eq!(tree.depth("fr"), Some(2));
        assert_eq!(tree.depth("zz"), None);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(AxisTree::new("r", "R").max_depth(), 0);

        assert_eq!(tree.common_parent("de", "it"), Some("eu"));
        assert_eq!(tree.common_parent("de", "us"), None);
        assert_eq!(tree.common_parent("root", "na"), None);
        assert_eq!(tree.position_in_parent("it"), Some(2));
        assert_eq!(tree.parent_of("ca").map(|n| n.id.as_str()), Some("na"));
    }

    #[test]
    fn test_from_nodes_rejects_malformed_input() {
        let good = sample_tree().into_nodes();
        assert!(AxisTree::from_nodes(good.clone()).is_ok());

        // Two roots.
        let mut two_roots = good.clone();
        two_roots.push(Node::root("other", "Other"));
        assert!(matches!(
            AxisTree::from_nodes(two_roots),
            Err(TreeError::Malformed(_))
        ));

        // Child listed but not present.
        let mut dangling = good.clone();
        dangling[0].children.push("ghost".to_string());
        assert_eq!(
            AxisTree::from_nodes(dangling),
            Err(TreeError::NodeNotFound("ghost".to_string()))
        );

        // Node whose parent does not list it.
        let mut orphan = good.clone();
        orphan.push(Node::leaf("lost", "Lost", "eu"));
        assert!(matches!(
            AxisTree::from_nodes(orphan),
            Err(TreeError::Malformed(_))
        ));

        // Duplicate id.
        let mut dup = good;
        dup.push(Node::leaf("de", "Again", "eu"));
        assert_eq!(
            AxisTree::from_nodes(dup),
            Err(TreeError::DuplicateId("de".to_string()))
        );
    }

    #[test]
    fn test_from_nodes_rejects_cycle() {
        let mut a = Node::leaf("a", "A", "b");
        let mut b = Node::leaf("b", "B", "a");
        a.children.push("b".to_string());
        b.children.push("a".to_string());
        let nodes = vec![Node::root("root", "Root"), a, b];

        assert!(matches!(
            AxisTree::from_nodes(nodes),
            Err(TreeError::Malformed(_))
        ));
    }

    #[test]
    fn test_serde_uses_flat_node_list() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.starts_with('['));

        let back: AxisTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);

        let bad = r#"[{"id":"a","label":"A"},{"id":"b","label":"B"}]"#;
        assert!(serde_json::from_str::<AxisTree>(bad).is_err());
    }
}
