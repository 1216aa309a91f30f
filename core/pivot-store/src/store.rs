//! FILENAME: core/pivot-store/src/store.rs
//! PURPOSE: The single state container behind the pivot grid.
//! CONTEXT: Every action edits a draft copy of the affected axis and swaps
//! it in only on success, so a rejected action leaves the store untouched.
//! `dispatch` keeps the grid's forgiving contract (invalid actions are
//! logged and ignored); `try_dispatch` reports why an action was rejected.

use std::mem;

use axis_tree::{AxisTree, NodeId};
use log::{debug, info, trace, warn};
use pivot_engine::{
    calculate_pivot, Axis, DataEntry, DataValue, LayoutOptions, PivotData, PivotDefinition,
    PivotView,
};

use crate::action::PivotAction;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::history::{StoreChange, Transaction, UndoStack};
use crate::snapshot::StoreSnapshot;

const LOG_TARGET: &str = "pivot";

pub struct PivotStore {
    definition: PivotDefinition,
    data: PivotData,
    history: UndoStack,
}

impl PivotStore {
    /// Creates a store with default configuration and no data.
    pub fn new(rows: AxisTree, columns: AxisTree) -> Self {
        Self::with_config(rows, columns, PivotData::new(), &StoreConfig::default())
    }

    pub fn with_config(
        rows: AxisTree,
        columns: AxisTree,
        data: PivotData,
        config: &StoreConfig,
    ) -> Self {
        let mut definition = PivotDefinition::new(rows, columns);
        definition.layout = config.layout.clone();
        PivotStore {
            definition,
            data,
            history: UndoStack::with_max_size(config.max_undo),
        }
    }

    /// Restores a store from a snapshot. The snapshot's layout wins over
    /// the config's. Values addressed by a root or an unknown node are dropped.
    pub fn from_snapshot(snapshot: StoreSnapshot, config: &StoreConfig) -> Self {
        let StoreSnapshot {
            rows,
            columns,
            mut data,
            layout,
        } = snapshot;
        let dropped = data.remove_where(|row, column| {
            !addresses_values(&rows, row) || !addresses_values(&columns, column)
        });
        if !dropped.is_empty() {
            warn!(
                target: LOG_TARGET,
                "Dropped {} value(s) outside the snapshot's trees",
                dropped.len()
            );
        }

        let mut store = Self::with_config(rows, columns, data, config);
        store.definition.layout = layout;
        store
    }

    pub fn from_json(json: &str, config: &StoreConfig) -> Result<Self, StoreError> {
        let snapshot = StoreSnapshot::from_json(json)?;
        info!(
            target: LOG_TARGET,
            "Loaded snapshot: {} row nodes, {} column nodes, {} values",
            snapshot.rows.len(),
            snapshot.columns.len(),
            snapshot.data.len()
        );
        Ok(Self::from_snapshot(snapshot, config))
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn rows(&self) -> &AxisTree {
        &self.definition.rows
    }

    pub fn columns(&self) -> &AxisTree {
        &self.definition.columns
    }

    pub fn axis(&self, axis: Axis) -> &AxisTree {
        self.definition.axis(axis)
    }

    pub fn data(&self) -> &PivotData {
        &self.data
    }

    pub fn value(&self, row_id: &str, column_id: &str) -> Option<&DataValue> {
        self.data.get(row_id, column_id)
    }

    pub fn layout(&self) -> &LayoutOptions {
        &self.definition.layout
    }

    pub fn definition(&self) -> &PivotDefinition {
        &self.definition
    }

    /// Bumped on every state change, including undo and redo.
    pub fn version(&self) -> u64 {
        self.definition.version
    }

    /// Renders the current state.
    pub fn view(&self) -> PivotView {
        calculate_pivot(&self.definition, &self.data)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            rows: self.definition.rows.clone(),
            columns: self.definition.columns.clone(),
            data: self.data.clone(),
            layout: self.definition.layout.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        self.snapshot().to_json()
    }

    // ========================================================================
    // WHOLE-STATE SETTERS
    // ========================================================================

    /// Replaces one axis tree. Returns false if the tree is unchanged.
    /// Values addressed by nodes missing from `tree` are pruned in the same
    /// undoable step.
    pub fn set_axis(&mut self, axis: Axis, tree: AxisTree) -> bool {
        if *self.definition.axis(axis) == tree {
            return false;
        }
        let pruned = self.data.remove_where(|row, column| {
            let id = match axis {
                Axis::Row => row,
                Axis::Column => column,
            };
            !addresses_values(&tree, id)
        });

        let previous = mem::replace(self.definition.axis_mut(axis), tree);
        self.history.begin_transaction(format!("Replace {} tree", axis));
        self.history.record(StoreChange::ReplaceAxis { axis, previous });
        self.record_pruned(pruned);
        self.history.commit_transaction();
        self.definition.bump_version();
        true
    }

    pub fn set_layout(&mut self, layout: LayoutOptions) -> bool {
        if self.definition.layout == layout {
            return false;
        }
        let previous = mem::replace(&mut self.definition.layout, layout);
        self.history.record(StoreChange::ReplaceLayout { previous });
        self.definition.bump_version();
        true
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Applies an action. Invalid actions are ignored; returns whether the
    /// state changed.
    pub fn dispatch(&mut self, action: PivotAction) -> bool {
        match self.try_dispatch(&action) {
            Ok(changed) => changed,
            Err(err) => {
                debug!(target: LOG_TARGET, "Ignored '{}': {}", action.description(), err);
                false
            }
        }
    }

    /// Applies an action, reporting why it was rejected.
    /// `Ok(false)` means the action was valid but changed nothing.
    pub fn try_dispatch(&mut self, action: &PivotAction) -> Result<bool, StoreError> {
        let description = action.description();
        let changed = match action {
            PivotAction::Reorder {
                axis,
                parent_id,
                active_id,
                over_id,
            } => self.edit_axis(*axis, &description, |tree| {
                Ok(tree.reorder_sibling(parent_id, active_id, over_id)?)
            })?,

            PivotAction::Rename { axis, id, label } => {
                self.edit_axis(*axis, &description, |tree| {
                    let node = tree
                        .get(id)
                        .ok_or_else(|| axis_tree::TreeError::NodeNotFound(id.clone()))?;
                    if node.label == *label {
                        return Ok(false);
                    }
                    tree.rename(id, label.clone())?;
                    Ok(true)
                })?
            }

            PivotAction::Insert {
                axis,
                parent_id,
                id,
                label,
            } => self.edit_axis(*axis, &description, |tree| {
                tree.insert(parent_id, id.clone(), label.clone())?;
                Ok(true)
            })?,

            PivotAction::Delete { axis, id } => self.delete_subtree(*axis, id, &description)?,

            PivotAction::DragEnd {
                axis,
                active_id,
                over_id,
            } => self.drag_end(*axis, active_id, over_id.as_deref(), &description)?,

            PivotAction::SetValue {
                row_id,
                column_id,
                value,
            } => self.write_value(row_id, column_id, value.clone(), &description)?,
        };

        if changed {
            trace!(target: LOG_TARGET, "Applied '{}' (version {})", description, self.version());
        }
        Ok(changed)
    }

    pub fn reorder(&mut self, axis: Axis, parent_id: &str, active_id: &str, over_id: &str) -> bool {
        self.dispatch(PivotAction::Reorder {
            axis,
            parent_id: parent_id.to_string(),
            active_id: active_id.to_string(),
            over_id: over_id.to_string(),
        })
    }

    pub fn rename(&mut self, axis: Axis, id: &str, label: &str) -> bool {
        self.dispatch(PivotAction::Rename {
            axis,
            id: id.to_string(),
            label: label.to_string(),
        })
    }

    pub fn insert(&mut self, axis: Axis, parent_id: &str, id: &str, label: &str) -> bool {
        self.dispatch(PivotAction::Insert {
            axis,
            parent_id: parent_id.to_string(),
            id: id.to_string(),
            label: label.to_string(),
        })
    }

    pub fn delete(&mut self, axis: Axis, id: &str) -> bool {
        self.dispatch(PivotAction::Delete {
            axis,
            id: id.to_string(),
        })
    }

    /// Handles the end of a header drag.
    pub fn handle_drag_end(&mut self, axis: Axis, active_id: &str, over_id: Option<&str>) -> bool {
        self.dispatch(PivotAction::DragEnd {
            axis,
            active_id: active_id.to_string(),
            over_id: over_id.map(str::to_string),
        })
    }

    pub fn set_value(&mut self, row_id: &str, column_id: &str, value: DataValue) -> bool {
        self.dispatch(PivotAction::SetValue {
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            value,
        })
    }

    // ========================================================================
    // UNDO / REDO
    // ========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(transaction) = self.history.pop_undo() else {
            return false;
        };
        debug!(target: LOG_TARGET, "Undo '{}'", transaction.description);
        let inverse = self.apply_transaction(transaction);
        self.history.push_redo(inverse);
        self.definition.bump_version();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(transaction) = self.history.pop_redo() else {
            return false;
        };
        debug!(target: LOG_TARGET, "Redo '{}'", transaction.description);
        let inverse = self.apply_transaction(transaction);
        self.history.push_undo_for_redo(inverse);
        self.definition.bump_version();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Runs `edit` on a draft of the axis and swaps it in if it reports a change.
    fn edit_axis<F>(&mut self, axis: Axis, description: &str, edit: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut AxisTree) -> Result<bool, StoreError>,
    {
        let mut draft = self.definition.axis(axis).clone();
        if !edit(&mut draft)? {
            return Ok(false);
        }

        let previous = mem::replace(self.definition.axis_mut(axis), draft);
        self.history.begin_transaction(description);
        self.history.record(StoreChange::ReplaceAxis { axis, previous });
        self.history.commit_transaction();
        self.definition.bump_version();
        Ok(true)
    }

    /// Removes a subtree and every value addressed by its leaves, as one
    /// undoable transaction.
    fn delete_subtree(&mut self, axis: Axis, id: &str, description: &str) -> Result<bool, StoreError> {
        let mut draft = self.definition.axis(axis).clone();
        let removed = draft.remove_subtree(id)?;

        let previous = mem::replace(self.definition.axis_mut(axis), draft);
        let pruned = self.data.remove_node_values(axis, &removed);

        self.history.begin_transaction(description);
        self.history.record(StoreChange::ReplaceAxis { axis, previous });
        self.record_pruned(pruned);
        self.history.commit_transaction();
        self.definition.bump_version();

        debug!(
            target: LOG_TARGET,
            "Deleted {} {} ({} node(s))",
            axis,
            id,
            removed.len()
        );
        Ok(true)
    }

    fn record_pruned(&mut self, pruned: Vec<DataEntry>) {
        for entry in pruned {
            self.history.record(StoreChange::SetValue {
                row: entry.row,
                column: entry.column,
                previous: Some(entry.value),
            });
        }
    }

    /// Reorders `active_id` onto `over_id` when both share a parent.
    fn drag_end(
        &mut self,
        axis: Axis,
        active_id: &str,
        over_id: Option<&str>,
        description: &str,
    ) -> Result<bool, StoreError> {
        let Some(over_id) = over_id else {
            return Ok(false);
        };
        if active_id == over_id {
            return Ok(false);
        }

        let tree = self.definition.axis(axis);
        for id in [active_id, over_id] {
            if !tree.contains(id) {
                return Err(axis_tree::TreeError::NodeNotFound(id.to_string()).into());
            }
        }
        let parent_id: NodeId = tree
            .common_parent(active_id, over_id)
            .ok_or_else(|| StoreError::CrossParentMove {
                active: active_id.to_string(),
                over: over_id.to_string(),
            })?
            .to_string();

        self.edit_axis(axis, description, |tree| {
            Ok(tree.reorder_sibling(&parent_id, active_id, over_id)?)
        })
    }

    fn write_value(
        &mut self,
        row_id: &str,
        column_id: &str,
        value: DataValue,
        description: &str,
    ) -> Result<bool, StoreError> {
        self.ensure_leaf(Axis::Row, row_id)?;
        self.ensure_leaf(Axis::Column, column_id)?;

        let current = self.data.get(row_id, column_id).cloned().unwrap_or_default();
        if current == value {
            return Ok(false);
        }

        let previous = self.data.set(row_id, column_id, value);
        self.history.begin_transaction(description);
        self.history.record(StoreChange::SetValue {
            row: row_id.to_string(),
            column: column_id.to_string(),
            previous,
        });
        self.history.commit_transaction();
        self.definition.bump_version();
        Ok(true)
    }

    /// Data is addressed by display leaves only: a leaf that is not the root.
    fn ensure_leaf(&self, axis: Axis, id: &str) -> Result<(), StoreError> {
        let tree = self.definition.axis(axis);
        match tree.get(id) {
            Some(node) if node.is_leaf() && !node.is_root() => Ok(()),
            _ => Err(StoreError::NotALeaf {
                axis,
                id: id.to_string(),
            }),
        }
    }

    /// Applies a transaction's changes in reverse order and returns the
    /// transaction that undoes it.
    fn apply_transaction(&mut self, transaction: Transaction) -> Transaction {
        let mut inverse = Transaction::new(transaction.description);
        for change in transaction.changes.into_iter().rev() {
            inverse.add_change(self.apply_change(change));
        }
        inverse
    }

    fn apply_change(&mut self, change: StoreChange) -> StoreChange {
        match change {
            StoreChange::ReplaceAxis { axis, previous } => {
                let current = mem::replace(self.definition.axis_mut(axis), previous);
                StoreChange::ReplaceAxis {
                    axis,
                    previous: current,
                }
            }
            StoreChange::SetValue {
                row,
                column,
                previous,
            } => {
                let current = self
                    .data
                    .set(row.clone(), column.clone(), previous.unwrap_or_default());
                StoreChange::SetValue {
                    row,
                    column,
                    previous: current,
                }
            }
            StoreChange::ReplaceLayout { previous } => {
                let current = mem::replace(&mut self.definition.layout, previous);
                StoreChange::ReplaceLayout { previous: current }
            }
        }
    }
}

/// Values live at non-root nodes of the tree.
fn addresses_values(tree: &AxisTree, id: &str) -> bool {
    tree.get(id).is_some_and(|node| !node.is_root())
}
