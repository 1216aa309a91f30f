//! FILENAME: core/pivot-store/src/history.rs
//! PURPOSE: Undo/Redo history stack using the Command Pattern.
//! CONTEXT: Stores the state each change replaced. Applying a change swaps
//! the stored state back in and yields the inverse change, so the same
//! records serve both undo and redo.

use std::collections::VecDeque;

use axis_tree::{AxisTree, NodeId};
use pivot_engine::{Axis, DataValue, LayoutOptions};

use crate::config::DEFAULT_MAX_UNDO;

/// A single atomic change that can be undone.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    /// An axis tree was replaced; `previous` is the tree before the edit.
    ReplaceAxis { axis: Axis, previous: AxisTree },
    /// A data value was written; `None` means the cell was empty before.
    SetValue {
        row: NodeId,
        column: NodeId,
        previous: Option<DataValue>,
    },
    /// Layout options were replaced.
    ReplaceLayout { previous: LayoutOptions },
}

impl StoreChange {
    fn describe(&self) -> String {
        match self {
            StoreChange::ReplaceAxis { axis, .. } => format!("Edit {} headers", axis),
            StoreChange::SetValue { row, column, .. } => format!("Set value ({}, {})", row, column),
            StoreChange::ReplaceLayout { .. } => "Change layout".to_string(),
        }
    }
}

/// A transaction groups multiple changes into one undoable action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Human-readable description (e.g., "Delete row eu")
    pub description: String,
    /// The individual changes in this transaction (in order applied)
    pub changes: Vec<StoreChange>,
}

impl Transaction {
    pub fn new(description: impl Into<String>) -> Self {
        Transaction {
            description: description.into(),
            changes: Vec::new(),
        }
    }

    pub fn add_change(&mut self, change: StoreChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The history stack for undo/redo operations.
#[derive(Debug)]
pub struct UndoStack {
    /// Completed transactions that can be undone (most recent at back)
    undo_stack: VecDeque<Transaction>,
    /// Transactions that were undone and can be redone (most recent at back)
    redo_stack: VecDeque<Transaction>,
    /// Currently open transaction being built (for batching)
    current_transaction: Option<Transaction>,
    max_size: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_UNDO)
    }

    /// A zero size is raised to one.
    pub fn with_max_size(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        UndoStack {
            undo_stack: VecDeque::with_capacity(max_size),
            redo_stack: VecDeque::with_capacity(max_size),
            current_transaction: None,
            max_size,
        }
    }

    /// Begin a new transaction for batching multiple changes.
    /// If a transaction is already open, this is a no-op (nested calls ignored).
    pub fn begin_transaction(&mut self, description: impl Into<String>) {
        if self.current_transaction.is_none() {
            self.current_transaction = Some(Transaction::new(description));
        }
    }

    /// Commit the current transaction to the undo stack.
    /// If no transaction is open or it's empty, this is a no-op.
    pub fn commit_transaction(&mut self) {
        if let Some(transaction) = self.current_transaction.take() {
            if !transaction.is_empty() {
                self.push_transaction(transaction);
            }
        }
    }

    /// Record a change. If a transaction is open, add to it.
    /// Otherwise, create a single-change transaction.
    pub fn record(&mut self, change: StoreChange) {
        if let Some(ref mut transaction) = self.current_transaction {
            transaction.add_change(change);
        } else {
            let mut transaction = Transaction::new(change.describe());
            transaction.add_change(change);
            self.push_transaction(transaction);
        }
    }

    /// Push a completed transaction; a new action invalidates redo.
    fn push_transaction(&mut self, transaction: Transaction) {
        self.redo_stack.clear();
        while self.undo_stack.len() >= self.max_size {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(transaction);
    }

    /// Push a transaction to undo stack without clearing redo.
    /// Used by the redo operation.
    pub fn push_undo_for_redo(&mut self, transaction: Transaction) {
        while self.undo_stack.len() >= self.max_size {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(transaction);
    }

    pub fn pop_undo(&mut self) -> Option<Transaction> {
        self.undo_stack.pop_back()
    }

    /// Push a transaction onto the redo stack (after undo).
    pub fn push_redo(&mut self, transaction: Transaction) {
        while self.redo_stack.len() >= self.max_size {
            self.redo_stack.pop_front();
        }
        self.redo_stack.push_back(transaction);
    }

    pub fn pop_redo(&mut self) -> Option<Transaction> {
        self.redo_stack.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the next undo action (for UI).
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|t| t.description.as_str())
    }

    /// Description of the next redo action (for UI).
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|t| t.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_transaction = None;
    }

    /// Current (undo, redo) sizes.
    pub fn stack_sizes(&self) -> (usize, usize) {
        (self.undo_stack.len(), self.redo_stack.len())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
