//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Renderable output for the front end.
//!
//! The layout engine turns the two header trees and the data values into
//! a 2D grid of cells. Merged header cells are expressed as a master cell
//! carrying `row_span`/`col_span`, with every covered position marked
//! `is_spanned` so the renderer can skip it.

use serde::{Deserialize, Serialize};
use axis_tree::NodeId;

use crate::data::DataValue;

// ============================================================================
// CELL TYPES AND METADATA
// ============================================================================

/// The type of a cell in the pivot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PivotCellType {
    /// Top-left block above the row headers.
    Corner,
    /// Row header label (left side).
    RowHeader,
    /// Column header label (top).
    ColumnHeader,
    /// Value at a row leaf / column leaf intersection.
    Data,
    /// Header of the total row or total column.
    TotalHeader,
    /// Sum along a data row (total column).
    RowTotal,
    /// Sum along a data column (total row).
    ColumnTotal,
    /// Intersection of the total row and total column.
    GrandTotal,
    /// Covered by a merged master cell; not rendered.
    Spanned,
}

// ============================================================================
// VIEW CELL
// ============================================================================

/// A single cell in the pivot view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotViewCell {
    pub value: DataValue,

    /// Pre-formatted display string.
    pub formatted_value: String,

    pub cell_type: PivotCellType,

    /// Header node this cell belongs to (headers only).
    pub node_id: Option<NodeId>,

    /// Header level (0 = outermost). Zero for non-header cells.
    pub level: u16,

    pub row_span: u32,
    pub col_span: u32,

    /// Whether this header can be dragged (every non-root header node).
    pub is_draggable: bool,

    pub is_bold: bool,

    /// Whether this cell is covered by another cell's span.
    pub is_spanned: bool,
}

impl PivotViewCell {
    fn base(value: DataValue, formatted_value: String, cell_type: PivotCellType) -> Self {
        PivotViewCell {
            value,
            formatted_value,
            cell_type,
            node_id: None,
            level: 0,
            row_span: 1,
            col_span: 1,
            is_draggable: false,
            is_bold: false,
            is_spanned: false,
        }
    }

    /// Creates a data cell.
    pub fn data(value: DataValue) -> Self {
        let formatted = value.display();
        Self::base(value, formatted, PivotCellType::Data)
    }

    /// Creates a row header cell for `node_id`.
    pub fn row_header(node_id: NodeId, label: String, level: u16) -> Self {
        let mut cell = Self::base(DataValue::Text(label.clone()), label, PivotCellType::RowHeader);
        cell.node_id = Some(node_id);
        cell.level = level;
        cell.is_draggable = true;
        cell
    }

    /// Creates a column header cell for `node_id`.
    pub fn column_header(node_id: NodeId, label: String, level: u16) -> Self {
        let mut cell = Self::column_header_text(label, level);
        cell.node_id = Some(node_id);
        cell.is_draggable = true;
        cell
    }

    fn column_header_text(label: String, level: u16) -> Self {
        let mut cell = Self::base(DataValue::Text(label.clone()), label, PivotCellType::ColumnHeader);
        cell.level = level;
        cell.is_bold = true;
        cell
    }

    /// Creates the corner cell.
    pub fn corner() -> Self {
        Self::base(DataValue::Empty, String::new(), PivotCellType::Corner)
    }

    /// Creates the header of a total row or column.
    pub fn total_header(label: String) -> Self {
        let mut cell = Self::base(DataValue::Text(label.clone()), label, PivotCellType::TotalHeader);
        cell.is_bold = true;
        cell
    }

    /// Creates a total cell of the given kind. `None` renders empty.
    pub fn total(cell_type: PivotCellType, sum: Option<f64>) -> Self {
        let value = sum.map(DataValue::Number).unwrap_or_default();
        let formatted = value.display();
        let mut cell = Self::base(value, formatted, cell_type);
        cell.is_bold = true;
        cell
    }

    /// Creates a spanned (hidden) cell.
    pub fn spanned() -> Self {
        let mut cell = Self::base(DataValue::Empty, String::new(), PivotCellType::Spanned);
        cell.is_spanned = true;
        cell
    }

    /// Sets row span.
    pub fn with_row_span(mut self, span: u32) -> Self {
        self.row_span = span;
        self
    }

    /// Sets column span.
    pub fn with_col_span(mut self, span: u32) -> Self {
        self.col_span = span;
        self
    }
}

// ============================================================================
// ROW AND COLUMN DESCRIPTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PivotRowType {
    ColumnHeader,
    Data,
    Total,
}

/// Describes a row in the pivot view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRowDescriptor {
    pub view_row: usize,
    pub row_type: PivotRowType,
    /// Row leaf behind a data row.
    pub leaf_id: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PivotColumnType {
    RowHeader,
    Data,
    Total,
}

/// Describes a column in the pivot view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotColumnDescriptor {
    pub view_col: usize,
    pub col_type: PivotColumnType,
    /// Column leaf behind a data column.
    pub leaf_id: Option<NodeId>,
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered view of a pivot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotView {
    /// Indexed as cells[row][col].
    pub cells: Vec<Vec<PivotViewCell>>,

    pub rows: Vec<PivotRowDescriptor>,
    pub columns: Vec<PivotColumnDescriptor>,

    pub row_count: usize,
    pub col_count: usize,

    /// Number of row header columns (left frozen area).
    pub row_header_col_count: usize,

    /// Number of column header rows (top frozen area).
    pub column_header_row_count: usize,

    /// Version of the definition this view was computed from.
    pub version: u64,
}

impl PivotView {
    pub fn new(version: u64) -> Self {
        PivotView {
            cells: Vec::new(),
            rows: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
            col_count: 0,
            row_header_col_count: 0,
            column_header_row_count: 0,
            version,
        }
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&PivotViewCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn get_cell_mut(&mut self, row: usize, col: usize) -> Option<&mut PivotViewCell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn add_row(&mut self, cells: Vec<PivotViewCell>, descriptor: PivotRowDescriptor) {
        self.cells.push(cells);
        self.rows.push(descriptor);
        self.row_count = self.cells.len();
    }

    pub fn set_columns(&mut self, columns: Vec<PivotColumnDescriptor>) {
        self.col_count = columns.len();
        self.columns = columns;
    }

    /// View row holding the data for `row_leaf`.
    pub fn row_of_leaf(&self, row_leaf: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.leaf_id.as_deref() == Some(row_leaf))
            .map(|r| r.view_row)
    }

    /// View column holding the data for `column_leaf`.
    pub fn col_of_leaf(&self, column_leaf: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.leaf_id.as_deref() == Some(column_leaf))
            .map(|c| c.view_col)
    }

    /// The data cell for a (row leaf, column leaf) pair.
    pub fn data_cell(&self, row_leaf: &str, column_leaf: &str) -> Option<&PivotViewCell> {
        self.get_cell(self.row_of_leaf(row_leaf)?, self.col_of_leaf(column_leaf)?)
    }

    /// Master (non-spanned) header cell of `node_id`, with its position.
    pub fn header_cell(&self, node_id: &str) -> Option<(usize, usize, &PivotViewCell)> {
        self.cells.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .enumerate()
                .find(|(_, cell)| cell.node_id.as_deref() == Some(node_id))
                .map(|(c, cell)| (r, c, cell))
        })
    }

    /// Display strings of one row, with spanned cells skipped.
    pub fn row_text(&self, row: usize) -> Vec<&str> {
        self.cells
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .filter(|c| !c.is_spanned)
                    .map(|c| c.formatted_value.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
