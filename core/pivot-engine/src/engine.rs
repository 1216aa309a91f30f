//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Turns a definition plus data into a renderable view.
//!
//! Each axis tree is flattened into its display leaves and one header span
//! per non-root node. The column spans become the header rows, the row
//! spans become the merged cells left of each data row, and every data
//! cell is looked up by its (row leaf, column leaf) pair.

use serde::{Deserialize, Serialize};
use axis_tree::{AxisTree, NodeId};

use crate::data::{DataValue, PivotData};
use crate::definition::PivotDefinition;
use crate::view::{
    PivotCellType, PivotColumnDescriptor, PivotColumnType, PivotRowDescriptor, PivotRowType,
    PivotView, PivotViewCell,
};

// ============================================================================
// AXIS LAYOUT
// ============================================================================

/// The merged header cell of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSpan {
    pub node_id: NodeId,
    pub label: String,
    /// Header level, 0 = children of the root.
    pub level: usize,
    /// Index of the node's first leaf among the axis leaves.
    pub offset: usize,
    /// Number of leaves covered (the node's leaf count).
    pub span: usize,
    /// Number of header levels covered. Leaves above the deepest level
    /// stretch down to it.
    pub level_span: usize,
    pub is_leaf: bool,
}

/// One axis flattened for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLayout {
    /// Display leaves in order. The root itself is never a display leaf.
    pub leaves: Vec<NodeId>,
    /// Number of header levels (the tree's maximum depth).
    pub levels: usize,
    /// Header spans in depth-first pre-order.
    pub headers: Vec<HeaderSpan>,
}

/// Flattens an axis tree into display leaves and merged header spans.
pub fn layout_axis(tree: &AxisTree) -> AxisLayout {
    let mut layout = AxisLayout {
        leaves: Vec::new(),
        levels: tree.max_depth(),
        headers: Vec::new(),
    };
    walk_axis(tree, &mut layout);
    layout
}

enum Visit<'t> {
    Enter(&'t str, usize),
    /// Closes the header at `slot` once its subtree has been laid out.
    Exit { slot: usize, start: usize },
}

fn walk_axis(tree: &AxisTree, layout: &mut AxisLayout) {
    let mut offset = 0;
    let mut stack: Vec<Visit<'_>> = tree
        .children(tree.root_id())
        .iter()
        .rev()
        .map(|child| Visit::Enter(child.as_str(), 0))
        .collect();

    while let Some(visit) = stack.pop() {
        let (id, level) = match visit {
            Visit::Enter(id, level) => (id, level),
            Visit::Exit { slot, start } => {
                layout.headers[slot].span = offset - start;
                continue;
            }
        };
        let Some(node) = tree.get(id) else {
            continue;
        };

        let slot = layout.headers.len();
        layout.headers.push(HeaderSpan {
            node_id: node.id.clone(),
            label: node.label.clone(),
            level,
            offset,
            span: usize::from(node.is_leaf()),
            level_span: if node.is_leaf() { layout.levels - level } else { 1 },
            is_leaf: node.is_leaf(),
        });

        if node.is_leaf() {
            layout.leaves.push(node.id.clone());
            offset += 1;
        } else {
            stack.push(Visit::Exit { slot, start: offset });
            for child in node.children.iter().rev() {
                stack.push(Visit::Enter(child.as_str(), level + 1));
            }
        }
    }
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Builds the view for one definition/data pair.
pub struct PivotCalculator<'a> {
    definition: &'a PivotDefinition,
    data: &'a PivotData,
    row_layout: AxisLayout,
    col_layout: AxisLayout,
}

impl<'a> PivotCalculator<'a> {
    pub fn new(definition: &'a PivotDefinition, data: &'a PivotData) -> Self {
        PivotCalculator {
            definition,
            data,
            row_layout: layout_axis(&definition.rows),
            col_layout: layout_axis(&definition.columns),
        }
    }

    pub fn row_layout(&self) -> &AxisLayout {
        &self.row_layout
    }

    pub fn col_layout(&self) -> &AxisLayout {
        &self.col_layout
    }

    /// Executes the layout and returns the rendered view.
    pub fn calculate(&self) -> PivotView {
        let mut view = PivotView::new(self.definition.version);
        view.row_header_col_count = self.row_header_cols();
        view.column_header_row_count = self.column_header_rows();
        view.set_columns(self.generate_column_descriptors());

        self.generate_column_headers(&mut view);
        self.generate_data_rows(&mut view);

        view
    }

    fn has_total_column(&self) -> bool {
        self.definition.layout.total_column
    }

    /// Header rows above the data. A lone column root still gets one row
    /// when the total column needs a header.
    fn column_header_rows(&self) -> usize {
        match self.col_layout.levels {
            0 if self.has_total_column() => 1,
            levels => levels,
        }
    }

    /// Label columns left of the data. A lone row root still gets one
    /// column when the total row needs a label.
    fn row_header_cols(&self) -> usize {
        match self.row_layout.levels {
            0 if self.definition.layout.total_row => 1,
            levels => levels,
        }
    }

    fn generate_column_descriptors(&self) -> Vec<PivotColumnDescriptor> {
        let row_cols = self.row_header_cols();
        let mut descriptors = Vec::with_capacity(row_cols + self.col_layout.leaves.len() + 1);

        for i in 0..row_cols {
            descriptors.push(PivotColumnDescriptor {
                view_col: i,
                col_type: PivotColumnType::RowHeader,
                leaf_id: None,
            });
        }
        for (i, leaf) in self.col_layout.leaves.iter().enumerate() {
            descriptors.push(PivotColumnDescriptor {
                view_col: row_cols + i,
                col_type: PivotColumnType::Data,
                leaf_id: Some(leaf.clone()),
            });
        }
        if self.has_total_column() {
            descriptors.push(PivotColumnDescriptor {
                view_col: descriptors.len(),
                col_type: PivotColumnType::Total,
                leaf_id: None,
            });
        }

        descriptors
    }

    fn generate_column_headers(&self, view: &mut PivotView) {
        let header_rows = self.column_header_rows();
        if header_rows == 0 {
            return;
        }
        let row_cols = self.row_header_cols();
        let data_cols = self.col_layout.leaves.len();

        let mut grid = vec![vec![PivotViewCell::spanned(); view.col_count]; header_rows];

        if row_cols > 0 {
            grid[0][0] = PivotViewCell::corner()
                .with_row_span(header_rows as u32)
                .with_col_span(row_cols as u32);
        }

        for header in &self.col_layout.headers {
            grid[header.level][row_cols + header.offset] = PivotViewCell::column_header(
                header.node_id.clone(),
                header.label.clone(),
                header.level as u16,
            )
            .with_col_span(header.span as u32)
            .with_row_span(header.level_span as u32);
        }

        if self.has_total_column() {
            grid[0][row_cols + data_cols] =
                PivotViewCell::total_header(self.definition.layout.total_label.clone())
                    .with_row_span(header_rows as u32);
        }

        for cells in grid {
            let descriptor = PivotRowDescriptor {
                view_row: view.row_count,
                row_type: PivotRowType::ColumnHeader,
                leaf_id: None,
            };
            view.add_row(cells, descriptor);
        }
    }

    /// Row header cells for every row leaf, with merged spans applied.
    fn row_header_grid(&self) -> Vec<Vec<PivotViewCell>> {
        let row_cols = self.row_header_cols();
        let mut grid = vec![vec![PivotViewCell::spanned(); row_cols]; self.row_layout.leaves.len()];

        for header in &self.row_layout.headers {
            grid[header.offset][header.level] = PivotViewCell::row_header(
                header.node_id.clone(),
                header.label.clone(),
                header.level as u16,
            )
            .with_row_span(header.span as u32)
            .with_col_span(header.level_span as u32);
        }

        grid
    }

    fn data_cell(&self, row_leaf: &str, col_leaf: &str) -> PivotViewCell {
        let value: DataValue = self.data.get(row_leaf, col_leaf).cloned().unwrap_or_default();
        let mut cell = PivotViewCell::data(value);
        if cell.value.is_empty() {
            if let Some(text) = &self.definition.layout.empty_cell_text {
                cell.formatted_value = text.clone();
            }
        }
        cell
    }

    fn generate_data_rows(&self, view: &mut PivotView) {
        let layout = &self.definition.layout;
        let row_cols = self.row_header_cols();
        let mut col_sums: Vec<Option<f64>> = vec![None; self.col_layout.leaves.len()];
        let mut grand_total: Option<f64> = None;

        for (row_leaf, mut cells) in self.row_layout.leaves.iter().zip(self.row_header_grid()) {
            let mut row_sum: Option<f64> = None;

            for (ci, col_leaf) in self.col_layout.leaves.iter().enumerate() {
                let cell = self.data_cell(row_leaf, col_leaf);
                if let Some(n) = cell.value.as_number() {
                    accumulate(&mut row_sum, n);
                    accumulate(&mut col_sums[ci], n);
                    accumulate(&mut grand_total, n);
                }
                cells.push(cell);
            }

            if layout.total_column {
                cells.push(PivotViewCell::total(PivotCellType::RowTotal, row_sum));
            }

            let descriptor = PivotRowDescriptor {
                view_row: view.row_count,
                row_type: PivotRowType::Data,
                leaf_id: Some(row_leaf.clone()),
            };
            view.add_row(cells, descriptor);
        }

        if layout.total_row {
            let mut cells = Vec::with_capacity(view.col_count);
            if row_cols > 0 {
                cells.push(
                    PivotViewCell::total_header(layout.total_label.clone())
                        .with_col_span(row_cols as u32),
                );
                cells.extend((1..row_cols).map(|_| PivotViewCell::spanned()));
            }
            cells.extend(
                col_sums
                    .into_iter()
                    .map(|sum| PivotViewCell::total(PivotCellType::ColumnTotal, sum)),
            );
            if layout.total_column {
                cells.push(PivotViewCell::total(PivotCellType::GrandTotal, grand_total));
            }

            let descriptor = PivotRowDescriptor {
                view_row: view.row_count,
                row_type: PivotRowType::Total,
                leaf_id: None,
            };
            view.add_row(cells, descriptor);
        }
    }
}

fn accumulate(acc: &mut Option<f64>, value: f64) {
    *acc = Some(acc.unwrap_or(0.0) + value);
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates a pivot view from a definition and its data values.
pub fn calculate_pivot(definition: &PivotDefinition, data: &PivotData) -> PivotView {
    PivotCalculator::new(definition, data).calculate()
}
