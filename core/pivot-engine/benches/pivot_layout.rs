//! FILENAME: core/pivot-engine/benches/pivot_layout.rs
//! Layout throughput for wide and deep header trees.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use axis_tree::AxisTree;
use pivot_engine::{calculate_pivot, layout_axis, LayoutOptions, PivotData, PivotDefinition};

/// A two-level tree with `groups` groups of `leaves` leaves each.
fn build_tree(prefix: &str, groups: usize, leaves: usize) -> AxisTree {
    let root = format!("{}-root", prefix);
    let mut tree = AxisTree::new(root.clone(), prefix);
    for g in 0..groups {
        let group = format!("{}-g{}", prefix, g);
        tree.insert(&root, group.clone(), format!("Group {}", g))
            .expect("root exists");
        for l in 0..leaves {
            tree.insert(&group, format!("{}-l{}", group, l), format!("Item {}", l))
                .expect("group exists");
        }
    }
    tree
}

fn build_data(rows: &AxisTree, columns: &AxisTree) -> PivotData {
    let mut data = PivotData::new();
    let col_leaves = columns.leaf_ids(columns.root_id());
    for (ri, row) in rows.leaf_ids(rows.root_id()).into_iter().enumerate() {
        for (ci, col) in col_leaves.iter().enumerate() {
            data.set(row, *col, (((ri * 31 + ci * 7) % 1000) as f64).into());
        }
    }
    data
}

fn bench_layout_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_axis");
    for &(groups, leaves) in &[(10, 10), (50, 20), (100, 100)] {
        let tree = build_tree("r", groups, leaves);
        group.bench_with_input(
            BenchmarkId::from_parameter(groups * leaves),
            &tree,
            |b, tree| b.iter(|| layout_axis(black_box(tree))),
        );
    }
    group.finish();
}

fn bench_calculate_pivot(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_pivot");
    for &(row_groups, row_leaves) in &[(5, 10), (20, 25)] {
        let rows = build_tree("r", row_groups, row_leaves);
        let columns = build_tree("c", 4, 12);
        let data = build_data(&rows, &columns);
        let mut definition = PivotDefinition::new(rows, columns);
        definition.layout = LayoutOptions {
            total_column: true,
            total_row: true,
            ..LayoutOptions::default()
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(row_groups * row_leaves),
            &(definition, data),
            |b, (definition, data)| b.iter(|| calculate_pivot(black_box(definition), data)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_layout_axis, bench_calculate_pivot);
criterion_main!(benches);
