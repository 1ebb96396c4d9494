//! Benchmarks for drop resolution, tree edits and layout snapshots
//!
//! Run with: cargo bench layout

use dockyard::config::DockConfig;
use dockyard::geometry::{Point, Rect};
use dockyard::location::{recommended_location, Direction, LocationHint};
use dockyard::model::{NodeId, RegionTree};
use dockyard::panel::{DockEntry, DockId, DockModel, DockProvider, DockRegistry, Permissions};
use dockyard::window::{DockWindow, WindowId};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn entry(id: &str) -> DockEntry {
    DockEntry::new(DockModel::new(id, id), Permissions::default())
}

/// Alternating left/bottom splits, each new dock splitting the last one
fn split_chain(count: usize) -> (RegionTree, Vec<NodeId>) {
    let mut tree = RegionTree::default();
    let mut leaves = Vec::with_capacity(count);
    let mut last = tree.set_root(entry("D0")).unwrap();
    leaves.push(last);
    for i in 1..count {
        let direction = if i % 2 == 0 { Direction::Left } else { Direction::Bottom };
        last = tree
            .split(last, entry(&format!("D{}", i)), direction, 0.5)
            .unwrap();
        leaves.push(last);
    }
    tree.compute_layout(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    (tree, leaves)
}

fn window(count: usize) -> (DockWindow<usize>, DockRegistry<usize>) {
    let hints = [
        LocationHint::center(),
        LocationHint::right(),
        LocationHint::bottom(),
        LocationHint::left(),
    ];
    let mut registry = DockRegistry::default();
    for i in 0..count {
        registry
            .register(DockProvider::new(format!("D{}", i), "dock", move |_| i).location(hints[i % 4]))
            .unwrap();
    }
    let mut window = DockWindow::new(WindowId::default(), &DockConfig::default());
    window.compute_layout(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    for i in 0..count {
        window
            .open(&registry, &DockId::new(format!("D{}", i)))
            .unwrap();
    }
    (window, registry)
}

// ============================================================================
// Drop resolution
// ============================================================================

#[divan::bench]
fn resolve_grid(bencher: divan::Bencher) {
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    let points: Vec<Point> = (0..40)
        .flat_map(|x| (0..30).map(move |y| Point::new(x as f32 * 20.0, y as f32 * 20.0)))
        .collect();
    bencher.bench(|| {
        for point in &points {
            divan::black_box(recommended_location(bounds, *point));
        }
    });
}

#[divan::bench(args = [8, 32, 128])]
fn drop_target_lookup(bencher: divan::Bencher, count: usize) {
    let (tree, _) = split_chain(count);
    bencher.bench(|| divan::black_box(tree.drop_target_at(Point::new(1900.0, 1070.0))));
}

// ============================================================================
// Edits
// ============================================================================

#[divan::bench(args = [8, 32, 128])]
fn build_split_chain(count: usize) {
    divan::black_box(split_chain(count));
}

#[divan::bench(args = [8, 32, 128])]
fn move_leaf_to_tabs(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| split_chain(count))
        .bench_local_values(|(mut tree, leaves)| {
            let last = leaves[leaves.len() - 1];
            tree.move_node(
                last,
                leaves[0],
                dockyard::model::Placement::Tab { index: None },
            )
            .unwrap();
            tree
        });
}

#[divan::bench(args = [8, 32, 128])]
fn remove_all(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| split_chain(count))
        .bench_local_values(|(mut tree, leaves)| {
            for leaf in leaves {
                tree.remove(leaf).unwrap();
            }
            tree
        });
}

// ============================================================================
// Persistence
// ============================================================================

#[divan::bench(args = [8, 32, 128])]
fn layout_snapshot(bencher: divan::Bencher, count: usize) {
    let (window, _) = window(count);
    bencher.bench(|| divan::black_box(window.layout_snapshot()));
}

#[divan::bench(args = [8, 32, 128])]
fn restore_snapshot(bencher: divan::Bencher, count: usize) {
    let (window, registry) = window(count);
    let records = window.layout_snapshot();
    bencher
        .with_inputs(|| {
            (
                DockWindow::<usize>::new(WindowId::default(), &DockConfig::default()),
                records.clone(),
            )
        })
        .bench_local_values(|(mut target, records)| {
            divan::black_box(target.restore(&registry, records));
            target
        });
}
