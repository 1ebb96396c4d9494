//! Tests for structural edits on the region tree

mod common;

use common::{area, assert_well_formed, entry};
use dockyard::error::DockError;
use dockyard::geometry::{Point, Rect};
use dockyard::location::{recommended_location, Direction, DropDecision};
use dockyard::model::{NodeId, Orientation, Placement, RegionTree, Shape};

fn leaf(id: &str) -> Shape {
    Shape::Leaf {
        id: id.into(),
        placeholder: false,
    }
}

/// A | (B / C)
fn nested() -> (RegionTree, NodeId, NodeId, NodeId) {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    let b = tree.split(a, entry("B"), Direction::Right, 0.5).unwrap();
    let c = tree.split(b, entry("C"), Direction::Bottom, 0.5).unwrap();
    tree.compute_layout(area());
    (tree, a, b, c)
}

// ============================================================================
// Split and remove
// ============================================================================

#[test]
fn test_drop_on_top_band_splits_then_remove_restores() {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    tree.compute_layout(area());

    let bounds = tree.node(a).unwrap().rect;
    let recommendation = recommended_location(bounds, Point::new(400.0, 100.0)).unwrap();
    assert_eq!(recommendation.decision, DropDecision::SplitTop);

    let direction = recommendation.decision.direction().unwrap();
    let b = tree.split(a, entry("B"), direction, 0.3).unwrap();
    assert_eq!(
        tree.shape(tree.root().unwrap()),
        Some(Shape::Split {
            orientation: Orientation::Vertical,
            ratios: vec![0.3, 1.0 - 0.3],
            children: vec![leaf("B"), leaf("A")],
        })
    );
    assert_well_formed(&tree);

    let removed = tree.remove(b).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].entry.id().as_str(), "B");
    assert_eq!(tree.root(), Some(a));
    assert_eq!(tree.node(a).unwrap().rect, area());
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_split_rejects_ratio_outside_bounds() {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();

    for ratio in [0.0, 0.05, 0.95, 1.0, -0.5] {
        let err = tree.split(a, entry("B"), Direction::Left, ratio).unwrap_err();
        assert!(matches!(err, DockError::RatioOutOfRange { .. }), "{}", ratio);
    }
    assert_eq!(tree.root(), Some(a));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_remove_prunes_nested_split() {
    let (mut tree, a, b, c) = nested();
    tree.remove(c).unwrap();

    assert_eq!(
        tree.shape(tree.root().unwrap()),
        Some(Shape::Split {
            orientation: Orientation::Horizontal,
            ratios: vec![0.5, 0.5],
            children: vec![leaf("A"), leaf("B")],
        })
    );
    assert_eq!(tree.node(b).unwrap().rect, Rect::new(400.0, 0.0, 400.0, 600.0));

    tree.remove(a).unwrap();
    assert_eq!(tree.root(), Some(b));
    assert_well_formed(&tree);
}

#[test]
fn test_remove_last_dock_empties_window() {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    tree.remove(a).unwrap();
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
}

#[test]
fn test_stale_handle_is_invalid_target() {
    let (mut tree, _, b, c) = nested();
    tree.remove(c).unwrap();

    assert!(matches!(
        tree.split(c, entry("D"), Direction::Top, 0.5),
        Err(DockError::InvalidTarget(id)) if id == c
    ));
    assert!(matches!(
        tree.insert_as_tab(c, entry("D"), 0),
        Err(DockError::InvalidTarget(_))
    ));
    assert!(tree.remove(c).is_err());
    assert!(tree.contains(b));
}

// ============================================================================
// Tab groups
// ============================================================================

/// Tab group [A, B, C] with the given active index
fn tabs(active: usize) -> (RegionTree, NodeId, [NodeId; 3]) {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    let b = tree.insert_as_tab(a, entry("B"), 1).unwrap();
    let c = tree.insert_as_tab(b, entry("C"), 2).unwrap();
    let leaves = [a, b, c];
    tree.activate(leaves[active]);
    let group = tree.parent(a).unwrap();
    (tree, group, leaves)
}

fn active_of(tree: &RegionTree, group: NodeId) -> usize {
    match tree.shape(group) {
        Some(Shape::Tabs { active, .. }) => active,
        other => panic!("expected tab group, got {:?}", other),
    }
}

#[test]
fn test_insert_as_tab_converts_leaf_in_place() {
    let (tree, group, [a, b, c]) = tabs(2);
    assert_eq!(tree.root(), Some(group));
    assert_eq!(
        tree.shape(group),
        Some(Shape::Tabs {
            active: 2,
            children: vec![leaf("A"), leaf("B"), leaf("C")],
        })
    );
    for id in [a, b, c] {
        assert_eq!(tree.parent(id), Some(group));
    }
}

#[test]
fn test_insert_index_is_clamped() {
    let (mut tree, group, _) = tabs(0);
    let d = tree.insert_as_tab(group, entry("D"), 99).unwrap();
    assert_eq!(tree.index_in_parent(d), Some(3));
    assert_eq!(active_of(&tree, group), 3);
}

#[test]
fn test_removing_active_tab_keeps_index() {
    let (mut tree, group, [_, b, _]) = tabs(1);
    tree.remove(b).unwrap();
    // C slid into index 1 and is now active
    assert_eq!(active_of(&tree, group), 1);
}

#[test]
fn test_removing_last_active_tab_clamps() {
    let (mut tree, group, [_, _, c]) = tabs(2);
    tree.remove(c).unwrap();
    assert_eq!(active_of(&tree, group), 1);
}

#[test]
fn test_removing_tab_before_active_follows_it() {
    let (mut tree, group, [a, _, c]) = tabs(2);
    tree.remove(a).unwrap();
    assert_eq!(active_of(&tree, group), 1);
    assert_eq!(tree.active_leaf(group), Some(c));
}

#[test]
fn test_tab_group_collapses_to_last_leaf() {
    let (mut tree, group, [a, b, _]) = tabs(0);
    tree.remove(b).unwrap();
    let c = tree.find_leaf(&"C".into()).unwrap();
    tree.remove(c).unwrap();
    assert!(!tree.contains(group));
    assert_eq!(tree.root(), Some(a));
    assert_well_formed(&tree);
}

#[test]
fn test_remove_then_reinsert_is_equivalent() {
    for active in 0..3 {
        let (mut tree, group, [_, b, _]) = tabs(active);
        tree.activate(b);
        let before = tree.shapes();

        let removed = tree.remove(b).unwrap().pop().unwrap();
        tree.insert_as_tab(group, removed.entry, 1).unwrap();

        assert_eq!(tree.shapes(), before);
    }
}

#[test]
fn test_remove_then_reinsert_into_collapsed_pair() {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    let b = tree.insert_as_tab(a, entry("B"), 1).unwrap();
    let before = tree.shapes();

    let removed = tree.remove(b).unwrap().pop().unwrap();
    assert_eq!(tree.root(), Some(a));
    tree.insert_as_tab(a, removed.entry, 1).unwrap();

    assert_eq!(tree.shapes(), before);
}

#[test]
fn test_splitting_a_tab_splits_its_group() {
    let (mut tree, group, [_, b, _]) = tabs(1);
    let d = tree.split(b, entry("D"), Direction::Left, 0.25).unwrap();
    let root = tree.root().unwrap();
    assert_eq!(
        tree.node(root).unwrap().children(),
        vec![d, group]
    );
    assert_well_formed(&tree);
}

#[test]
fn test_tab_cycling_wraps() {
    let (mut tree, group, [a, b, c]) = tabs(2);
    assert_eq!(tree.next_tab(group).unwrap(), a);
    assert_eq!(tree.prev_tab(a).unwrap(), c);
    assert_eq!(tree.prev_tab(c).unwrap(), b);
    assert!(tree.next_tab(NodeId(999)).is_err());
}

// ============================================================================
// Move
// ============================================================================

#[test]
fn test_move_into_tabs() {
    let (mut tree, a, b, c) = nested();
    tree.move_node(c, a, Placement::Tab { index: None }).unwrap();

    assert_eq!(
        tree.shape(tree.root().unwrap()),
        Some(Shape::Split {
            orientation: Orientation::Horizontal,
            ratios: vec![0.5, 0.5],
            children: vec![
                Shape::Tabs {
                    active: 1,
                    children: vec![leaf("A"), leaf("C")],
                },
                leaf("B"),
            ],
        })
    );
    assert!(tree.contains(b));
    assert_well_formed(&tree);
}

#[test]
fn test_move_follows_collapsed_target() {
    let (mut tree, a, b, c) = nested();
    let inner = tree.parent(b).unwrap();

    // Detaching C collapses `inner` into B; the drop lands on B instead
    tree.move_node(
        c,
        inner,
        Placement::Split {
            direction: Direction::Top,
            ratio: 0.25,
        },
    )
    .unwrap();

    assert!(!tree.contains(inner));
    assert_eq!(
        tree.shape(tree.root().unwrap()),
        Some(Shape::Split {
            orientation: Orientation::Horizontal,
            ratios: vec![0.5, 0.5],
            children: vec![
                leaf("A"),
                Shape::Split {
                    orientation: Orientation::Vertical,
                    ratios: vec![0.25, 0.75],
                    children: vec![leaf("C"), leaf("B")],
                },
            ],
        })
    );
    assert_eq!(tree.parent(a), tree.root());
}

#[test]
fn test_move_into_own_subtree_is_rejected() {
    let (mut tree, _, b, _) = nested();
    let inner = tree.parent(b).unwrap();
    let before = tree.shapes();

    let err = tree
        .move_node(inner, b, Placement::Tab { index: None })
        .unwrap_err();
    assert!(matches!(err, DockError::InvalidTarget(_)));
    assert_eq!(tree.shapes(), before);
}

#[test]
fn test_move_with_bad_ratio_leaves_tree_untouched() {
    let (mut tree, a, _, c) = nested();
    let before = tree.shapes();
    let err = tree
        .move_node(
            c,
            a,
            Placement::Split {
                direction: Direction::Left,
                ratio: 0.99,
            },
        )
        .unwrap_err();
    assert!(matches!(err, DockError::RatioOutOfRange { .. }));
    assert_eq!(tree.shapes(), before);
}

// ============================================================================
// Floating
// ============================================================================

#[test]
fn test_float_and_dock_back() {
    let (mut tree, a, b, _) = nested();
    let bounds = Rect::new(100.0, 100.0, 300.0, 200.0);
    let inner = tree.parent(b).unwrap();

    let floating = tree.float(inner, bounds).unwrap();
    assert_eq!(tree.floating_roots(), &[floating]);
    assert_eq!(tree.root(), Some(a));
    assert_eq!(tree.node(b).unwrap().rect.x, 100.0);
    assert_well_formed(&tree);

    tree.dock(
        floating,
        a,
        Placement::Split {
            direction: Direction::Right,
            ratio: 0.5,
        },
    )
    .unwrap();
    assert!(tree.floating_roots().is_empty());
    assert!(!tree.contains(floating));
    assert_eq!(tree.leaves().len(), 3);
    assert_well_formed(&tree);
}

#[test]
fn test_floating_window_closes_with_last_dock() {
    let (mut tree, _, _, c) = nested();
    let floating = tree.float(c, Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
    tree.remove(c).unwrap();
    assert!(!tree.contains(floating));
    assert!(tree.floating_roots().is_empty());
}

#[test]
fn test_refloat_moves_existing_window() {
    let (mut tree, _, _, c) = nested();
    let floating = tree.float(c, Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
    let moved = tree.float(c, Rect::new(50.0, 50.0, 200.0, 200.0)).unwrap();
    assert_eq!(moved, floating);
    assert_eq!(tree.floating_roots().len(), 1);
    assert_eq!(
        tree.floating_bounds_of(c),
        Some(Rect::new(50.0, 50.0, 200.0, 200.0))
    );
}

#[test]
fn test_dock_as_root_into_empty_window() {
    let mut tree = RegionTree::default();
    let a = tree.set_root(entry("A")).unwrap();
    let floating = tree.float(a, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert!(tree.root().is_none());

    tree.dock_as_root(floating).unwrap();
    assert_eq!(tree.root(), Some(a));
    assert!(tree.floating_roots().is_empty());
}

#[test]
fn test_floating_windows_are_hit_first() {
    let (mut tree, a, _, c) = nested();
    tree.float(c, Rect::new(10.0, 10.0, 100.0, 100.0)).unwrap();
    assert_eq!(tree.drop_target_at(Point::new(50.0, 50.0)), Some(c));
    assert_eq!(tree.drop_target_at(Point::new(300.0, 300.0)), Some(a));
}
