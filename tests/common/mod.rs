//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use dockyard::config::DockConfig;
use dockyard::geometry::Rect;
use dockyard::model::{RegionTree, Shape};
use dockyard::panel::{DockEntry, DockModel, DockProvider, DockRegistry, Permissions};
use dockyard::system::DockSystem;
use dockyard::window::{DockWindow, WindowId};

/// The 800x600 content area most tests lay out in
pub fn area() -> Rect {
    Rect::new(0.0, 0.0, 800.0, 600.0)
}

/// A resolved entry with default permissions
pub fn entry(id: &str) -> DockEntry {
    DockEntry::new(DockModel::new(id, id), Permissions::default())
}

/// Provider whose content is "<id> content"
pub fn provider(id: &str) -> DockProvider<String> {
    let content = format!("{} content", id);
    DockProvider::new(id, id, move |_| content.clone())
}

pub fn registry(ids: &[&str]) -> DockRegistry<String> {
    let mut registry = DockRegistry::default();
    for id in ids {
        registry.register(provider(id)).unwrap();
    }
    registry
}

/// System with `ids` registered and an empty main window laid out in `area()`
pub fn system(ids: &[&str]) -> DockSystem<String> {
    system_with(DockConfig::default(), ids)
}

pub fn system_with(config: DockConfig, ids: &[&str]) -> DockSystem<String> {
    let mut system = DockSystem::new(config);
    for id in ids {
        system.register(provider(id)).unwrap();
    }
    system
        .open_window(WindowId::default())
        .compute_layout(area());
    system
}

pub fn main_window(system: &DockSystem<String>) -> &DockWindow<String> {
    system.window(&WindowId::default()).unwrap()
}

pub fn main_window_mut(system: &mut DockSystem<String>) -> &mut DockWindow<String> {
    system.window_mut(&WindowId::default()).unwrap()
}

/// Visit every shape in pre-order
pub fn walk(shape: &Shape, f: &mut impl FnMut(&Shape)) {
    f(shape);
    match shape {
        Shape::Leaf { .. } => {}
        Shape::Tabs { children, .. } | Shape::Split { children, .. } => {
            for child in children {
                walk(child, f);
            }
        }
        Shape::Floating { child, .. } => walk(child, f),
    }
}

/// Arity and ratio rules every committed tree must satisfy
pub fn assert_well_formed(tree: &RegionTree) {
    assert_eq!(tree.check_invariants(), Ok(()));
    let (main, floating) = tree.shapes();
    let (min, max) = tree.ratio_bounds();
    for shape in main.iter().chain(floating.iter()) {
        walk(shape, &mut |s| match s {
            Shape::Split {
                ratios, children, ..
            } => {
                assert!(children.len() >= 2, "split with {} children", children.len());
                assert_eq!(ratios.len(), children.len());
                let sum: f32 = ratios.iter().sum();
                assert!((sum - 1.0).abs() < 1e-3, "ratios sum to {}", sum);
                for r in ratios {
                    assert!(*r >= min - 1e-3 && *r <= max + 1e-3, "ratio {} out of bounds", r);
                }
            }
            Shape::Tabs { children, active } => {
                assert!(children.len() >= 2, "tab group with {} children", children.len());
                assert!(*active < children.len());
            }
            _ => {}
        });
    }
}
