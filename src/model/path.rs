//! Region paths: the structural address of a leaf, used for persistence
//!
//! A path names the root a leaf hangs from and the sequence of containers
//! passed on the way down. Records that share a step prefix share the node at
//! that prefix, so a set of paths is enough to rebuild the tree shape without
//! any node ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::edit::rebalance;
use super::region::{NodeId, NodeKind, Orientation, RegionTree};
use crate::geometry::{round_to, Rect};
use crate::panel::DockEntry;

/// Decimal places kept for persisted split ratios
pub const RATIO_PRECISION: i32 = 3;

/// Deepest path accepted from a layout file
pub const MAX_PATH_DEPTH: usize = 64;

/// Root a path starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRoot {
    #[default]
    Main,
    /// Index into the window's floating roots
    Floating(usize),
}

/// One container passed on the way from a root to a leaf
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PathStep {
    /// Descend into child `index` of a split, whose share is `ratio`
    Split {
        orientation: Orientation,
        index: usize,
        ratio: f32,
    },
    /// Leaf at `index` of a tab group; `active` marks the visible tab
    Tab { index: usize, active: bool },
}

/// Structural address of a leaf
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionPath {
    pub root: PathRoot,
    #[serde(default)]
    pub steps: Vec<PathStep>,
}

impl RegionPath {
    /// Ratio of the innermost enclosing split, or 1.0 outside any split
    pub fn size_ratio(&self) -> f32 {
        self.steps
            .iter()
            .rev()
            .find_map(|step| match step {
                PathStep::Split { ratio, .. } => Some(*ratio),
                PathStep::Tab { .. } => None,
            })
            .unwrap_or(1.0)
    }

    /// Index within the innermost enclosing tab group, or 0
    pub fn order(&self) -> usize {
        match self.steps.last() {
            Some(PathStep::Tab { index, .. }) => *index,
            _ => 0,
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.root, PathRoot::Floating(_))
    }
}

impl RegionTree {
    /// Path from the leaf's root down to `leaf`, with ratios rounded for storage
    pub fn path_of(&self, leaf: NodeId) -> Option<RegionPath> {
        let mut steps = Vec::new();
        let mut child = leaf;
        while let Some(parent) = self.parent(child) {
            let node = self.node(parent)?;
            match &node.kind {
                NodeKind::Split {
                    orientation,
                    children,
                    ratios,
                } => {
                    let index = children.iter().position(|&c| c == child)?;
                    steps.push(PathStep::Split {
                        orientation: *orientation,
                        index,
                        ratio: round_to(*ratios.get(index)?, RATIO_PRECISION),
                    });
                }
                NodeKind::Tabs { children, active } => {
                    let index = children.iter().position(|&c| c == child)?;
                    steps.push(PathStep::Tab {
                        index,
                        active: index == *active,
                    });
                }
                NodeKind::Floating { .. } => {}
                NodeKind::Leaf(_) => return None,
            }
            child = parent;
        }
        steps.reverse();

        let root = if self.root == Some(child) {
            PathRoot::Main
        } else {
            PathRoot::Floating(self.floating.iter().position(|&f| f == child)?)
        };
        Some(RegionPath { root, steps })
    }

    /// Bounds of the floating root holding `node`, if any
    pub fn floating_bounds_of(&self, node: NodeId) -> Option<Rect> {
        match &self.node(self.top_of(node))?.kind {
            NodeKind::Floating { bounds, .. } => Some(*bounds),
            _ => None,
        }
    }
}

// ============================================================================
// Rebuilding from paths
// ============================================================================

#[derive(Debug, Clone)]
enum Draft {
    Leaf(DockEntry),
    Tabs {
        children: BTreeMap<usize, DockEntry>,
        active: Option<usize>,
    },
    Split {
        orientation: Orientation,
        children: BTreeMap<usize, (f32, Option<Draft>)>,
    },
}

/// Tree shape accumulated from path-annotated records
///
/// Records are added one at a time; a record that disagrees with what earlier
/// records established is rejected without touching the draft.
#[derive(Debug, Clone, Default)]
pub struct TreeDraft {
    main: Option<Draft>,
    floating: BTreeMap<usize, (Rect, Option<Draft>)>,
}

impl TreeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `entry` at `path`. Floating paths need the window bounds.
    pub fn insert(
        &mut self,
        path: &RegionPath,
        entry: DockEntry,
        floating_bounds: Option<Rect>,
    ) -> Result<(), String> {
        let mut staged = self.clone();
        let slot = match path.root {
            PathRoot::Main => {
                if floating_bounds.is_some() {
                    return Err("docked record carries floating bounds".to_string());
                }
                &mut staged.main
            }
            PathRoot::Floating(n) => {
                let bounds =
                    floating_bounds.ok_or_else(|| "floating record without bounds".to_string())?;
                let (existing, slot) = staged.floating.entry(n).or_insert((bounds, None));
                if *existing != bounds {
                    return Err(format!("floating window {} has conflicting bounds", n));
                }
                slot
            }
        };
        insert_at(slot, &path.steps, entry)?;
        *self = staged;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.floating.is_empty()
    }

    /// Materialize into `tree`, which must be empty.
    ///
    /// Gaps left by rejected records are closed up: groups left with a
    /// single child collapse into it and split ratios are renormalized.
    pub fn build(self, tree: &mut RegionTree) {
        if let Some(draft) = self.main {
            tree.root = materialize(tree, draft);
        }
        for (_, (bounds, draft)) in self.floating {
            let Some(child) = draft.and_then(|d| materialize(tree, d)) else {
                continue;
            };
            let floating = tree.alloc(NodeKind::Floating { child, bounds });
            tree.set_parent(child, Some(floating));
            tree.floating.push(floating);
        }
        tree.relayout();
    }
}

fn insert_at(slot: &mut Option<Draft>, steps: &[PathStep], entry: DockEntry) -> Result<(), String> {
    let Some((step, rest)) = steps.split_first() else {
        if slot.is_some() {
            return Err("slot already taken by another record".to_string());
        }
        *slot = Some(Draft::Leaf(entry));
        return Ok(());
    };

    match *step {
        PathStep::Split {
            orientation,
            index,
            ratio,
        } => {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(format!("split ratio {} outside (0, 1)", ratio));
            }
            let draft = slot.get_or_insert_with(|| Draft::Split {
                orientation,
                children: BTreeMap::new(),
            });
            match draft {
                Draft::Split {
                    orientation: existing,
                    children,
                } if *existing == orientation => {
                    let (_, child) = children.entry(index).or_insert((ratio, None));
                    insert_at(child, rest, entry)
                }
                _ => Err(format!("step {:?} conflicts with an earlier record", step)),
            }
        }
        PathStep::Tab { index, active } => {
            if !rest.is_empty() {
                return Err("tab groups may only hold docks".to_string());
            }
            let draft = slot.get_or_insert_with(|| Draft::Tabs {
                children: BTreeMap::new(),
                active: None,
            });
            match draft {
                Draft::Tabs {
                    children,
                    active: current,
                } => {
                    if children.contains_key(&index) {
                        return Err(format!("tab {} claimed twice", index));
                    }
                    children.insert(index, entry);
                    if active {
                        *current = Some(index);
                    }
                    Ok(())
                }
                _ => Err(format!("step {:?} conflicts with an earlier record", step)),
            }
        }
    }
}

fn materialize(tree: &mut RegionTree, draft: Draft) -> Option<NodeId> {
    match draft {
        Draft::Leaf(entry) => Some(tree.alloc(NodeKind::Leaf(entry))),
        Draft::Tabs { children, active } => {
            let active = active
                .and_then(|a| children.keys().position(|&k| k == a))
                .unwrap_or(0);
            let mut leaves: Vec<NodeId> = children
                .into_values()
                .map(|entry| tree.alloc(NodeKind::Leaf(entry)))
                .collect();
            match leaves.len() {
                0 => None,
                1 => leaves.pop(),
                _ => {
                    let group = tree.alloc(NodeKind::Tabs {
                        children: leaves.clone(),
                        active,
                    });
                    for leaf in leaves {
                        tree.set_parent(leaf, Some(group));
                    }
                    Some(group)
                }
            }
        }
        Draft::Split {
            orientation,
            children,
        } => {
            let mut ids = Vec::new();
            let mut ratios = Vec::new();
            for (_, (ratio, child)) in children {
                if let Some(id) = child.and_then(|c| materialize(tree, c)) {
                    ids.push(id);
                    ratios.push(ratio);
                }
            }
            match ids.len() {
                0 => None,
                1 => ids.pop(),
                _ => {
                    rebalance(&mut ratios, tree.min_ratio, tree.max_ratio);
                    let split = tree.alloc(NodeKind::Split {
                        orientation,
                        children: ids.clone(),
                        ratios,
                    });
                    for id in ids {
                        tree.set_parent(id, Some(split));
                    }
                    Some(split)
                }
            }
        }
    }
}
