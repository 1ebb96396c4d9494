//! Region tree - arena of splits, tab groups, floating roots and dock leaves
//!
//! Nodes live in a `HashMap` keyed by [`NodeId`]. Children are referenced by id
//! and every node keeps a non-owning `parent` handle, so edits never fight the
//! borrow checker over back-references. A window has one main root plus any
//! number of floating roots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::panel::{DockEntry, DockId};

// ============================================================================
// Identifiers
// ============================================================================

/// Stable handle to a node in a region tree
///
/// Ids are never reused within a tree, so a handle to a removed node stays
/// invalid forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis along which a split group lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged left-to-right
    Horizontal,
    /// Children arranged top-to-bottom
    Vertical,
}

// ============================================================================
// Nodes
// ============================================================================

/// Variant payload of a region node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(DockEntry),
    /// Tab group; children are always leaves
    Tabs { children: Vec<NodeId>, active: usize },
    /// Split group; `ratios[i]` is the share of `children[i]`
    Split {
        orientation: Orientation,
        children: Vec<NodeId>,
        ratios: Vec<f32>,
    },
    /// Detached window holding one subtree
    Floating { child: NodeId, bounds: Rect },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Bounds from the last layout pass
    pub rect: Rect,
}

impl RegionNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            rect: Rect::default(),
        }
    }

    pub fn entry(&self) -> Option<&DockEntry> {
        match &self.kind {
            NodeKind::Leaf(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn is_tabs(&self) -> bool {
        matches!(self.kind, NodeKind::Tabs { .. })
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.kind, NodeKind::Floating { .. })
    }

    /// Direct children in display order
    pub fn children(&self) -> Vec<NodeId> {
        self.kind.children()
    }
}

impl NodeKind {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Leaf(_) => Vec::new(),
            NodeKind::Tabs { children, .. } | NodeKind::Split { children, .. } => children.clone(),
            NodeKind::Floating { child, .. } => vec![*child],
        }
    }
}

/// Which root a node hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRef {
    Main,
    /// Index into the floating root list
    Floating(usize),
}

/// Id-free description of a subtree, for comparing layouts
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Leaf {
        id: DockId,
        placeholder: bool,
    },
    Tabs {
        active: usize,
        children: Vec<Shape>,
    },
    Split {
        orientation: Orientation,
        ratios: Vec<f32>,
        children: Vec<Shape>,
    },
    Floating {
        bounds: Rect,
        child: Box<Shape>,
    },
}

// ============================================================================
// Region Tree
// ============================================================================

/// The arrangement of one window
#[derive(Debug, Clone)]
pub struct RegionTree {
    pub(crate) nodes: HashMap<NodeId, RegionNode>,
    pub(crate) root: Option<NodeId>,
    /// Floating roots, oldest first (the last one is on top)
    pub(crate) floating: Vec<NodeId>,
    next_node_id: u64,
    pub(crate) min_ratio: f32,
    pub(crate) max_ratio: f32,
    pub(crate) splitter_width: f32,
    /// Last layout rect used for compute_layout (for relayout after edits)
    pub last_layout_rect: Option<Rect>,
}

impl Default for RegionTree {
    fn default() -> Self {
        Self::new(0.05, 0.95)
    }
}

impl RegionTree {
    pub fn new(min_ratio: f32, max_ratio: f32) -> Self {
        Self {
            nodes: HashMap::new(),
            root: None,
            floating: Vec::new(),
            next_node_id: 1,
            min_ratio,
            max_ratio,
            splitter_width: super::SPLITTER_WIDTH,
            last_layout_rect: None,
        }
    }

    pub fn from_config(config: &crate::config::DockConfig) -> Self {
        let mut tree = Self::new(config.min_ratio, config.max_ratio);
        tree.splitter_width = config.splitter_width;
        tree
    }

    pub fn ratio_bounds(&self) -> (f32, f32) {
        (self.min_ratio, self.max_ratio)
    }

    pub(crate) fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Allocate a detached node
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_node_id();
        self.nodes.insert(id, RegionNode::new(kind));
        id
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn floating_roots(&self) -> &[NodeId] {
        &self.floating
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.floating.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RegionNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut RegionNode> {
        self.nodes.get_mut(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn entry(&self, id: NodeId) -> Option<&DockEntry> {
        self.nodes.get(&id).and_then(|n| n.entry())
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Option<&mut DockEntry> {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Outermost ancestor of `id` (a main or floating root)
    pub fn top_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Which root `id` belongs to, if it is attached at all
    pub fn root_of(&self, id: NodeId) -> Option<RootRef> {
        let top = self.top_of(id);
        if self.root == Some(top) {
            return Some(RootRef::Main);
        }
        self.floating
            .iter()
            .position(|&f| f == top)
            .map(RootRef::Floating)
    }

    /// Whether `node` is `ancestor` or lies beneath it
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Leaf ids under `id` in pre-order
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.is_leaf() {
            out.push(id);
        }
        for child in node.children() {
            self.collect_leaves(child, out);
        }
    }

    /// All leaves: main tree first, then floating roots in order
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        for top in self.tops() {
            self.collect_leaves(top, &mut leaves);
        }
        leaves
    }

    /// Main root (if any) followed by floating roots
    pub fn tops(&self) -> Vec<NodeId> {
        self.root.iter().chain(self.floating.iter()).copied().collect()
    }

    /// Leaf holding the dock `id`
    pub fn find_leaf(&self, id: &DockId) -> Option<NodeId> {
        self.leaves()
            .into_iter()
            .find(|leaf| self.entry(*leaf).is_some_and(|e| e.id() == id))
    }

    /// Index of `child` within its parent's children
    pub fn index_in_parent(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.nodes
            .get(&parent)?
            .children()
            .iter()
            .position(|&c| c == child)
    }

    /// Make `leaf` the visible tab of its group (and each enclosing group)
    pub fn activate(&mut self, leaf: NodeId) -> bool {
        if !self.contains(leaf) {
            return false;
        }
        let mut child = leaf;
        while let Some(parent) = self.parent(child) {
            let index = self.index_in_parent(child);
            if let (Some(node), Some(index)) = (self.nodes.get_mut(&parent), index) {
                if let NodeKind::Tabs { active, .. } = &mut node.kind {
                    *active = index;
                }
            }
            child = parent;
        }
        // Raise a floating window to the top
        let top = self.top_of(leaf);
        if let Some(pos) = self.floating.iter().position(|&f| f == top) {
            let id = self.floating.remove(pos);
            self.floating.push(id);
        }
        true
    }

    /// Active leaf of a tab group, or the leaf itself
    pub fn active_leaf(&self, id: NodeId) -> Option<NodeId> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Leaf(_) => Some(id),
            NodeKind::Tabs { children, active } => children.get(*active).copied(),
            NodeKind::Split { children, .. } => children.first().and_then(|c| self.active_leaf(*c)),
            NodeKind::Floating { child, .. } => self.active_leaf(*child),
        }
    }

    // ------------------------------------------------------------------------
    // Shape
    // ------------------------------------------------------------------------

    /// Id-free description of the subtree at `id`
    pub fn shape(&self, id: NodeId) -> Option<Shape> {
        let node = self.nodes.get(&id)?;
        Some(match &node.kind {
            NodeKind::Leaf(entry) => Shape::Leaf {
                id: entry.id().clone(),
                placeholder: entry.is_placeholder(),
            },
            NodeKind::Tabs { children, active } => Shape::Tabs {
                active: *active,
                children: children.iter().filter_map(|c| self.shape(*c)).collect(),
            },
            NodeKind::Split {
                orientation,
                children,
                ratios,
            } => Shape::Split {
                orientation: *orientation,
                ratios: ratios.clone(),
                children: children.iter().filter_map(|c| self.shape(*c)).collect(),
            },
            NodeKind::Floating { child, bounds } => Shape::Floating {
                bounds: *bounds,
                child: Box::new(self.shape(*child)?),
            },
        })
    }

    /// Shapes of the main root and every floating root
    pub fn shapes(&self) -> (Option<Shape>, Vec<Shape>) {
        (
            self.root.and_then(|r| self.shape(r)),
            self.floating.iter().filter_map(|f| self.shape(*f)).collect(),
        )
    }

    /// Indented text rendering of the whole tree
    pub fn describe(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(root) => self.describe_node(root, 0, &mut out),
            None => out.push_str("(empty)\n"),
        }
        for &floating in &self.floating {
            self.describe_node(floating, 0, &mut out);
        }
        out
    }

    fn describe_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        match &node.kind {
            NodeKind::Leaf(entry) => {
                let marker = if entry.is_placeholder() {
                    " [placeholder]"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "{}{} \"{}\"{}\n",
                    indent,
                    entry.id(),
                    entry.model.title,
                    marker
                ));
            }
            NodeKind::Tabs { active, .. } => {
                out.push_str(&format!("{}tabs (active {})\n", indent, active));
            }
            NodeKind::Split {
                orientation,
                ratios,
                ..
            } => {
                let ratios: Vec<String> = ratios.iter().map(|r| format!("{:.3}", r)).collect();
                out.push_str(&format!(
                    "{}split {:?} [{}]\n",
                    indent,
                    orientation,
                    ratios.join(", ")
                ));
            }
            NodeKind::Floating { bounds, .. } => {
                out.push_str(&format!(
                    "{}floating at ({}, {}) {}x{}\n",
                    indent, bounds.x, bounds.y, bounds.width, bounds.height
                ));
            }
        }
        for child in node.children() {
            self.describe_node(child, depth + 1, out);
        }
    }

    // ------------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------------

    /// Check structural invariants, describing the first violation found.
    ///
    /// Every attached node must be reachable from exactly one root with a
    /// matching parent handle; split groups need at least two children with
    /// ratios inside the bounds summing to 1.0; tab groups need at least two
    /// leaf children and a valid active index; no node may be orphaned.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = 0usize;
        if let Some(root) = self.root {
            if self.parent(root).is_some() {
                return Err(format!("main root {} has a parent", root));
            }
            if self.nodes.get(&root).is_some_and(|n| n.is_floating()) {
                return Err(format!("main root {} is a floating node", root));
            }
            seen += self.check_node(root, None)?;
        }
        for &floating in &self.floating {
            match self.nodes.get(&floating) {
                Some(node) if node.is_floating() && node.parent.is_none() => {}
                _ => return Err(format!("floating root {} is not a floating node", floating)),
            }
            seen += self.check_node(floating, None)?;
        }
        if seen != self.nodes.len() {
            return Err(format!(
                "{} node(s) unreachable from any root",
                self.nodes.len() - seen
            ));
        }
        Ok(())
    }

    fn check_node(&self, id: NodeId, expected_parent: Option<NodeId>) -> Result<usize, String> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| format!("dangling child {}", id))?;
        if node.parent != expected_parent {
            return Err(format!(
                "{} has parent {:?}, expected {:?}",
                id, node.parent, expected_parent
            ));
        }
        match &node.kind {
            NodeKind::Leaf(_) => {}
            NodeKind::Tabs { children, active } => {
                if children.len() < 2 {
                    return Err(format!("tab group {} has {} child(ren)", id, children.len()));
                }
                if *active >= children.len() {
                    return Err(format!("tab group {} active index {} out of range", id, active));
                }
                if children.iter().any(|c| !self.nodes.get(c).is_some_and(|n| n.is_leaf())) {
                    return Err(format!("tab group {} holds a non-leaf child", id));
                }
            }
            NodeKind::Split {
                children, ratios, ..
            } => {
                if children.len() < 2 {
                    return Err(format!("split {} has {} child(ren)", id, children.len()));
                }
                if ratios.len() != children.len() {
                    return Err(format!("split {} has mismatched ratios", id));
                }
                let sum: f32 = ratios.iter().sum();
                if !sum.is_finite() || (sum - 1.0).abs() > RATIO_TOLERANCE {
                    return Err(format!("split {} ratios sum to {}", id, sum));
                }
                let (lo, hi) = (self.min_ratio - RATIO_TOLERANCE, self.max_ratio + RATIO_TOLERANCE);
                if let Some(r) = ratios.iter().find(|r| !r.is_finite() || **r < lo || **r > hi) {
                    return Err(format!("split {} ratio {} outside bounds", id, r));
                }
            }
            NodeKind::Floating { child, .. } => {
                if expected_parent.is_some() {
                    return Err(format!("floating node {} is nested", id));
                }
                if self.nodes.get(child).is_some_and(|n| n.is_floating()) {
                    return Err(format!("floating node {} wraps another floating node", id));
                }
            }
        }
        let mut count = 1;
        for child in node.children() {
            count += self.check_node(child, Some(id))?;
        }
        Ok(count)
    }

    /// Validate internal invariants in debug builds.
    ///
    /// Panics in debug builds if any invariant is violated.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        if let Err(violation) = self.check_invariants() {
            panic!("region tree invariant violated: {}", violation);
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

/// Allowed drift of a split's ratio sum from 1.0
pub const RATIO_TOLERANCE: f32 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{DockModel, Permissions};

    fn leaf(tree: &mut RegionTree, id: &str) -> NodeId {
        tree.alloc(NodeKind::Leaf(DockEntry::new(
            DockModel::new(id, id),
            Permissions::default(),
        )))
    }

    #[test]
    fn test_node_ids_are_not_reused() {
        let mut tree = RegionTree::default();
        let a = leaf(&mut tree, "A");
        tree.nodes.remove(&a);
        let b = leaf(&mut tree, "B");
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_root_is_valid() {
        let mut tree = RegionTree::default();
        let a = leaf(&mut tree, "A");
        tree.root = Some(a);
        assert!(tree.check_invariants().is_ok());
        assert_eq!(tree.find_leaf(&DockId::new("A")), Some(a));
        assert_eq!(tree.root_of(a), Some(RootRef::Main));
    }

    #[test]
    fn test_orphan_is_reported() {
        let mut tree = RegionTree::default();
        let a = leaf(&mut tree, "A");
        leaf(&mut tree, "B");
        tree.root = Some(a);
        let err = tree.check_invariants().unwrap_err();
        assert!(err.contains("unreachable"));
    }

    #[test]
    fn test_single_child_split_is_reported() {
        let mut tree = RegionTree::default();
        let a = leaf(&mut tree, "A");
        let split = tree.alloc(NodeKind::Split {
            orientation: Orientation::Horizontal,
            children: vec![a],
            ratios: vec![1.0],
        });
        tree.node_mut(a).unwrap().parent = Some(split);
        tree.root = Some(split);
        assert!(tree.check_invariants().is_err());
    }

    #[test]
    fn test_nan_ratios_are_reported() {
        let mut tree = RegionTree::default();
        let a = leaf(&mut tree, "A");
        let b = leaf(&mut tree, "B");
        let split = tree.alloc(NodeKind::Split {
            orientation: Orientation::Horizontal,
            children: vec![a, b],
            ratios: vec![f32::NAN, f32::NAN],
        });
        tree.node_mut(a).unwrap().parent = Some(split);
        tree.node_mut(b).unwrap().parent = Some(split);
        tree.root = Some(split);
        assert!(tree.check_invariants().is_err());

        if let Some(NodeKind::Split { ratios, .. }) = tree.node_mut(split).map(|n| &mut n.kind) {
            *ratios = vec![0.5, 0.5];
        }
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_describe_marks_placeholders() {
        let mut tree = RegionTree::default();
        let a = tree.alloc(NodeKind::Leaf(DockEntry::placeholder(DockModel::new(
            "Gone", "Gone",
        ))));
        tree.root = Some(a);
        assert!(tree.describe().contains("[placeholder]"));
    }
}
