//! Structural edits on the region tree
//!
//! Every public edit runs inside [`RegionTree::edit`]: the arena is snapshotted,
//! the change is applied, invariants are checked and the snapshot is restored
//! if anything failed. Observers never see a half-applied edit.

use super::region::{NodeId, NodeKind, RegionTree};
use crate::error::{DockError, Result};
use crate::geometry::Rect;
use crate::location::{Direction, DropDecision};
use crate::panel::DockEntry;

/// Where a node goes relative to a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Merge into the target's tab group at `index` (appended when `None`)
    Tab { index: Option<usize> },
    /// Split the target, giving the first child `ratio`
    Split { direction: Direction, ratio: f32 },
}

impl Placement {
    pub fn from_decision(decision: DropDecision, ratio: f32) -> Self {
        match decision.direction() {
            Some(direction) => Placement::Split { direction, ratio },
            None => Placement::Tab { index: None },
        }
    }
}

/// A leaf taken out of the tree by `remove`
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub node: NodeId,
    pub entry: DockEntry,
}

/// Floating windows need finite bounds with some area
fn check_bounds(bounds: Rect) -> Result<()> {
    if bounds.is_finite() && !bounds.is_empty() {
        Ok(())
    } else {
        Err(DockError::InvalidGeometry(format!("floating bounds {:?}", bounds)))
    }
}

/// Containers deleted while pruning, with the node that took their place
type Retired = Vec<(NodeId, Option<NodeId>)>;

impl RegionTree {
    /// Apply `apply` atomically: on error, or if the result breaks an
    /// invariant, the tree is restored to its previous shape.
    pub(crate) fn edit<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let snapshot = (self.nodes.clone(), self.root, self.floating.clone());

        let result = apply(self).and_then(|value| match self.check_invariants() {
            Ok(()) => Ok(value),
            Err(violation) => Err(DockError::EditAborted(format!("{}: {}", op, violation))),
        });

        match result {
            Ok(value) => {
                self.relayout();
                tracing::debug!("Applied {} ({} nodes)", op, self.nodes.len());
                Ok(value)
            }
            Err(e) => {
                (self.nodes, self.root, self.floating) = snapshot;
                if matches!(e, DockError::EditAborted(_)) {
                    tracing::warn!("Rolled back {}: {}", op, e);
                } else {
                    tracing::debug!("Rejected {}: {}", op, e);
                }
                Err(e)
            }
        }
    }

    /// Fail with `RatioOutOfRange` unless `ratio` is strictly inside the bounds
    pub fn check_ratio(&self, ratio: f32) -> Result<()> {
        if ratio > self.min_ratio && ratio < self.max_ratio {
            Ok(())
        } else {
            Err(DockError::RatioOutOfRange {
                ratio,
                min: self.min_ratio,
                max: self.max_ratio,
            })
        }
    }

    // ------------------------------------------------------------------------
    // Public edits
    // ------------------------------------------------------------------------

    /// Make `entry` the main root of an empty window
    pub fn set_root(&mut self, entry: DockEntry) -> Result<NodeId> {
        self.edit("set_root", |tree| {
            if let Some(root) = tree.root {
                return Err(DockError::InvalidTarget(root));
            }
            let leaf = tree.alloc(NodeKind::Leaf(entry));
            tree.root = Some(leaf);
            Ok(leaf)
        })
    }

    /// Add `entry` as a tab of `target` and make it active.
    ///
    /// A lone leaf is turned into a tab group in place; a leaf already in a
    /// group adds to that group. `index` is clamped to the group size.
    pub fn insert_as_tab(&mut self, target: NodeId, entry: DockEntry, index: usize) -> Result<NodeId> {
        self.edit("insert_as_tab", |tree| {
            tree.require(target)?;
            let leaf = tree.alloc(NodeKind::Leaf(entry));
            tree.attach_as_tab(target, leaf, Some(index))?;
            Ok(leaf)
        })
    }

    /// Replace `target` with a split holding it and `entry`.
    ///
    /// Top/Left put the new leaf first; the first child always gets `ratio`.
    pub fn split(
        &mut self,
        target: NodeId,
        entry: DockEntry,
        direction: Direction,
        ratio: f32,
    ) -> Result<NodeId> {
        self.check_ratio(ratio)?;
        self.edit("split", |tree| {
            tree.require(target)?;
            let leaf = tree.alloc(NodeKind::Leaf(entry));
            tree.attach_split(target, leaf, direction, ratio)?;
            Ok(leaf)
        })
    }

    /// Remove `node` and its subtree, pruning groups left with one child
    pub fn remove(&mut self, node: NodeId) -> Result<Vec<Removed>> {
        self.edit("remove", |tree| {
            tree.require(node)?;
            tree.detach(node)?;
            Ok(tree.delete_subtree(node))
        })
    }

    /// Move `node` next to or into `target` as one atomic edit
    pub fn move_node(&mut self, node: NodeId, target: NodeId, placement: Placement) -> Result<()> {
        if let Placement::Split { ratio, .. } = placement {
            self.check_ratio(ratio)?;
        }
        self.edit("move", |tree| tree.relocate(node, target, placement))
    }

    /// Detach `node` into a new floating root at `bounds`.
    ///
    /// Floating a node that is already alone in a floating root just moves
    /// that window.
    pub fn float(&mut self, node: NodeId, bounds: Rect) -> Result<NodeId> {
        check_bounds(bounds)?;
        self.edit("float", |tree| {
            tree.require(node)?;
            let existing = if tree.node(node).is_some_and(|n| n.is_floating()) {
                Some(node)
            } else {
                tree.parent(node)
                    .filter(|p| tree.node(*p).is_some_and(|n| n.is_floating()))
            };
            if let Some(floating) = existing {
                tree.set_floating_bounds(floating, bounds)?;
                return Ok(floating);
            }

            tree.detach(node)?;
            let floating = tree.alloc(NodeKind::Floating {
                child: node,
                bounds,
            });
            tree.set_parent(node, Some(floating));
            tree.floating.push(floating);
            Ok(floating)
        })
    }

    /// Move the content of a floating root back into the tree at `target`
    pub fn dock(&mut self, floating: NodeId, target: NodeId, placement: Placement) -> Result<()> {
        if let Placement::Split { ratio, .. } = placement {
            self.check_ratio(ratio)?;
        }
        self.edit("dock", |tree| {
            if !tree.floating.contains(&floating) {
                return Err(DockError::InvalidTarget(floating));
            }
            tree.relocate(floating, target, placement)
        })
    }

    /// Move the content of a floating root into an empty main area
    pub fn dock_as_root(&mut self, floating: NodeId) -> Result<()> {
        self.edit("dock_as_root", |tree| {
            if let Some(root) = tree.root {
                return Err(DockError::InvalidTarget(root));
            }
            let child = match tree.node(floating).map(|n| &n.kind) {
                Some(NodeKind::Floating { child, .. }) if tree.floating.contains(&floating) => {
                    *child
                }
                _ => return Err(DockError::InvalidTarget(floating)),
            };
            tree.detach(child)?;
            tree.root = Some(child);
            Ok(())
        })
    }

    pub fn set_floating_bounds(&mut self, floating: NodeId, bounds: Rect) -> Result<()> {
        check_bounds(bounds)?;
        match self.nodes.get_mut(&floating).map(|n| &mut n.kind) {
            Some(NodeKind::Floating { bounds: current, .. }) => {
                *current = bounds;
                self.relayout();
                Ok(())
            }
            _ => Err(DockError::InvalidTarget(floating)),
        }
    }

    /// Activate the next tab of the group holding `node` (wrapping)
    pub fn next_tab(&mut self, node: NodeId) -> Result<NodeId> {
        self.cycle_tab(node, 1)
    }

    /// Activate the previous tab of the group holding `node` (wrapping)
    pub fn prev_tab(&mut self, node: NodeId) -> Result<NodeId> {
        self.cycle_tab(node, -1)
    }

    fn cycle_tab(&mut self, node: NodeId, step: isize) -> Result<NodeId> {
        let group = match self.node(node) {
            Some(n) if n.is_tabs() => node,
            Some(_) => self
                .parent(node)
                .filter(|p| self.node(*p).is_some_and(|n| n.is_tabs()))
                .ok_or(DockError::InvalidTarget(node))?,
            None => return Err(DockError::InvalidTarget(node)),
        };
        match self.nodes.get_mut(&group).map(|n| &mut n.kind) {
            Some(NodeKind::Tabs { children, active }) => {
                let len = children.len() as isize;
                *active = (*active as isize + step).rem_euclid(len) as usize;
                Ok(children[*active])
            }
            _ => Err(DockError::InvalidTarget(group)),
        }
    }

    // ------------------------------------------------------------------------
    // Primitives (callers run these inside `edit`)
    // ------------------------------------------------------------------------

    fn require(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DockError::InvalidTarget(id))
        }
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }

    /// The child of a floating node, or the node itself
    fn unwrap_floating(&self, id: NodeId) -> NodeId {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Floating { child, .. }) => *child,
            _ => id,
        }
    }

    /// Put `new` where `old` hangs: a parent slot, the main root or a
    /// floating root's child
    fn replace_in_place(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        self.set_parent(new, parent);
        self.set_parent(old, None);
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    match &mut node.kind {
                        NodeKind::Tabs { children, .. } | NodeKind::Split { children, .. } => {
                            for child in children.iter_mut().filter(|c| **c == old) {
                                *child = new;
                            }
                        }
                        NodeKind::Floating { child, .. } => {
                            if *child == old {
                                *child = new;
                            }
                        }
                        NodeKind::Leaf(_) => {}
                    }
                }
            }
            None => {
                if self.root == Some(old) {
                    self.root = Some(new);
                }
            }
        }
    }

    fn attach_as_tab(&mut self, target: NodeId, node: NodeId, index: Option<usize>) -> Result<()> {
        let target = self.unwrap_floating(target);

        let (items, active_offset, splice) = match self.node(node).map(|n| &n.kind) {
            Some(NodeKind::Leaf(_)) => (vec![node], 0, false),
            Some(NodeKind::Tabs { children, active }) => (children.clone(), *active, true),
            _ => return Err(DockError::InvalidTarget(node)),
        };

        let group = match self.node(target).map(|n| &n.kind) {
            Some(NodeKind::Tabs { .. }) => target,
            Some(NodeKind::Leaf(_)) => match self.parent(target) {
                Some(parent) if self.node(parent).is_some_and(|n| n.is_tabs()) => parent,
                _ => {
                    let group = self.alloc(NodeKind::Tabs {
                        children: Vec::new(),
                        active: 0,
                    });
                    self.replace_in_place(target, group);
                    if let Some(NodeKind::Tabs { children, .. }) =
                        self.nodes.get_mut(&group).map(|n| &mut n.kind)
                    {
                        children.push(target);
                    }
                    self.set_parent(target, Some(group));
                    group
                }
            },
            _ => return Err(DockError::InvalidTarget(target)),
        };

        if splice {
            self.nodes.remove(&node);
        }

        match self.nodes.get_mut(&group).map(|n| &mut n.kind) {
            Some(NodeKind::Tabs { children, active }) => {
                let at = index.unwrap_or(children.len()).min(children.len());
                children.splice(at..at, items.iter().copied());
                *active = at + active_offset;
            }
            _ => return Err(DockError::InvalidTarget(group)),
        }
        for item in items {
            self.set_parent(item, Some(group));
        }
        Ok(())
    }

    fn attach_split(
        &mut self,
        target: NodeId,
        node: NodeId,
        direction: Direction,
        ratio: f32,
    ) -> Result<()> {
        let mut target = self.unwrap_floating(target);
        // Splitting one tab splits the whole group
        if let Some(parent) = self.parent(target) {
            if self.node(parent).is_some_and(|n| n.is_tabs()) {
                target = parent;
            }
        }
        if self.node(node).is_some_and(|n| n.is_floating()) {
            return Err(DockError::InvalidTarget(node));
        }

        let children = if direction.inserts_first() {
            vec![node, target]
        } else {
            vec![target, node]
        };
        let split = self.alloc(NodeKind::Split {
            orientation: direction.orientation(),
            children: children.clone(),
            ratios: vec![ratio, 1.0 - ratio],
        });
        self.replace_in_place(target, split);
        for child in children {
            self.set_parent(child, Some(split));
        }
        Ok(())
    }

    /// Unlink `node` from wherever it hangs, pruning emptied groups.
    ///
    /// Returns the containers deleted on the way and their replacements.
    fn detach(&mut self, node: NodeId) -> Result<Retired> {
        let mut retired = Vec::new();
        match self.parent(node) {
            None => {
                if self.root == Some(node) {
                    self.root = None;
                } else if let Some(pos) = self.floating.iter().position(|&f| f == node) {
                    self.floating.remove(pos);
                } else {
                    return Err(DockError::InvalidTarget(node));
                }
            }
            Some(parent) => {
                self.set_parent(node, None);
                self.remove_child(parent, node, &mut retired)?;
            }
        }
        Ok(retired)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId, retired: &mut Retired) -> Result<()> {
        if self.node(parent).is_some_and(|n| n.is_floating()) {
            // A detached window closes when its content leaves
            self.floating.retain(|&f| f != parent);
            self.nodes.remove(&parent);
            retired.push((parent, None));
            return Ok(());
        }

        let (min, max) = (self.min_ratio, self.max_ratio);
        let remaining = match self.nodes.get_mut(&parent).map(|n| &mut n.kind) {
            Some(NodeKind::Tabs { children, active }) => {
                let index = position_of(children, child, parent)?;
                children.remove(index);
                if index < *active {
                    *active -= 1;
                }
                *active = (*active).min(children.len().saturating_sub(1));
                children.clone()
            }
            Some(NodeKind::Split {
                children, ratios, ..
            }) => {
                let index = position_of(children, child, parent)?;
                children.remove(index);
                ratios.remove(index);
                rebalance(ratios, min, max);
                children.clone()
            }
            _ => return Err(DockError::InvalidTarget(parent)),
        };

        match remaining.as_slice() {
            [] => {
                retired.extend(self.detach(parent)?);
                self.nodes.remove(&parent);
                retired.push((parent, None));
            }
            [only] => {
                self.replace_in_place(parent, *only);
                self.nodes.remove(&parent);
                retired.push((parent, Some(*only)));
            }
            _ => {}
        }
        Ok(())
    }

    /// Delete an already detached subtree, returning its leaves in pre-order
    fn delete_subtree(&mut self, node: NodeId) -> Vec<Removed> {
        let mut removed = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(n) = self.nodes.remove(&id) else {
                continue;
            };
            match n.kind {
                NodeKind::Leaf(entry) => removed.push(Removed { node: id, entry }),
                kind => stack.extend(kind.children().into_iter().rev()),
            }
        }
        removed
    }

    /// Move `node` (or a floating root's content) to `target`
    fn relocate(&mut self, node: NodeId, target: NodeId, placement: Placement) -> Result<()> {
        self.require(node)?;
        self.require(target)?;
        let node = self.unwrap_floating(node);
        if self.is_within(target, node) {
            return Err(DockError::InvalidTarget(target));
        }

        let retired = self.detach(node)?;
        let target = redirect(target, &retired)?;

        match placement {
            Placement::Tab { index } => self.attach_as_tab(target, node, index),
            Placement::Split { direction, ratio } => {
                self.attach_split(target, node, direction, ratio)
            }
        }
    }
}

fn position_of(children: &[NodeId], child: NodeId, parent: NodeId) -> Result<usize> {
    children.iter().position(|&c| c == child).ok_or_else(|| {
        DockError::EditAborted(format!("{} is not a child of {}", child, parent))
    })
}

/// Follow a target through containers that were collapsed during a detach
fn redirect(target: NodeId, retired: &Retired) -> Result<NodeId> {
    let mut current = target;
    while let Some((_, replacement)) = retired.iter().find(|(old, _)| *old == current) {
        current = replacement.ok_or(DockError::InvalidTarget(target))?;
    }
    Ok(current)
}

/// Scale ratios to sum to 1.0, then pull any outside `[min, max]` back in
/// by shifting the difference onto the children that still have room.
pub(crate) fn rebalance(ratios: &mut [f32], min: f32, max: f32) {
    let n = ratios.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        ratios[0] = 1.0;
        return;
    }

    let total: f32 = ratios.iter().sum();
    if total > f32::EPSILON {
        for r in ratios.iter_mut() {
            *r /= total;
        }
    } else {
        ratios.fill(1.0 / n as f32);
    }

    for _ in 0..n {
        let mut excess = 0.0;
        for r in ratios.iter_mut() {
            let clamped = r.clamp(min, max);
            excess += *r - clamped;
            *r = clamped;
        }
        if excess.abs() < 1e-6 {
            break;
        }
        let open: Vec<usize> = (0..n)
            .filter(|&i| {
                if excess > 0.0 {
                    ratios[i] < max
                } else {
                    ratios[i] > min
                }
            })
            .collect();
        if open.is_empty() {
            break;
        }
        let share = excess / open.len() as f32;
        for i in open {
            ratios[i] += share;
        }
    }
}
