//! Per-window dock context
//!
//! A [`DockWindow`] owns one region tree, the live content of its leaves and
//! the drag session for that window. Every entry point takes the provider
//! registry explicitly; there is no hidden global state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::DockConfig;
use crate::drag::{DragEdit, DragSession, DragState, DropOutcome, DropTarget};
use crate::error::{DockAction, DockError, Result};
use crate::geometry::{Point, Rect};
use crate::location::{DropDecision, LocationHint};
use crate::model::{NodeId, NodeKind, Placement, RegionTree, SplitterBar};
use crate::panel::{DockEntry, DockId, DockModel, DockRegistry};
use crate::persist::{self, RestoreReport};

/// Identifier of a managed window
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new("main")
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The docks of one window and their live content
pub struct DockWindow<C> {
    pub id: WindowId,
    tree: RegionTree,
    /// Live content by leaf; placeholders have none
    contents: HashMap<NodeId, C>,
    drag: DragSession,
    default_ratio: f32,
    default_floating_size: (f32, f32),
}

impl<C> std::fmt::Debug for DockWindow<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockWindow")
            .field("id", &self.id)
            .field("tree", &self.tree)
            .field("contents", &self.contents.len())
            .field("drag", &self.drag.state())
            .finish()
    }
}

impl<C> DockWindow<C> {
    pub fn new(id: WindowId, config: &DockConfig) -> Self {
        Self {
            id,
            tree: RegionTree::from_config(config),
            contents: HashMap::new(),
            drag: DragSession::from_config(config),
            default_ratio: config.default_ratio,
            default_floating_size: config.default_floating_size,
        }
    }

    pub fn tree(&self) -> &RegionTree {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Live content of `leaf`
    pub fn content(&self, leaf: NodeId) -> Option<&C> {
        self.contents.get(&leaf)
    }

    pub fn content_mut(&mut self, leaf: NodeId) -> Option<&mut C> {
        self.contents.get_mut(&leaf)
    }

    /// Every dock in pre-order with its entry
    pub fn docks(&self) -> Vec<(NodeId, &DockEntry)> {
        self.tree
            .leaves()
            .into_iter()
            .filter_map(|leaf| self.tree.entry(leaf).map(|e| (leaf, e)))
            .collect()
    }

    /// Leaves restored without a provider
    pub fn placeholders(&self) -> Vec<NodeId> {
        self.docks()
            .into_iter()
            .filter(|(_, e)| e.is_placeholder())
            .map(|(leaf, _)| leaf)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Query / command surface
    // ------------------------------------------------------------------------

    pub fn find_dock(&self, id: &DockId) -> Result<NodeId> {
        self.tree
            .find_leaf(id)
            .ok_or_else(|| DockError::NotFound(id.clone()))
    }

    /// Open the dock `id`, or activate it if it is already open
    pub fn open(&mut self, registry: &DockRegistry<C>, id: &DockId) -> Result<NodeId> {
        if let Ok(leaf) = self.find_dock(id) {
            self.activate(leaf)?;
            return Ok(leaf);
        }
        let provider = registry.resolve(id)?;
        let model = provider.model_for(id);
        let entry = DockEntry::new(model, provider.permissions);
        let content = provider.create(None);
        let leaf = self.place(entry, provider.location)?;
        self.contents.insert(leaf, content);
        tracing::debug!("Opened {} in window {}", id, self.id);
        Ok(leaf)
    }

    /// Open a dock from a prepared model (typed docks carry their payload here)
    pub fn open_model(&mut self, registry: &DockRegistry<C>, model: DockModel) -> Result<NodeId> {
        if let Ok(leaf) = self.find_dock(&model.id) {
            self.activate(leaf)?;
            return Ok(leaf);
        }
        let provider = registry.resolve(&model.id)?;
        let content = provider.create(Some(&model));
        let id = model.id.clone();
        let entry = DockEntry::new(model, provider.permissions);
        let leaf = self.place(entry, provider.location)?;
        self.contents.insert(leaf, content);
        tracing::debug!("Opened {} in window {}", id, self.id);
        Ok(leaf)
    }

    /// Open every provider flagged `initial`, if the window is empty
    pub fn open_initial(&mut self, registry: &DockRegistry<C>) -> Result<Vec<NodeId>> {
        if !self.tree.is_empty() {
            return Ok(Vec::new());
        }
        registry
            .initial_ids()
            .iter()
            .map(|id| self.open(registry, id))
            .collect()
    }

    /// Insert `entry` relative to the main root according to `hint`
    fn place(&mut self, entry: DockEntry, hint: LocationHint) -> Result<NodeId> {
        let Some(root) = self.tree.root() else {
            return self.tree.set_root(entry);
        };
        match hint.decision.direction() {
            Some(direction) => self.tree.split(root, entry, direction, hint.ratio),
            None => {
                let target = self.first_tab_target(root);
                self.tree.insert_as_tab(target, entry, usize::MAX)
            }
        }
    }

    /// First tab group in pre-order, else the first leaf
    fn first_tab_target(&self, root: NodeId) -> NodeId {
        let mut stack = vec![root];
        let mut first_leaf = None;
        while let Some(id) = stack.pop() {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Tabs { .. } => return id,
                NodeKind::Leaf(_) => {
                    first_leaf.get_or_insert(id);
                }
                kind => stack.extend(kind.children().into_iter().rev()),
            }
        }
        first_leaf.unwrap_or(root)
    }

    /// Close a dock, dropping its content. Returns its final model.
    pub fn close(&mut self, leaf: NodeId) -> Result<DockModel> {
        let entry = self
            .tree
            .entry(leaf)
            .ok_or(DockError::InvalidTarget(leaf))?;
        if !entry.permissions.closable && !entry.is_placeholder() {
            return Err(DockError::NotPermitted {
                id: entry.id().clone(),
                action: DockAction::Close,
            });
        }
        let model = self.model_at(leaf).unwrap_or_else(|| entry.model.clone());
        for removed in self.tree.remove(leaf)? {
            self.contents.remove(&removed.node);
        }
        tracing::debug!("Closed {} in window {}", model.id, self.id);
        Ok(model)
    }

    pub fn activate(&mut self, leaf: NodeId) -> Result<()> {
        if self.tree.entry(leaf).is_none() || !self.tree.activate(leaf) {
            return Err(DockError::InvalidTarget(leaf));
        }
        Ok(())
    }

    pub fn next_tab(&mut self, node: NodeId) -> Result<NodeId> {
        self.tree.next_tab(node)
    }

    pub fn prev_tab(&mut self, node: NodeId) -> Result<NodeId> {
        self.tree.prev_tab(node)
    }

    // ------------------------------------------------------------------------
    // Rearranging
    // ------------------------------------------------------------------------

    fn require_all(&self, node: NodeId, action: DockAction) -> Result<()> {
        if !self.tree.contains(node) {
            return Err(DockError::InvalidTarget(node));
        }
        for leaf in self.tree.leaves_under(node) {
            if let Some(entry) = self.tree.entry(leaf) {
                let allowed = match action {
                    DockAction::Close => entry.permissions.closable,
                    DockAction::Float => entry.permissions.floatable,
                    DockAction::Reorder => entry.permissions.reorderable,
                };
                if !allowed {
                    return Err(DockError::NotPermitted {
                        id: entry.id().clone(),
                        action,
                    });
                }
            }
        }
        Ok(())
    }

    /// Move `node` relative to `target` in one atomic edit
    pub fn move_dock(&mut self, node: NodeId, target: NodeId, placement: Placement) -> Result<()> {
        self.require_all(node, DockAction::Reorder)?;
        self.tree.move_node(node, target, placement)
    }

    /// Detach `node` into a floating window
    pub fn float(&mut self, node: NodeId, bounds: Option<Rect>) -> Result<NodeId> {
        self.require_all(node, DockAction::Float)?;
        let bounds = bounds.unwrap_or_else(|| {
            let current = self.tree.node(node).map(|n| n.rect).unwrap_or_default();
            current.moved_to(Point::new(current.x, current.y), self.default_floating_size)
        });
        self.tree.float(node, bounds)
    }

    /// Dock a floating window back into the tree
    pub fn dock(&mut self, floating: NodeId, target: Option<NodeId>, decision: DropDecision) -> Result<()> {
        match target {
            Some(target) => self.tree.dock(
                floating,
                target,
                Placement::from_decision(decision, self.default_ratio),
            ),
            None => self.tree.dock_as_root(floating),
        }
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    pub fn compute_layout(&mut self, bounds: Rect) -> Vec<SplitterBar> {
        self.tree.compute_layout(bounds)
    }

    pub fn splitters(&self) -> Vec<SplitterBar> {
        self.tree.splitters()
    }

    pub fn resize_divider(&mut self, split: NodeId, index: usize, position: f32) -> Result<()> {
        self.tree.resize_divider(split, index, position)
    }

    // ------------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------------

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Pointer-down on a dock header
    pub fn begin_drag(&mut self, source: NodeId, pointer: Point) -> Result<()> {
        self.require_all(source, DockAction::Reorder)?;
        let can_float = self.require_all(source, DockAction::Float).is_ok();
        self.drag.begin(&self.tree, source, pointer, can_float)
    }

    /// Pointer-move while dragging
    pub fn drag_to(&mut self, pointer: Point) -> Option<DropTarget> {
        self.drag.track(&self.tree, pointer).copied()
    }

    /// Pointer-up: apply the resulting edit, if any
    pub fn end_drag(&mut self, pointer: Point) -> Result<Option<DragEdit>> {
        match self.drag.drop_at(&self.tree, pointer) {
            DropOutcome::Dropped(edit) => {
                match edit {
                    DragEdit::Move {
                        source,
                        target,
                        placement,
                    } => self.tree.move_node(source, target, placement)?,
                    DragEdit::Float { source, bounds } => {
                        self.tree.float(source, bounds)?;
                    }
                }
                Ok(Some(edit))
            }
            DropOutcome::Cancelled => Ok(None),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Current model of `leaf` with its position fields filled in
    fn model_at(&self, leaf: NodeId) -> Option<DockModel> {
        let entry = self.tree.entry(leaf)?;
        let path = self.tree.path_of(leaf)?;
        let mut model = entry.model.clone();
        model.size_ratio = path.size_ratio();
        model.order = path.order();
        model.floating = path.is_floating();
        model.floating_bounds = if model.floating {
            self.tree.floating_bounds_of(leaf)
        } else {
            None
        };
        model.region_path = path;
        Some(model)
    }

    /// Path-annotated records of every dock, main tree first, in pre-order
    pub fn layout_snapshot(&self) -> Vec<DockModel> {
        self.tree
            .leaves()
            .into_iter()
            .filter_map(|leaf| self.model_at(leaf))
            .collect()
    }

    /// Replace the layout with `records`, binding content from `registry`.
    ///
    /// Corrupt records are dropped and reported; docks whose provider is
    /// missing are kept as placeholders.
    pub fn restore(&mut self, registry: &DockRegistry<C>, records: Vec<DockModel>) -> RestoreReport {
        let indexed = records.into_iter().enumerate().collect();
        self.restore_indexed(registry, indexed, Vec::new())
    }

    /// Restore from raw JSON records, dropping those that fail to parse
    pub fn restore_values(
        &mut self,
        registry: &DockRegistry<C>,
        values: Vec<serde_json::Value>,
    ) -> RestoreReport {
        let (records, dropped) = persist::parse_records(values);
        self.restore_indexed(registry, records, dropped)
    }

    fn restore_indexed(
        &mut self,
        registry: &DockRegistry<C>,
        records: Vec<(usize, DockModel)>,
        mut dropped: Vec<DockError>,
    ) -> RestoreReport {
        self.drag.cancel();
        self.contents.clear();
        let last_layout_rect = self.tree.last_layout_rect;
        let (min, max) = self.tree.ratio_bounds();
        let mut tree = RegionTree::new(min, max);
        tree.splitter_width = self.tree.splitter_width;
        tree.last_layout_rect = last_layout_rect;

        dropped.extend(persist::rebuild(&mut tree, records));
        if let Err(violation) = tree.check_invariants() {
            tracing::warn!(
                "Restored layout for window {} is inconsistent ({}), starting empty",
                self.id,
                violation
            );
            tree = RegionTree::new(min, max);
            tree.last_layout_rect = last_layout_rect;
        }
        self.tree = tree;

        let mut report = RestoreReport {
            dropped,
            ..Default::default()
        };
        for leaf in self.tree.leaves() {
            if self.bind(registry, leaf) {
                report.restored += 1;
            } else if let Some(entry) = self.tree.entry(leaf) {
                report.placeholders.push(entry.id().clone());
            }
        }
        tracing::info!(
            "Restored window {}: {} dock(s), {} placeholder(s), {} dropped",
            self.id,
            report.restored,
            report.placeholders.len(),
            report.dropped.len()
        );
        report
    }

    /// Create content for a placeholder leaf if its provider is registered
    fn bind(&mut self, registry: &DockRegistry<C>, leaf: NodeId) -> bool {
        let Some(entry) = self.tree.entry(leaf) else {
            return false;
        };
        let Ok(provider) = registry.resolve(entry.id()) else {
            return false;
        };
        let content = provider.create(Some(&entry.model));
        let permissions = provider.permissions;
        if let Some(entry) = self.tree.entry_mut(leaf) {
            entry.permissions = permissions;
            entry.resolved = true;
        }
        self.contents.insert(leaf, content);
        true
    }

    /// Bind content to every placeholder whose provider is now registered
    pub fn resolve_placeholders(&mut self, registry: &DockRegistry<C>) -> Vec<NodeId> {
        let resolved: Vec<NodeId> = self
            .placeholders()
            .into_iter()
            .filter(|&leaf| self.bind(registry, leaf))
            .collect();
        if !resolved.is_empty() {
            tracing::debug!(
                "Resolved {} placeholder(s) in window {}",
                resolved.len(),
                self.id
            );
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{DockProvider, Permissions};

    fn registry() -> DockRegistry<String> {
        let mut registry = DockRegistry::default();
        for id in ["Explorer", "Outline", "Terminal"] {
            registry
                .register(DockProvider::new(id, id, move |_| format!("{} content", id)))
                .unwrap();
        }
        registry
    }

    fn window() -> DockWindow<String> {
        DockWindow::new(WindowId::default(), &DockConfig::default())
    }

    #[test]
    fn test_open_or_activate() {
        let registry = registry();
        let mut window = window();
        let first = window.open(&registry, &DockId::new("Explorer")).unwrap();
        let again = window.open(&registry, &DockId::new("Explorer")).unwrap();
        assert_eq!(first, again);
        assert_eq!(window.docks().len(), 1);
        assert_eq!(window.content(first).unwrap(), "Explorer content");
    }

    #[test]
    fn test_open_unknown_is_not_found() {
        let mut window = window();
        let err = window.open(&registry(), &DockId::new("Missing")).unwrap_err();
        assert!(matches!(err, DockError::NotFound(_)));
        assert!(window.is_empty());
    }

    #[test]
    fn test_location_hint_places_split() {
        let mut registry = registry();
        registry
            .register(
                DockProvider::new("Console", "Console", |_| "console".to_string())
                    .location(LocationHint::bottom().ratio(0.7)),
            )
            .unwrap();
        let mut window = window();
        let explorer = window.open(&registry, &DockId::new("Explorer")).unwrap();
        let console = window.open(&registry, &DockId::new("Console")).unwrap();

        let root = window.tree().root().unwrap();
        match &window.tree().node(root).unwrap().kind {
            NodeKind::Split {
                children, ratios, ..
            } => {
                assert_eq!(children, &vec![explorer, console]);
                assert_eq!(ratios[0], 0.7);
            }
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_center_hint_merges_as_tab() {
        let registry = registry();
        let mut window = window();
        window.open(&registry, &DockId::new("Explorer")).unwrap();
        let outline = window.open(&registry, &DockId::new("Outline")).unwrap();
        let root = window.tree().root().unwrap();
        assert!(window.tree().node(root).unwrap().is_tabs());
        assert_eq!(window.tree().active_leaf(root), Some(outline));
    }

    #[test]
    fn test_close_respects_permissions() {
        let mut registry = registry();
        registry
            .register(
                DockProvider::new("Pinned", "Pinned", |_| String::new())
                    .permissions(Permissions::pinned()),
            )
            .unwrap();
        let mut window = window();
        let pinned = window.open(&registry, &DockId::new("Pinned")).unwrap();
        let err = window.close(pinned).unwrap_err();
        assert!(matches!(
            err,
            DockError::NotPermitted {
                action: DockAction::Close,
                ..
            }
        ));

        let explorer = window.open(&registry, &DockId::new("Explorer")).unwrap();
        let model = window.close(explorer).unwrap();
        assert_eq!(model.id, DockId::new("Explorer"));
        assert!(window.content(explorer).is_none());
        assert!(window.find_dock(&DockId::new("Explorer")).is_err());
    }

    #[test]
    fn test_open_initial_only_when_empty() {
        let mut registry = registry();
        registry
            .register(DockProvider::new("Tasks", "Tasks", |_| String::new()).initial())
            .unwrap();
        let mut window = window();
        assert_eq!(window.open_initial(&registry).unwrap().len(), 1);
        assert!(window.open_initial(&registry).unwrap().is_empty());
    }

    #[test]
    fn test_float_pinned_dock_is_refused() {
        let mut registry = registry();
        registry
            .register(
                DockProvider::new("Pinned", "Pinned", |_| String::new())
                    .permissions(Permissions::pinned()),
            )
            .unwrap();
        let mut window = window();
        let pinned = window.open(&registry, &DockId::new("Pinned")).unwrap();
        assert!(matches!(
            window.float(pinned, None),
            Err(DockError::NotPermitted {
                action: DockAction::Float,
                ..
            })
        ));
        assert!(matches!(
            window.begin_drag(pinned, Point::new(0.0, 0.0)),
            Err(DockError::NotPermitted {
                action: DockAction::Reorder,
                ..
            })
        ));
    }
}
