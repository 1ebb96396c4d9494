//! Drag-and-drop session
//!
//! A short-lived state machine driven by pointer events:
//!
//! ```text
//! Idle -> Dragging(source, pointer, target) -> Dropped(edit) | Cancelled
//! ```
//!
//! The session only reads the region tree. It never mutates it; a drop yields
//! one [`DragEdit`] for the window to apply, and a cancel yields nothing.

use crate::config::DockConfig;
use crate::error::{DockError, Result};
use crate::geometry::{Point, Rect};
use crate::location::{LocationResolver, Recommendation};
use crate::model::{NodeId, Placement, RegionTree};

/// Candidate region under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub node: NodeId,
    pub recommendation: Recommendation,
    /// Area the dragged dock would occupy, for the drop overlay
    pub preview: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: NodeId,
        pointer: Point,
        target: Option<DropTarget>,
        /// Pointer is outside every region of the window
        outside: bool,
        /// Source may be floated if dropped outside
        can_float: bool,
    },
}

/// The single tree edit a drop resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEdit {
    Move {
        source: NodeId,
        target: NodeId,
        placement: Placement,
    },
    Float {
        source: NodeId,
        bounds: Rect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    Dropped(DragEdit),
    Cancelled,
}

/// Per-window drag context
#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    resolver: LocationResolver,
    default_ratio: f32,
    float_on_drop_outside: bool,
    default_floating_size: (f32, f32),
}

impl Default for DragSession {
    fn default() -> Self {
        Self::from_config(&DockConfig::default())
    }
}

impl DragSession {
    pub fn from_config(config: &DockConfig) -> Self {
        Self {
            state: DragState::Idle,
            resolver: LocationResolver::from_config(config),
            default_ratio: config.default_ratio,
            float_on_drop_outside: config.float_on_drop_outside,
            default_floating_size: config.default_floating_size,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Current drop target, while dragging
    pub fn target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { target, .. } => target.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Pointer-down on the header of `source`. Restarts any running drag.
    pub fn begin(
        &mut self,
        tree: &RegionTree,
        source: NodeId,
        pointer: Point,
        can_float: bool,
    ) -> Result<()> {
        if !tree.contains(source) {
            return Err(DockError::InvalidTarget(source));
        }
        tracing::debug!("Drag started on {} at ({}, {})", source, pointer.x, pointer.y);
        self.state = DragState::Dragging {
            source,
            pointer,
            target: None,
            outside: false,
            can_float,
        };
        self.track(tree, pointer);
        Ok(())
    }

    /// Pointer-move: re-resolve the target under `pointer`
    pub fn track(&mut self, tree: &RegionTree, pointer: Point) -> Option<&DropTarget> {
        let DragState::Dragging { source, .. } = self.state else {
            return None;
        };

        let hit = tree.drop_target_at(pointer);
        let target = hit
            .filter(|&node| !tree.is_within(node, source))
            .and_then(|node| {
                let bounds = tree.node(node)?.rect;
                let recommendation = self.resolver.recommend(bounds, pointer)?;
                // Merging a tab back into its own group changes nothing
                let own_group = tree.parent(source) == Some(node);
                if own_group && recommendation.decision.direction().is_none() {
                    return None;
                }
                Some(DropTarget {
                    node,
                    recommendation,
                    preview: recommendation
                        .decision
                        .preview_rect(bounds, self.default_ratio),
                })
            });

        if let DragState::Dragging {
            pointer: current,
            target: current_target,
            outside,
            ..
        } = &mut self.state
        {
            *current = pointer;
            *current_target = target;
            *outside = hit.is_none();
            tracing::trace!("Drag over {:?}", target.map(|t| t.node));
            current_target.as_ref()
        } else {
            None
        }
    }

    /// Pointer-up: resolve the drop and return to `Idle`
    pub fn drop_at(&mut self, tree: &RegionTree, pointer: Point) -> DropOutcome {
        self.track(tree, pointer);
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging {
            source,
            target,
            outside,
            can_float,
            ..
        } = state
        else {
            return DropOutcome::Cancelled;
        };

        let outcome = match target {
            Some(target) => DropOutcome::Dropped(DragEdit::Move {
                source,
                target: target.node,
                placement: Placement::from_decision(
                    target.recommendation.decision,
                    self.default_ratio,
                ),
            }),
            None if outside && can_float && self.float_on_drop_outside => {
                DropOutcome::Dropped(DragEdit::Float {
                    source,
                    bounds: self.floating_bounds(tree, source, pointer),
                })
            }
            None => DropOutcome::Cancelled,
        };
        tracing::debug!("Drag on {} ended: {:?}", source, outcome);
        outcome
    }

    /// Abort the drag; the tree is untouched
    pub fn cancel(&mut self) -> DropOutcome {
        if let DragState::Dragging { source, .. } = std::mem::take(&mut self.state) {
            tracing::debug!("Drag on {} cancelled", source);
        }
        DropOutcome::Cancelled
    }

    /// Window bounds for a dock floated at `pointer`, keeping its current size
    fn floating_bounds(&self, tree: &RegionTree, source: NodeId, pointer: Point) -> Rect {
        tree.node(source)
            .map(|n| n.rect)
            .unwrap_or_default()
            .moved_to(pointer, self.default_floating_size)
    }
}
