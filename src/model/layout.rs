//! Geometry propagation, hit testing and splitter handling

use super::region::{NodeId, NodeKind, Orientation, RegionTree};
use crate::error::{DockError, Result};
use crate::geometry::{Point, Rect};

/// Width of splitter bars in pixels
pub const SPLITTER_WIDTH: f32 = 6.0;

/// A draggable splitter bar between two children of a split group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitterBar {
    /// The split group this bar belongs to
    pub split: NodeId,
    /// Orientation of the split this bar controls
    pub orientation: Orientation,
    /// The hit-testing rectangle for this splitter
    pub rect: Rect,
    /// Divider index: the bar sits between children `index` and `index + 1`
    pub index: usize,
}

impl RegionTree {
    /// Lay out the main tree in `available` and every floating root at its
    /// own bounds. Returns the splitter bars for rendering and hit testing.
    pub fn compute_layout(&mut self, available: Rect) -> Vec<SplitterBar> {
        // Store the rect for relayout after edits
        self.last_layout_rect = Some(available);
        self.layout_all();
        self.splitters()
    }

    /// Recompute rects using the last layout rect
    pub fn relayout(&mut self) {
        self.layout_all();
    }

    fn layout_all(&mut self) {
        if let (Some(root), Some(available)) = (self.root, self.last_layout_rect) {
            self.layout_node(root, available);
        }
        for floating in self.floating.clone() {
            let bounds = match self.node(floating).map(|n| &n.kind) {
                Some(NodeKind::Floating { bounds, .. }) => *bounds,
                _ => continue,
            };
            self.layout_node(floating, bounds);
        }
    }

    /// Recursively compute layout for a node
    fn layout_node(&mut self, id: NodeId, rect: Rect) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.rect = rect;

        match node.kind.clone() {
            NodeKind::Leaf(_) => {}
            // Every tab shares the group's area; only the active one is shown
            NodeKind::Tabs { children, .. } => {
                for child in children {
                    self.layout_node(child, rect);
                }
            }
            NodeKind::Floating { child, .. } => self.layout_node(child, rect),
            NodeKind::Split {
                orientation,
                children,
                ratios,
            } => {
                let total_size = match orientation {
                    Orientation::Horizontal => rect.width,
                    Orientation::Vertical => rect.height,
                };

                let mut offset = 0.0;
                for (i, child) in children.iter().enumerate() {
                    let ratio = ratios
                        .get(i)
                        .copied()
                        .unwrap_or(1.0 / children.len() as f32);
                    let child_size = total_size * ratio;

                    let child_rect = match orientation {
                        Orientation::Horizontal => {
                            Rect::new(rect.x + offset, rect.y, child_size, rect.height)
                        }
                        Orientation::Vertical => {
                            Rect::new(rect.x, rect.y + offset, rect.width, child_size)
                        }
                    };
                    self.layout_node(*child, child_rect);

                    offset += child_size;
                }
            }
        }
    }

    /// Splitter bars of every split group, from the last layout pass
    pub fn splitters(&self) -> Vec<SplitterBar> {
        let mut splitters = Vec::new();
        for top in self.tops() {
            self.collect_splitters(top, &mut splitters);
        }
        splitters
    }

    fn collect_splitters(&self, id: NodeId, out: &mut Vec<SplitterBar>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if let NodeKind::Split {
            orientation,
            children,
            ratios,
        } = &node.kind
        {
            let rect = node.rect;
            let width = self.splitter_width;
            let mut offset = 0.0;
            for (index, ratio) in ratios.iter().enumerate().take(children.len().saturating_sub(1)) {
                let bar = match orientation {
                    Orientation::Horizontal => {
                        offset += rect.width * ratio;
                        Rect::new(rect.x + offset - width / 2.0, rect.y, width, rect.height)
                    }
                    Orientation::Vertical => {
                        offset += rect.height * ratio;
                        Rect::new(rect.x, rect.y + offset - width / 2.0, rect.width, width)
                    }
                };
                out.push(SplitterBar {
                    split: id,
                    orientation: *orientation,
                    rect: bar,
                    index,
                });
            }
        }
        for child in node.children() {
            self.collect_splitters(child, out);
        }
    }

    /// Find splitter bar at a given point (for drag handling)
    pub fn splitter_at_point(&self, splitters: &[SplitterBar], x: f32, y: f32) -> Option<usize> {
        splitters.iter().position(|s| s.rect.contains(x, y))
    }

    /// Region a drop at `point` would target: a lone leaf or a whole tab
    /// group. Floating windows are checked first, topmost first.
    pub fn drop_target_at(&self, point: Point) -> Option<NodeId> {
        self.floating
            .iter()
            .rev()
            .chain(self.root.iter())
            .find_map(|&top| self.target_in(top, point))
    }

    fn target_in(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.node(id)?;
        if !node.rect.contains_point(point) {
            return None;
        }
        match &node.kind {
            NodeKind::Leaf(_) | NodeKind::Tabs { .. } => Some(id),
            NodeKind::Floating { child, .. } => self.target_in(*child, point),
            NodeKind::Split { children, .. } => {
                children.iter().find_map(|c| self.target_in(*c, point))
            }
        }
    }

    /// Move divider `index` of `split` to `position` (an x coordinate for
    /// horizontal splits, y for vertical), keeping both neighbours inside
    /// the ratio bounds.
    pub fn resize_divider(&mut self, split: NodeId, index: usize, position: f32) -> Result<()> {
        if !position.is_finite() {
            return Err(DockError::InvalidGeometry(format!(
                "divider position {}",
                position
            )));
        }
        let (min, max) = (self.min_ratio, self.max_ratio);
        let node = self
            .node_mut(split)
            .ok_or(DockError::InvalidTarget(split))?;
        let rect = node.rect;
        let NodeKind::Split {
            orientation,
            ratios,
            ..
        } = &mut node.kind
        else {
            return Err(DockError::InvalidTarget(split));
        };
        if index + 1 >= ratios.len() {
            return Err(DockError::InvalidTarget(split));
        }

        let (start, size) = match orientation {
            Orientation::Horizontal => (rect.x, rect.width),
            Orientation::Vertical => (rect.y, rect.height),
        };
        if size <= 0.0 {
            return Err(DockError::InvalidTarget(split));
        }

        let before: f32 = ratios[..index].iter().sum();
        let pair = ratios[index] + ratios[index + 1];
        let lo = min.max(pair - max);
        let hi = max.min(pair - min);
        if lo > hi {
            return Ok(());
        }

        let first = ((position - start) / size - before).clamp(lo, hi);
        ratios[index] = first;
        ratios[index + 1] = pair - first;
        tracing::debug!("Resized divider {} of {} to {:.3}", index, split, first);

        self.relayout();
        Ok(())
    }
}
