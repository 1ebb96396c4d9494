//! Drop-target recommendation from pointer geometry
//!
//! Given a candidate region's bounds and a pointer position (same coordinate
//! space), decide whether a dragged dock should merge into the region as a
//! tab or split it on one of its four edges.
//!
//! The rectangle is partitioned into five zones:
//!
//! ```text
//! +---------------------------+
//! |\          Top            /|
//! |  \                     /  |
//! |    +---------------+    |
//! |Left|    Center     |Right|
//! |    +---------------+    |
//! |  /                     \  |
//! |/         Bottom          \|
//! +---------------------------+
//! ```
//!
//! The center box covers `center_fraction` of the width and height. Outside
//! it, the diagonals decide the edge. A pointer exactly on a diagonal is
//! resolved by the configured [`TieBreak`].
//!
//! The resolver is pure: the same `(bounds, pointer)` always gives the same
//! answer.

use serde::{Deserialize, Serialize};

use crate::config::DockConfig;
use crate::geometry::{Point, Rect};
use crate::model::Orientation;

/// Default fraction of width and height covered by the merge-as-tab zone
pub const DEFAULT_CENTER_FRACTION: f32 = 0.4;

/// Edge of a region that a new dock is split onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    /// Orientation of the split group created for this direction
    pub fn orientation(&self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Top | Direction::Bottom => Orientation::Vertical,
        }
    }

    /// Whether the new dock becomes the first child of the split
    pub fn inserts_first(&self) -> bool {
        matches!(self, Direction::Top | Direction::Left)
    }

    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];
}

/// Placement decision for a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropDecision {
    MergeAsTab,
    SplitTop,
    SplitBottom,
    SplitLeft,
    SplitRight,
}

impl DropDecision {
    /// Split direction, or `None` for a tab merge
    pub fn direction(&self) -> Option<Direction> {
        match self {
            DropDecision::MergeAsTab => None,
            DropDecision::SplitTop => Some(Direction::Top),
            DropDecision::SplitBottom => Some(Direction::Bottom),
            DropDecision::SplitLeft => Some(Direction::Left),
            DropDecision::SplitRight => Some(Direction::Right),
        }
    }

    pub fn split(direction: Direction) -> Self {
        match direction {
            Direction::Top => DropDecision::SplitTop,
            Direction::Bottom => DropDecision::SplitBottom,
            Direction::Left => DropDecision::SplitLeft,
            Direction::Right => DropDecision::SplitRight,
        }
    }

    /// Area the dropped dock would occupy, for drawing a drop overlay.
    ///
    /// `ratio` is the share given to the first child of the resulting split.
    pub fn preview_rect(&self, bounds: Rect, ratio: f32) -> Rect {
        let Some(direction) = self.direction() else {
            return bounds;
        };
        let first = if direction.inserts_first() {
            ratio
        } else {
            1.0 - ratio
        };
        match direction {
            Direction::Top => Rect::new(bounds.x, bounds.y, bounds.width, bounds.height * first),
            Direction::Left => Rect::new(bounds.x, bounds.y, bounds.width * first, bounds.height),
            Direction::Bottom => {
                let height = bounds.height * first;
                Rect::new(bounds.x, bounds.bottom() - height, bounds.width, height)
            }
            Direction::Right => {
                let width = bounds.width * first;
                Rect::new(bounds.right() - width, bounds.y, width, bounds.height)
            }
        }
    }
}

/// How a pointer exactly on a diagonal is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Prefer Left/Right
    #[default]
    PreferHorizontal,
    /// Prefer Top/Bottom
    PreferVertical,
}

/// Resolver output: a decision and how strongly the pointer favours it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub decision: DropDecision,
    /// 0.0 at a zone boundary, 1.0 at the zone's strongest point
    /// (the center for merges, the outer edge for splits)
    pub confidence: f32,
}

/// Configurable drop-zone resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationResolver {
    pub center_fraction: f32,
    pub tie_break: TieBreak,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self {
            center_fraction: DEFAULT_CENTER_FRACTION,
            tie_break: TieBreak::default(),
        }
    }
}

impl LocationResolver {
    pub fn from_config(config: &DockConfig) -> Self {
        Self {
            center_fraction: config.center_fraction.clamp(0.0, 1.0),
            tie_break: config.tie_break,
        }
    }

    /// Recommend a placement for `pointer` over `bounds`.
    ///
    /// Returns `None` if the pointer is outside the bounds or the bounds are empty.
    pub fn recommend(&self, bounds: Rect, pointer: Point) -> Option<Recommendation> {
        if bounds.is_empty() || !bounds.contains_point(pointer) {
            return None;
        }

        let dx = (pointer.x - bounds.x) / bounds.width - 0.5;
        let dy = (pointer.y - bounds.y) / bounds.height - 0.5;
        let half = self.center_fraction.clamp(0.0, 1.0) / 2.0;
        let reach = dx.abs().max(dy.abs());

        if dx.abs() <= half && dy.abs() <= half {
            let confidence = if half > 0.0 { 1.0 - reach / half } else { 1.0 };
            return Some(Recommendation {
                decision: DropDecision::MergeAsTab,
                confidence: confidence.clamp(0.0, 1.0),
            });
        }

        let horizontal = || {
            if dx < 0.0 {
                DropDecision::SplitLeft
            } else {
                DropDecision::SplitRight
            }
        };
        let vertical = || {
            if dy < 0.0 {
                DropDecision::SplitTop
            } else {
                DropDecision::SplitBottom
            }
        };

        let decision = if dx.abs() > dy.abs() {
            horizontal()
        } else if dy.abs() > dx.abs() {
            vertical()
        } else {
            match self.tie_break {
                TieBreak::PreferHorizontal => horizontal(),
                TieBreak::PreferVertical => vertical(),
            }
        };

        let span = 0.5 - half;
        let confidence = if span > f32::EPSILON {
            (reach - half) / span
        } else {
            1.0
        };

        Some(Recommendation {
            decision,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}

/// Resolve with the default 40% center zone and horizontal tie-break
pub fn recommended_location(bounds: Rect, pointer: Point) -> Option<Recommendation> {
    LocationResolver::default().recommend(bounds, pointer)
}

/// Initial placement a provider asks for when its dock is first opened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationHint {
    pub decision: DropDecision,
    pub ratio: f32,
}

impl Default for LocationHint {
    fn default() -> Self {
        Self {
            decision: DropDecision::MergeAsTab,
            ratio: 0.5,
        }
    }
}

impl LocationHint {
    pub fn center() -> Self {
        Self::default()
    }

    pub fn top() -> Self {
        Self::default().toward(DropDecision::SplitTop)
    }

    pub fn bottom() -> Self {
        Self::default().toward(DropDecision::SplitBottom)
    }

    pub fn left() -> Self {
        Self::default().toward(DropDecision::SplitLeft)
    }

    pub fn right() -> Self {
        Self::default().toward(DropDecision::SplitRight)
    }

    fn toward(mut self, decision: DropDecision) -> Self {
        self.decision = decision;
        self
    }

    /// Divider position of the split (share of the first child)
    pub fn ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }
}
