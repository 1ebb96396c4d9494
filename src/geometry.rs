//! Layout primitives shared by the region tree, the resolver and persistence

use serde::{Deserialize, Serialize};

/// Point in window or screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size with its top-left corner at `origin`
    pub fn at(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Same size placed at `origin`, or `fallback` size when this rect has no area
    pub fn moved_to(&self, origin: Point, fallback: (f32, f32)) -> Rect {
        if self.is_empty() {
            Rect::at(origin, fallback.0, fallback.1)
        } else {
            Rect::at(origin, self.width, self.height)
        }
    }

    /// True when the rectangle encloses no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Round every component to `places` decimal places (for persistence)
    pub fn rounded(&self, places: i32) -> Self {
        Self::new(
            round_to(self.x, places),
            round_to(self.y, places),
            round_to(self.width, places),
            round_to(self.height, places),
        )
    }
}

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}
