//! Dockyard - dockable panel layout manager
//!
//! Arranges named panels in split and tab groups, floats them into detached
//! windows, resolves drop targets from pointer geometry, and persists the
//! arrangement across restarts. Input flows through an Elm-style
//! [`Msg`] / [`update`] / [`Cmd`] surface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod location;
pub mod messages;
pub mod model;
pub mod panel;
pub mod persist;
pub mod system;
pub mod tracing;
pub mod update;
pub mod window;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::DockConfig;
pub use error::{DockError, Result};
pub use geometry::{Point, Rect};
pub use location::{recommended_location, DropDecision, LocationHint};
pub use messages::{DockMsg, Msg, WindowMsg};
pub use model::{NodeId, RegionTree};
pub use panel::{DockId, DockModel, DockProvider, DockRegistry, TypedDock};
pub use system::DockSystem;
pub use update::update;
pub use window::{DockWindow, WindowId};
