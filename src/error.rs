//! Error types for the dock system
//!
//! Every condition here is recoverable. The worst case for a window is
//! falling back to an empty or default layout.

use thiserror::Error;

use crate::model::NodeId;
use crate::panel::DockId;
use crate::window::WindowId;

pub type Result<T> = std::result::Result<T, DockError>;

/// Action that a dock's permissions may forbid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockAction {
    Close,
    Float,
    Reorder,
}

impl std::fmt::Display for DockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockAction::Close => write!(f, "close"),
            DockAction::Float => write!(f, "float"),
            DockAction::Reorder => write!(f, "reorder"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DockError {
    /// Strict-mode registration collided with a live provider
    #[error("a provider is already registered for {0}")]
    DuplicateRegistration(DockId),

    /// No provider (or no live dock) for this id
    #[error("nothing registered or open for {0}")]
    NotFound(DockId),

    /// The node handle is stale or cannot take this edit
    #[error("invalid edit target {0}")]
    InvalidTarget(NodeId),

    /// The edit left the tree inconsistent and was rolled back
    #[error("edit aborted: {0}")]
    EditAborted(String),

    /// Non-finite coordinate or bounds enclosing no area
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("split ratio {ratio} outside ({min}, {max})")]
    RatioOutOfRange { ratio: f32, min: f32, max: f32 },

    /// A persisted record failed shape validation and was dropped
    #[error("corrupt layout record #{index}: {reason}")]
    CorruptPersistedRecord { index: usize, reason: String },

    #[error("{id} does not allow {action}")]
    NotPermitted { id: DockId, action: DockAction },

    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DockError {
    /// Stale-handle errors the caller can fix by re-fetching a handle and retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DockError::InvalidTarget(_) | DockError::EditAborted(_)
        )
    }
}
