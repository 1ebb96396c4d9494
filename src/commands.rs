//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that the host should perform after an update.

use crate::geometry::Rect;
use crate::panel::DockModel;
use crate::window::WindowId;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a full redraw of the window's docks
    Redraw,
    /// Show the drop overlay at this rect while dragging
    ShowDropPreview(Rect),
    /// Hide the drop overlay
    HideDropPreview,
    /// Structure changed; the host should persist the layout when convenient
    PersistLayout,
    /// A window was torn down; its final records are attached
    WindowClosed {
        window: WindowId,
        records: Vec<DockModel>,
    },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Redraw and persist, the usual result of a committed edit
    pub fn edited() -> Self {
        Cmd::Batch(vec![Cmd::Redraw, Cmd::PersistLayout])
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::ShowDropPreview(_) | Cmd::HideDropPreview => true,
            // Persisting is invisible
            Cmd::PersistLayout => false,
            Cmd::WindowClosed { .. } => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Check if this command asks for the layout to be saved
    pub fn needs_persist(&self) -> bool {
        match self {
            Cmd::PersistLayout | Cmd::WindowClosed { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_persist()),
            _ => false,
        }
    }

    /// Convert Option<Cmd> with None to Cmd::None
    pub fn from_option(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
