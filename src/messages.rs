//! Message types for the Elm-style architecture
//!
//! Input events from the host toolkit arrive as messages; every state change
//! of the dock system flows through [`crate::update::update`].

use crate::geometry::{Point, Rect};
use crate::location::DropDecision;
use crate::model::NodeId;
use crate::panel::DockId;
use crate::window::WindowId;

/// Messages addressed to the docks of one window
#[derive(Debug, Clone, PartialEq)]
pub enum DockMsg {
    // === Drag and drop ===
    /// Pointer-down on a dock header
    BeginDrag { source: NodeId, pointer: Point },
    /// Pointer-move while dragging
    DragTo(Point),
    /// Pointer-up while dragging
    EndDrag(Point),
    /// Escape or pointer capture lost
    CancelDrag,

    // === Commands ===
    /// Open a dock by id, or activate it if already open
    Open(DockId),
    Close(NodeId),
    Activate(NodeId),
    NextTab(NodeId),
    PrevTab(NodeId),
    /// Detach into a floating window; `None` uses the default size
    Float { node: NodeId, bounds: Option<Rect> },
    /// Re-attach a floating window; without a target it becomes the root
    Dock {
        floating: NodeId,
        target: Option<NodeId>,
        decision: DropDecision,
    },

    // === Geometry ===
    /// Window content area changed
    Resized(Rect),
    /// Splitter bar dragged to `position` along the split axis
    ResizeDivider {
        split: NodeId,
        index: usize,
        position: f32,
    },
}

/// Window lifecycle messages
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMsg {
    /// Create the window and open its initial docks
    Open(WindowId),
    Close(WindowId),
    /// Bind placeholders whose providers have been registered since restore
    ResolvePlaceholders,
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Dock(WindowId, DockMsg),
    Window(WindowMsg),
}

impl Msg {
    /// Dock message for the default window
    pub fn main(msg: DockMsg) -> Self {
        Msg::Dock(WindowId::default(), msg)
    }
}
