//! Dock update handlers
//!
//! Handles drag sessions, dock commands and geometry for one window.

use crate::commands::Cmd;
use crate::error::{DockError, Result};
use crate::messages::DockMsg;
use crate::system::DockSystem;
use crate::window::WindowId;

/// Update function for dock messages
pub fn update_dock<C>(system: &mut DockSystem<C>, window_id: &WindowId, msg: DockMsg) -> Option<Cmd> {
    // Opening needs the registry alongside the window
    if let DockMsg::Open(id) = &msg {
        return match system.open(window_id, id) {
            Ok(_) => Some(Cmd::edited()),
            Err(e) => report(window_id, "open", e),
        };
    }

    let window = match system.window_mut(window_id) {
        Ok(window) => window,
        Err(e) => return report(window_id, "dispatch", e),
    };

    match msg {
        DockMsg::BeginDrag { source, pointer } => match window.begin_drag(source, pointer) {
            Ok(()) => Some(preview(window.drag_to(pointer))),
            Err(e) => report(window_id, "begin drag", e),
        },

        DockMsg::DragTo(pointer) => {
            if !window.is_dragging() {
                return None;
            }
            Some(preview(window.drag_to(pointer)))
        }

        DockMsg::EndDrag(pointer) => match window.end_drag(pointer) {
            Ok(Some(_)) => Some(Cmd::batch(vec![Cmd::HideDropPreview, Cmd::edited()])),
            Ok(None) => Some(Cmd::HideDropPreview),
            Err(e) => {
                report(window_id, "drop", e);
                Some(Cmd::HideDropPreview)
            }
        },

        DockMsg::CancelDrag => {
            window.cancel_drag();
            Some(Cmd::HideDropPreview)
        }

        DockMsg::Close(leaf) => edited(window_id, "close", window.close(leaf).map(|_| ())),

        DockMsg::Activate(leaf) => match window.activate(leaf) {
            Ok(()) => Some(Cmd::Redraw),
            Err(e) => report(window_id, "activate", e),
        },

        DockMsg::NextTab(node) => match window.next_tab(node) {
            Ok(_) => Some(Cmd::Redraw),
            Err(e) => report(window_id, "next tab", e),
        },

        DockMsg::PrevTab(node) => match window.prev_tab(node) {
            Ok(_) => Some(Cmd::Redraw),
            Err(e) => report(window_id, "previous tab", e),
        },

        DockMsg::Float { node, bounds } => {
            edited(window_id, "float", window.float(node, bounds).map(|_| ()))
        }

        DockMsg::Dock {
            floating,
            target,
            decision,
        } => edited(window_id, "dock", window.dock(floating, target, decision)),

        DockMsg::Resized(bounds) => {
            window.compute_layout(bounds);
            Some(Cmd::Redraw)
        }

        DockMsg::ResizeDivider {
            split,
            index,
            position,
        } => edited(
            window_id,
            "resize divider",
            window.resize_divider(split, index, position),
        ),

        // Handled above
        DockMsg::Open(_) => None,
    }
}

fn preview(target: Option<crate::drag::DropTarget>) -> Cmd {
    match target {
        Some(target) => Cmd::ShowDropPreview(target.preview),
        None => Cmd::HideDropPreview,
    }
}

fn edited(window: &WindowId, what: &str, result: Result<()>) -> Option<Cmd> {
    match result {
        Ok(()) => Some(Cmd::edited()),
        Err(e) => report(window, what, e),
    }
}

/// Log a failed command. Nothing is retried here.
fn report(window: &WindowId, what: &str, err: DockError) -> Option<Cmd> {
    if err.is_retryable() {
        tracing::debug!("Dock {} in window {} failed: {}", what, window, err);
    } else {
        tracing::warn!("Dock {} in window {} failed: {}", what, window, err);
    }
    None
}
