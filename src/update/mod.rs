//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod dock;
mod window;

use crate::commands::Cmd;
use crate::messages::{DockMsg, Msg, WindowMsg};
use crate::system::DockSystem;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use dock::update_dock;
pub use window::update_window;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update<C>(system: &mut DockSystem<C>, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(system, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(system, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner<C>(system: &mut DockSystem<C>, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Dock(window, m) => dock::update_dock(system, &window, m),
        Msg::Window(m) => window::update_window(system, m),
    }
}

/// Traced update for debug builds
#[cfg(debug_assertions)]
fn update_traced<C>(system: &mut DockSystem<C>, msg: Msg) -> Option<Cmd> {
    // Pointer motion arrives at frame rate
    let is_noisy = matches!(&msg, Msg::Dock(_, DockMsg::DragTo(_)));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(system, msg);

    for window in system.windows() {
        window.tree().assert_invariants();
    }

    result
}

/// Short message name for logs
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Dock(window, m) => {
            let name = format!("{:?}", m);
            let short = name.split([' ', '(']).next().unwrap_or(&name);
            format!("Dock::{}@{}", short, window)
        }
        Msg::Window(m) => match m {
            WindowMsg::Open(id) => format!("Window::Open@{}", id),
            WindowMsg::Close(id) => format!("Window::Close@{}", id),
            WindowMsg::ResolvePlaceholders => "Window::ResolvePlaceholders".to_string(),
        },
    }
}
