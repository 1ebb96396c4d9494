//! Window lifecycle handlers

use crate::commands::Cmd;
use crate::messages::WindowMsg;
use crate::system::DockSystem;

pub fn update_window<C>(system: &mut DockSystem<C>, msg: WindowMsg) -> Option<Cmd> {
    match msg {
        WindowMsg::Open(id) => {
            system.open_window(id.clone());
            match system.open_initial(&id) {
                Ok(opened) if opened.is_empty() => Some(Cmd::Redraw),
                Ok(_) => Some(Cmd::edited()),
                Err(e) => {
                    tracing::warn!("Opening initial docks in window {} failed: {}", id, e);
                    Some(Cmd::Redraw)
                }
            }
        }

        WindowMsg::Close(id) => match system.close_window(&id) {
            Ok(records) => Some(Cmd::WindowClosed {
                window: id,
                records,
            }),
            Err(e) => {
                tracing::debug!("Close window: {}", e);
                None
            }
        },

        WindowMsg::ResolvePlaceholders => match system.resolve_placeholders() {
            0 => None,
            _ => Some(Cmd::Redraw),
        },
    }
}
