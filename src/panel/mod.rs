//! Panel system - dock identity, persisted models and provider registration
//!
//! ## Architecture
//!
//! - `DockId`: Stable identifier for a dock kind, used for registration and persistence
//! - `DockModel`: Content-free description of one dock slot (title, position, payload)
//! - `DockProvider`: Registration record mapping a `DockId` to a content factory
//! - `DockRegistry`: The set of providers, consulted when docks are opened or restored
//! - `TypedDock`: Typed front-end for providers whose instances carry caller data
//!
//! ## Integration
//!
//! The registry is owned by `DockSystem` and is read whenever a window opens a
//! dock or restores a persisted layout. Leaves whose provider is missing are kept
//! as placeholders until the id is registered again.

mod dock;
mod provider;

pub use dock::{DockEntry, DockId, DockModel, Payload, Permissions};
pub use provider::{DockItem, DockProvider, DockRegistry, TypedDock};
