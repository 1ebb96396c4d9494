//! Region tree - the mutable layout of one window
//!
//! This module holds the arena of layout nodes and every structural edit on
//! it. Structure lives here; live content handles are owned by the window
//! and keyed by leaf [`NodeId`].

mod edit;
mod layout;
mod path;
mod region;

pub use edit::{Placement, Removed};
pub use layout::{SplitterBar, SPLITTER_WIDTH};
pub use path::{PathRoot, PathStep, RegionPath, TreeDraft, MAX_PATH_DEPTH, RATIO_PRECISION};
pub use region::{
    NodeId, NodeKind, Orientation, RegionNode, RegionTree, RootRef, Shape, RATIO_TOLERANCE,
};
