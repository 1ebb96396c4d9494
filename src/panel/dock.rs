//! Dock identity, persisted models and live entries

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::RegionPath;

/// Unique identifier for a dock kind
///
/// Used as the registration key and as the persisted reference. Instances of
/// typed docks are addressed as `"<kind> <param>"`; resolution falls back to
/// the kind prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DockId(String);

impl DockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of one instance of a typed dock kind
    pub fn typed(kind: &str, param: &str) -> Self {
        Self(format!("{} {}", kind, param))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind prefix (the whole id for untyped docks)
    pub fn kind(&self) -> &str {
        match self.0.split_once(' ') {
            Some((kind, _)) => kind,
            None => &self.0,
        }
    }

    /// Instance parameter of a typed dock id
    pub fn param(&self) -> Option<&str> {
        self.0.split_once(' ').map(|(_, param)| param)
    }

    pub fn is_typed(&self) -> bool {
        self.param().is_some()
    }
}

impl std::fmt::Display for DockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What the user may do with a dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub closable: bool,
    pub floatable: bool,
    pub reorderable: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            closable: true,
            floatable: true,
            reorderable: true,
        }
    }
}

impl Permissions {
    /// A dock pinned in place: cannot be closed, floated or dragged
    pub fn pinned() -> Self {
        Self {
            closable: false,
            floatable: false,
            reorderable: false,
        }
    }
}

/// Caller-owned configuration carried by typed docks
///
/// The dock system stores and round-trips this value without looking inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Identifies the shape of `data` for the owning caller
    pub type_tag: String,
    pub data: serde_json::Value,
}

/// Persisted, content-free description of one dock slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockModel {
    pub id: DockId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Structural descent from the window root to this slot
    #[serde(default)]
    pub region_path: RegionPath,
    /// Share of the innermost enclosing split (1.0 when not inside a split)
    #[serde(default = "full_ratio")]
    pub size_ratio: f32,
    /// Index within the innermost enclosing tab group
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub floating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_bounds: Option<Rect>,
    /// Typed dock configuration (present only for typed docks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

fn full_ratio() -> f32 {
    1.0
}

impl DockModel {
    pub fn new(id: impl Into<DockId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            region_path: RegionPath::default(),
            size_ratio: full_ratio(),
            order: 0,
            floating: false,
            floating_bounds: None,
            payload: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether this model carries a typed payload
    pub fn is_typed(&self) -> bool {
        self.payload.is_some()
    }
}

/// Live dock held by a leaf of the region tree
///
/// The content handle itself is owned by the window and keyed by the leaf's
/// node id. A leaf without bound content is a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct DockEntry {
    pub model: DockModel,
    pub permissions: Permissions,
    /// False while no provider has produced content for this slot
    pub resolved: bool,
}

impl DockEntry {
    pub fn new(model: DockModel, permissions: Permissions) -> Self {
        Self {
            model,
            permissions,
            resolved: true,
        }
    }

    /// Slot restored from a layout whose provider is not registered
    pub fn placeholder(model: DockModel) -> Self {
        Self {
            model,
            permissions: Permissions::default(),
            resolved: false,
        }
    }

    pub fn id(&self) -> &DockId {
        &self.model.id
    }

    pub fn is_placeholder(&self) -> bool {
        !self.resolved
    }
}
