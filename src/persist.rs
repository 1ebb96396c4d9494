//! Layout persistence
//!
//! A window's layout is an ordered sequence of path-annotated [`DockModel`]
//! records (pre-order over the main tree, then each floating root). The file
//! holds one such sequence per window:
//!
//! ```json
//! { "version": 1, "windows": { "main": [ { "id": "Explorer", ... } ] } }
//! ```
//!
//! Records are validated one at a time. A record that fails is dropped and
//! reported as [`DockError::CorruptPersistedRecord`]; the rest still load.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DockError, Result};
use crate::model::{RegionTree, TreeDraft, MAX_PATH_DEPTH};
use crate::panel::{DockEntry, DockId, DockModel};
use crate::window::WindowId;

/// Current layout file format
pub const LAYOUT_VERSION: u32 = 1;

/// Persisted layout of every window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub version: u32,
    pub windows: BTreeMap<WindowId, Vec<DockModel>>,
}

impl Default for LayoutFile {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION,
            windows: BTreeMap::new(),
        }
    }
}

/// Layout file as read from disk, before per-record validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLayoutFile {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub windows: BTreeMap<WindowId, Vec<serde_json::Value>>,
}

/// Outcome of restoring one window
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Docks bound to live content
    pub restored: usize,
    /// Docks kept as placeholders because no provider is registered
    pub placeholders: Vec<DockId>,
    /// Records dropped as corrupt
    pub dropped: Vec<DockError>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.placeholders.is_empty() && self.dropped.is_empty()
    }
}

/// Write `layout` as pretty JSON, creating parent directories
pub fn write_layout(path: &Path, layout: &LayoutFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(layout)?;
    std::fs::write(path, content)?;
    tracing::info!("Saved layout to {}", path.display());
    Ok(())
}

/// Read a layout file without validating individual records
pub fn read_layout(path: &Path) -> Result<RawLayoutFile> {
    let content = std::fs::read_to_string(path)?;
    let raw: RawLayoutFile = serde_json::from_str(&content)?;
    if raw.version > LAYOUT_VERSION {
        tracing::warn!(
            "Layout at {} has version {}, newer than {}",
            path.display(),
            raw.version,
            LAYOUT_VERSION
        );
    }
    tracing::info!(
        "Loaded layout from {} ({} window(s))",
        path.display(),
        raw.windows.len()
    );
    Ok(raw)
}

/// Deserialize records one by one, keeping each record's original index
pub fn parse_records(
    values: Vec<serde_json::Value>,
) -> (Vec<(usize, DockModel)>, Vec<DockError>) {
    let mut records = Vec::new();
    let mut dropped = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<DockModel>(value) {
            Ok(model) => records.push((index, model)),
            Err(e) => dropped.push(corrupt(index, e.to_string())),
        }
    }
    (records, dropped)
}

/// Shape checks that do not depend on other records
pub fn validate_record(model: &DockModel) -> std::result::Result<(), String> {
    if model.id.as_str().trim().is_empty() {
        return Err("empty dock id".to_string());
    }
    if !(model.size_ratio > 0.0 && model.size_ratio <= 1.0) {
        return Err(format!("size ratio {} outside (0, 1]", model.size_ratio));
    }
    if model.region_path.steps.len() > MAX_PATH_DEPTH {
        return Err(format!(
            "region path has {} steps, at most {} allowed",
            model.region_path.steps.len(),
            MAX_PATH_DEPTH
        ));
    }
    if model.floating != model.region_path.is_floating() {
        return Err("floating flag disagrees with region path".to_string());
    }
    match (model.floating, model.floating_bounds) {
        (true, None) => Err("floating record without bounds".to_string()),
        (true, Some(bounds)) if !bounds.is_finite() || bounds.is_empty() => {
            Err("floating bounds enclose no area".to_string())
        }
        (false, Some(_)) => Err("docked record carries floating bounds".to_string()),
        _ => Ok(()),
    }
}

/// Rebuild `tree` (which must be empty) from records, leaving every leaf
/// as an unresolved placeholder. Returns the records that were dropped.
pub fn rebuild(tree: &mut RegionTree, records: Vec<(usize, DockModel)>) -> Vec<DockError> {
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();
    let mut draft = TreeDraft::new();

    for (index, model) in records {
        if let Err(reason) = validate_record(&model) {
            dropped.push(corrupt(index, reason));
            continue;
        }
        if seen.contains(&model.id) {
            dropped.push(corrupt(index, format!("duplicate dock {}", model.id)));
            continue;
        }
        let path = model.region_path.clone();
        let bounds = model.floating_bounds;
        let id = model.id.clone();
        match draft.insert(&path, DockEntry::placeholder(model), bounds) {
            Ok(()) => {
                seen.insert(id);
            }
            Err(reason) => dropped.push(corrupt(index, reason)),
        }
    }

    draft.build(tree);
    dropped
}

fn corrupt(index: usize, reason: String) -> DockError {
    tracing::warn!("Dropping layout record #{}: {}", index, reason);
    DockError::CorruptPersistedRecord { index, reason }
}
