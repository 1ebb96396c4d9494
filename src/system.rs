//! Dock system facade
//!
//! Owns the provider registry and one [`DockWindow`] per managed window.
//! Persistence reads and writes every window's records in one layout file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::DockConfig;
use crate::error::{DockError, Result};
use crate::model::NodeId;
use crate::panel::{DockId, DockModel, DockProvider, DockRegistry};
use crate::persist::{self, LayoutFile, RawLayoutFile, RestoreReport, LAYOUT_VERSION};
use crate::window::{DockWindow, WindowId};

pub struct DockSystem<C> {
    registry: DockRegistry<C>,
    windows: BTreeMap<WindowId, DockWindow<C>>,
    config: DockConfig,
}

impl<C> std::fmt::Debug for DockSystem<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockSystem")
            .field("registry", &self.registry)
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C> Default for DockSystem<C> {
    fn default() -> Self {
        Self::new(DockConfig::default())
    }
}

impl<C> DockSystem<C> {
    pub fn new(config: DockConfig) -> Self {
        Self {
            registry: DockRegistry::new(config.strict_registration),
            windows: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    // =========================================================================
    // Registry
    // =========================================================================

    pub fn registry(&self) -> &DockRegistry<C> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DockRegistry<C> {
        &mut self.registry
    }

    /// Register a provider. Live docks keep the content they were built with.
    pub fn register(&mut self, provider: DockProvider<C>) -> Result<()> {
        self.registry.register(provider).map(|_| ())
    }

    /// Remove a provider. Live docks using it keep running until closed.
    pub fn unregister(&mut self, id: &DockId) -> bool {
        self.registry.unregister(id).is_some()
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Get a window, creating it empty if it does not exist yet
    pub fn open_window(&mut self, id: WindowId) -> &mut DockWindow<C> {
        let config = &self.config;
        self.windows.entry(id.clone()).or_insert_with(|| {
            tracing::debug!("Created window {}", id);
            DockWindow::new(id, config)
        })
    }

    pub fn window(&self, id: &WindowId) -> Result<&DockWindow<C>> {
        self.windows
            .get(id)
            .ok_or_else(|| DockError::UnknownWindow(id.clone()))
    }

    pub fn window_mut(&mut self, id: &WindowId) -> Result<&mut DockWindow<C>> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| DockError::UnknownWindow(id.clone()))
    }

    pub fn windows(&self) -> impl Iterator<Item = &DockWindow<C>> {
        self.windows.values()
    }

    /// Tear down a window, returning its final layout records
    pub fn close_window(&mut self, id: &WindowId) -> Result<Vec<DockModel>> {
        let window = self
            .windows
            .remove(id)
            .ok_or_else(|| DockError::UnknownWindow(id.clone()))?;
        tracing::debug!("Closed window {}", id);
        Ok(window.layout_snapshot())
    }

    /// Open (or activate) dock `id` in `window`
    pub fn open(&mut self, window: &WindowId, id: &DockId) -> Result<NodeId> {
        let registry = &self.registry;
        let window = self
            .windows
            .get_mut(window)
            .ok_or_else(|| DockError::UnknownWindow(window.clone()))?;
        window.open(registry, id)
    }

    /// Open a prepared model in `window`
    pub fn open_model(&mut self, window: &WindowId, model: DockModel) -> Result<NodeId> {
        let registry = &self.registry;
        let window = self
            .windows
            .get_mut(window)
            .ok_or_else(|| DockError::UnknownWindow(window.clone()))?;
        window.open_model(registry, model)
    }

    /// Open initial docks in `window` if it has no layout yet
    pub fn open_initial(&mut self, window: &WindowId) -> Result<Vec<NodeId>> {
        let registry = &self.registry;
        let window = self
            .windows
            .get_mut(window)
            .ok_or_else(|| DockError::UnknownWindow(window.clone()))?;
        window.open_initial(registry)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Records of every window
    pub fn snapshot(&self) -> LayoutFile {
        LayoutFile {
            version: LAYOUT_VERSION,
            windows: self
                .windows
                .iter()
                .map(|(id, window)| (id.clone(), window.layout_snapshot()))
                .collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        persist::write_layout(path, &self.snapshot())
    }

    /// Restore every window named in the file at `path`.
    ///
    /// A file that cannot be read at all is an error and leaves every window
    /// untouched. Individual corrupt records only show up in the reports.
    pub fn load(&mut self, path: &Path) -> Result<BTreeMap<WindowId, RestoreReport>> {
        let raw = persist::read_layout(path)?;
        Ok(self.restore(raw))
    }

    /// Restore windows from an already-read layout file
    pub fn restore(&mut self, raw: RawLayoutFile) -> BTreeMap<WindowId, RestoreReport> {
        let mut reports = BTreeMap::new();
        for (id, values) in raw.windows {
            let config = &self.config;
            let window = self
                .windows
                .entry(id.clone())
                .or_insert_with(|| DockWindow::new(id.clone(), config));
            let report = window.restore_values(&self.registry, values);
            reports.insert(id, report);
        }
        reports
    }

    /// Bind content to placeholders in every window. Call after registering
    /// providers that appeared since the layout was restored.
    pub fn resolve_placeholders(&mut self) -> usize {
        let registry = &self.registry;
        self.windows
            .values_mut()
            .map(|window| window.resolve_placeholders(registry).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> DockSystem<String> {
        let mut system = DockSystem::default();
        for id in ["Explorer", "Terminal"] {
            system
                .register(DockProvider::new(id, id, move |_| id.to_string()))
                .unwrap();
        }
        system
    }

    #[test]
    fn test_unknown_window() {
        let mut system = system();
        let err = system
            .open(&WindowId::new("nope"), &DockId::new("Explorer"))
            .unwrap_err();
        assert!(matches!(err, DockError::UnknownWindow(_)));
        assert!(system.close_window(&WindowId::new("nope")).is_err());
    }

    #[test]
    fn test_close_window_returns_snapshot() {
        let mut system = system();
        let main = WindowId::default();
        system.open_window(main.clone());
        system.open(&main, &DockId::new("Explorer")).unwrap();
        system.open(&main, &DockId::new("Terminal")).unwrap();

        let records = system.close_window(&main).unwrap();
        assert_eq!(records.len(), 2);
        assert!(system.window(&main).is_err());
    }

    #[test]
    fn test_strict_registration_from_config() {
        let mut system: DockSystem<()> = DockSystem::new(DockConfig {
            strict_registration: true,
            ..Default::default()
        });
        system.register(DockProvider::new("A", "A", |_| ())).unwrap();
        assert!(matches!(
            system.register(DockProvider::new("A", "A", |_| ())),
            Err(DockError::DuplicateRegistration(_))
        ));
    }

    #[test]
    fn test_snapshot_lists_every_window() {
        let mut system = system();
        system.open_window(WindowId::default());
        system.open_window(WindowId::new("tools"));
        system
            .open(&WindowId::new("tools"), &DockId::new("Terminal"))
            .unwrap();

        let snapshot = system.snapshot();
        assert_eq!(snapshot.windows.len(), 2);
        assert!(snapshot.windows[&WindowId::default()].is_empty());
        assert_eq!(snapshot.windows[&WindowId::new("tools")].len(), 1);
    }
}
