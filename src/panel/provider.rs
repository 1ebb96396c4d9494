//! Provider registration: maps dock ids to content factories

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::dock::{DockId, DockModel, Payload, Permissions};
use crate::error::{DockError, Result};
use crate::location::LocationHint;

type ContentFactory<C> = Box<dyn Fn(Option<&DockModel>) -> C>;

/// Registration record for one dock kind
///
/// The factory receives the restored model when a persisted slot is being
/// re-bound, or `None` when the dock is opened fresh.
pub struct DockProvider<C> {
    pub id: DockId,
    pub default_model: DockModel,
    pub permissions: Permissions,
    /// Where a freshly opened dock is placed
    pub location: LocationHint,
    /// Opened automatically when a window starts without a saved layout
    pub initial: bool,
    factory: ContentFactory<C>,
}

impl<C> std::fmt::Debug for DockProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockProvider")
            .field("id", &self.id)
            .field("default_model", &self.default_model)
            .field("permissions", &self.permissions)
            .field("location", &self.location)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl<C> DockProvider<C> {
    pub fn new(
        id: impl Into<DockId>,
        title: impl Into<String>,
        factory: impl Fn(Option<&DockModel>) -> C + 'static,
    ) -> Self {
        let id = id.into();
        Self {
            default_model: DockModel::new(id.clone(), title),
            id,
            permissions: Permissions::default(),
            location: LocationHint::default(),
            initial: false,
            factory: Box::new(factory),
        }
    }

    /// Provider with an explicit default model
    pub fn with_model(
        default_model: DockModel,
        permissions: Permissions,
        factory: impl Fn(Option<&DockModel>) -> C + 'static,
    ) -> Self {
        Self {
            id: default_model.id.clone(),
            default_model,
            permissions,
            location: LocationHint::default(),
            initial: false,
            factory: Box::new(factory),
        }
    }

    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn location(mut self, location: LocationHint) -> Self {
        self.location = location;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.default_model.icon = Some(icon.into());
        self
    }

    /// Show this dock in the initial layout
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    pub fn title(&self) -> &str {
        &self.default_model.title
    }

    /// Produce live content, optionally from a restored model
    pub fn create(&self, restored: Option<&DockModel>) -> C {
        (self.factory)(restored)
    }

    /// Fresh model for an instance `id` of this provider
    pub fn model_for(&self, id: &DockId) -> DockModel {
        let mut model = self.default_model.clone();
        model.id = id.clone();
        model
    }
}

/// Menu entry for a registered provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockItem {
    pub id: DockId,
    pub title: String,
}

/// All registered providers, ordered by id
///
/// Re-registration replaces the previous provider (with a warning) unless the
/// registry is strict. Unregistering never tears down live docks; they keep
/// their already bound content.
pub struct DockRegistry<C> {
    providers: BTreeMap<DockId, DockProvider<C>>,
    strict: bool,
}

impl<C> Default for DockRegistry<C> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<C> std::fmt::Debug for DockRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("strict", &self.strict)
            .finish()
    }
}

impl<C> DockRegistry<C> {
    pub fn new(strict: bool) -> Self {
        Self {
            providers: BTreeMap::new(),
            strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Register a provider, returning the one it replaced
    pub fn register(&mut self, provider: DockProvider<C>) -> Result<Option<DockProvider<C>>> {
        if self.providers.contains_key(&provider.id) {
            if self.strict {
                return Err(DockError::DuplicateRegistration(provider.id));
            }
            tracing::warn!("Replacing dock provider {}", provider.id);
        } else {
            tracing::debug!("Registered dock provider {}", provider.id);
        }
        Ok(self.providers.insert(provider.id.clone(), provider))
    }

    /// Register from parts
    pub fn register_with(
        &mut self,
        id: impl Into<DockId>,
        factory: impl Fn(Option<&DockModel>) -> C + 'static,
        default_model: DockModel,
        permissions: Permissions,
    ) -> Result<Option<DockProvider<C>>> {
        let mut provider = DockProvider::with_model(default_model, permissions, factory);
        provider.id = id.into();
        provider.default_model.id = provider.id.clone();
        self.register(provider)
    }

    /// Remove the provider for future instantiation
    pub fn unregister(&mut self, id: &DockId) -> Option<DockProvider<C>> {
        let removed = self.providers.remove(id);
        if removed.is_some() {
            tracing::debug!("Unregistered dock provider {}", id);
        }
        removed
    }

    /// Find the provider for `id`, falling back to its typed kind prefix
    pub fn resolve(&self, id: &DockId) -> Result<&DockProvider<C>> {
        if let Some(provider) = self.providers.get(id) {
            return Ok(provider);
        }
        if id.is_typed() {
            if let Some(provider) = self.providers.get(&DockId::new(id.kind())) {
                return Ok(provider);
            }
        }
        Err(DockError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &DockId) -> bool {
        self.resolve(id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Menu entries for every registered provider, sorted by id
    pub fn items(&self) -> Vec<DockItem> {
        self.providers
            .values()
            .map(|p| DockItem {
                id: p.id.clone(),
                title: p.title().to_string(),
            })
            .collect()
    }

    /// Providers flagged for the initial layout, in id order
    pub fn initial_ids(&self) -> Vec<DockId> {
        self.providers
            .values()
            .filter(|p| p.initial)
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn providers(&self) -> impl Iterator<Item = &DockProvider<C>> {
        self.providers.values()
    }
}

/// Typed dock kind whose instances carry a caller value of type `T`
///
/// The value travels in the model's payload as JSON tagged with `type_tag`,
/// so the dock system can persist it without knowing `T`. The tag is written
/// to disk and defaults to the kind id; it must stay the same across builds.
#[derive(Debug, Clone)]
pub struct TypedDock<T> {
    pub kind: DockId,
    pub title: String,
    pub type_tag: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedDock<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    pub fn new(kind: impl Into<DockId>, title: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            type_tag: kind.as_str().to_string(),
            kind,
            title: title.into(),
            _marker: PhantomData,
        }
    }

    /// Override the tag stored alongside payloads
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = tag.into();
        self
    }

    /// Model for the instance `param` carrying `value`
    pub fn model(&self, param: &str, value: &T) -> Result<DockModel> {
        let payload = Payload {
            type_tag: self.type_tag.clone(),
            data: serde_json::to_value(value)?,
        };
        Ok(
            DockModel::new(DockId::typed(self.kind.as_str(), param), self.title.clone())
                .with_payload(payload),
        )
    }

    /// Decode the payload of `model`, if it belongs to this kind
    pub fn decode(&self, model: &DockModel) -> Option<T> {
        decode_payload(&self.type_tag, model)
    }

    /// Provider whose factory receives the decoded value
    pub fn provider<C>(&self, factory: impl Fn(Option<T>) -> C + 'static) -> DockProvider<C> {
        let tag = self.type_tag.clone();
        DockProvider::new(self.kind.clone(), self.title.clone(), move |model| {
            factory(model.and_then(|m| decode_payload::<T>(&tag, m)))
        })
    }
}

fn decode_payload<T: DeserializeOwned>(type_tag: &str, model: &DockModel) -> Option<T> {
    let payload = model.payload.as_ref()?;
    if payload.type_tag != type_tag {
        tracing::warn!(
            "Payload of {} is tagged {}, expected {}",
            model.id,
            payload.type_tag,
            type_tag
        );
        return None;
    }
    match serde_json::from_value(payload.data.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to decode payload of {}: {}", model.id, e);
            None
        }
    }
}
