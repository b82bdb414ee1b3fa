//! In-memory definition store keyed by kind and name.

use crate::definition::{DefinitionKind, DefinitionResource};
use crate::store::{DefinitionStore, StoreError};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
/// BTreeMap-backed store; lookups clone the stored resource.
pub struct InMemoryStore {
    definitions: BTreeMap<(DefinitionKind, String), DefinitionResource>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning the one it replaced, if any.
    pub fn register(&mut self, definition: DefinitionResource) -> Option<DefinitionResource> {
        self.definitions
            .insert((definition.kind, definition.name.clone()), definition)
    }

    /// Fetch a definition by kind and name, if present.
    pub fn get(&self, kind: DefinitionKind, name: &str) -> Option<&DefinitionResource> {
        self.definitions.get(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<DefinitionResource> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = DefinitionResource>>(iter: I) -> Self {
        let mut store = InMemoryStore::new();
        for definition in iter {
            store.register(definition);
        }
        store
    }
}

impl DefinitionStore for InMemoryStore {
    fn get_definition(
        &self,
        kind: DefinitionKind,
        name: &str,
    ) -> Result<DefinitionResource, StoreError> {
        self.get(kind, name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}
