//! Schema-validated loading of definition store documents.
//!
//! A store document lists definition resources under a versioned envelope.
//! Loading validates the raw JSON against the bundled
//! `schema/definition_store.schema.json`, enforces the schema version, and
//! rejects duplicate `(kind, name)` pairs so a lookup can never depend on
//! document order.

use crate::definition::{DefinitionKind, DefinitionResource};
use crate::schema_loader::{SchemaLoadOptions, load_json_schema, validate_instance};
use crate::store::memory::InMemoryStore;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The only store document version this crate understands.
pub const STORE_SCHEMA_VERSION: &str = "definition_store_v1";

// Compiled into the binaries so they work away from the source tree.
const STORE_SCHEMA: &str = include_str!("../../schema/definition_store.schema.json");
const STORE_SCHEMA_LABEL: &str = "schema/definition_store.schema.json";

#[derive(Deserialize)]
struct StoreDocument {
    schema_version: String,
    definitions: Vec<DefinitionResource>,
}

#[derive(Debug)]
/// Validated store document turned into an in-memory store.
pub struct DefinitionIndex {
    store: InMemoryStore,
}

impl DefinitionIndex {
    /// Load and validate a store document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_json(path)?;
        validate_against_schema(path, &raw)?;

        let document: StoreDocument = serde_json::from_value(raw)
            .with_context(|| format!("decoding store document {}", path.display()))?;
        validate_schema_version(&document.schema_version)?;
        let store = build_store(document.definitions)?;
        tracing::debug!(
            path = %path.display(),
            definitions = store.len(),
            "loaded definition store"
        );
        Ok(Self { store })
    }

    pub fn into_store(self) -> InMemoryStore {
        self.store
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("opening store {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing store {}", path.display()))
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    if schema_version != STORE_SCHEMA_VERSION {
        bail!(
            "schema_version '{}' not supported (expected {})",
            schema_version,
            STORE_SCHEMA_VERSION
        );
    }
    Ok(())
}

fn validate_against_schema(path: &Path, document: &Value) -> Result<()> {
    let allowed = BTreeSet::from([STORE_SCHEMA_VERSION.to_string()]);
    let schema = load_json_schema(
        STORE_SCHEMA,
        STORE_SCHEMA_LABEL,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        },
    )
    .context("loading bundled store schema")?;

    validate_instance(
        &schema,
        document,
        &format!("definition store {}", path.display()),
    )
}

fn build_store(definitions: Vec<DefinitionResource>) -> Result<InMemoryStore> {
    let mut seen: BTreeMap<DefinitionKind, BTreeSet<String>> = BTreeMap::new();
    let mut store = InMemoryStore::new();
    for definition in definitions {
        if definition.name.trim().is_empty() {
            bail!("encountered {} with no name", definition.kind);
        }
        if !seen
            .entry(definition.kind)
            .or_default()
            .insert(definition.name.clone())
        {
            bail!("duplicate {} {}", definition.kind, definition.name);
        }
        store.register(definition);
    }
    Ok(store)
}
