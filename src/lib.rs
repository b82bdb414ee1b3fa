//! Capability template resolution.
//!
//! Given a capability kind and name, the crate locates the definition resource
//! that backs it (falling back from component to workload definitions when
//! needed) and extracts one canonical template from whichever of the competing
//! representations is populated: a CUE schematic, a Helm schematic, or the
//! legacy `template` string inside the extension payload.
//!
//! The store is an external collaborator reached through `DefinitionStore`;
//! `DefinitionIndex` loads a schema-validated JSON document into an
//! `InMemoryStore` for the helper binaries and tests.

use anyhow::{Result, bail};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub mod cli_support;
pub mod definition;
pub mod gvk;
pub mod locator;
mod schema_loader;
pub mod store;
pub mod template;

pub use definition::{
    CapabilityCategory, CapabilityKind, CategoryOverride, CueSchematic, DefinitionKind,
    DefinitionReference, DefinitionResource, DefinitionSpec, GroupVersionKind, HelmSchematic,
    RawExtension, Schematic, Status, WorkloadGvk, WorkloadTypeDescriptor,
};
pub use gvk::{GvkMapper, MappingError, StaticGvkMapper, gvk_from_definition};
pub use locator::{LoadError, LookupStep, TemplateLoader, load_template, lookup_chain};
pub use store::{DefinitionIndex, DefinitionStore, InMemoryStore, StoreError};
pub use template::{
    Capability, Parameter, Template, TemplateError, TemplateSource, extract_template,
    normalize_capability,
};

/// Environment variable naming the default store document.
pub const STORE_ENV: &str = "CAPTEMPLATE_STORE";
/// Environment variable holding the tracing filter for the binaries.
pub const LOG_ENV: &str = "CAPTEMPLATE_LOG";

/// Pick the store document path: an explicit flag wins over `CAPTEMPLATE_STORE`.
pub fn resolve_store_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match env::var(STORE_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value.trim())),
        _ => bail!("No definition store given. Pass --store PATH or set {STORE_ENV}."),
    }
}

/// Install a stderr subscriber filtered by `CAPTEMPLATE_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
