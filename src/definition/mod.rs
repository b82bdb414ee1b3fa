//! Definition resource model.
//!
//! Identity types (capability and definition kinds, categories, GVKs) live in
//! `identity`; the stored object shape lives in `model`. Nothing here talks to
//! a store; see `crate::store` for lookups.

pub mod identity;
pub mod model;

pub use identity::{
    CATEGORY_ANNOTATION, CapabilityCategory, CapabilityKind, CategoryOverride, DefinitionKind,
    GroupVersionKind, WorkloadGvk,
};
pub use model::{
    CueSchematic, DefinitionReference, DefinitionResource, DefinitionSpec, HelmSchematic,
    RawExtension, Schematic, Status, WorkloadTypeDescriptor,
};
