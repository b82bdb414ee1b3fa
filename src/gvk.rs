//! Resource-to-kind mapping for definition references.
//!
//! Definitions name the CRD they stand for as `<plural>.<group>` with an
//! optional pinned version. Turning that into a group/version/kind needs the
//! cluster's discovery data, which sits behind `GvkMapper`.

use crate::definition::{DefinitionReference, GroupVersionKind};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MappingError {
    #[error("definition reference has an empty name")]
    EmptyReference,
    #[error("no kind registered for resource \"{resource}\" in group \"{group}\"")]
    NoMatch { group: String, resource: String },
    #[error("mapping backend error: {0}")]
    Backend(String),
}

/// Maps a group/resource (and optional version) to its kind.
///
/// When `version` is `None` the mapper picks the preferred version.
pub trait GvkMapper {
    fn kind_for(
        &self,
        group: &str,
        version: Option<&str>,
        resource: &str,
    ) -> Result<GroupVersionKind, MappingError>;
}

#[derive(Clone, Debug, Default)]
/// Table-backed mapper. The first version registered for a group/resource is
/// the preferred one.
pub struct StaticGvkMapper {
    entries: BTreeMap<(String, String), Vec<GroupVersionKind>>,
}

impl StaticGvkMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource: &str, gvk: GroupVersionKind) {
        self.entries
            .entry((gvk.group.clone(), resource.to_string()))
            .or_default()
            .push(gvk);
    }
}

impl GvkMapper for StaticGvkMapper {
    fn kind_for(
        &self,
        group: &str,
        version: Option<&str>,
        resource: &str,
    ) -> Result<GroupVersionKind, MappingError> {
        let no_match = || MappingError::NoMatch {
            group: group.to_string(),
            resource: resource.to_string(),
        };
        let candidates = self
            .entries
            .get(&(group.to_string(), resource.to_string()))
            .ok_or_else(no_match)?;
        let found = match version {
            Some(version) => candidates.iter().find(|gvk| gvk.version == version),
            None => candidates.first(),
        };
        found.cloned().ok_or_else(no_match)
    }
}

/// Split a `<plural>.<group>` reference name. Core resources have no group.
pub fn split_reference_name(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((resource, group)) => (resource, group),
        None => (name, ""),
    }
}

/// Resolve the group/version/kind a definition reference points at.
pub fn gvk_from_definition(
    mapper: &dyn GvkMapper,
    reference: &DefinitionReference,
) -> Result<GroupVersionKind, MappingError> {
    let name = reference.name.trim();
    if name.is_empty() {
        return Err(MappingError::EmptyReference);
    }
    let (resource, group) = split_reference_name(name);
    let version = reference.version.as_deref().filter(|v| !v.is_empty());
    mapper.kind_for(group, version, resource)
}
