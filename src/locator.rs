//! Definition lookup and template resolution.
//!
//! `TemplateLoader` finds the definition backing a capability by walking a
//! fixed lookup chain for its kind, then hands the definition's schematic,
//! status and extension to `extract_template`. Identity that only the located
//! resource knows about (workload reference, annotation category override) is
//! attached afterwards.
//!
//! Each call makes at most one store query per chain step and keeps no state,
//! so resolving the same name twice against an unchanged store gives equal
//! results.

use crate::definition::{CapabilityKind, DefinitionKind, DefinitionResource, GroupVersionKind};
use crate::gvk::{GvkMapper, MappingError, gvk_from_definition};
use crate::store::{DefinitionStore, StoreError};
use crate::template::{
    Capability, Template, TemplateError, extract_template, normalize_capability,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid definition name {name:?}")]
    InvalidName { name: String },
    #[error("kind({kind}) of {name} not supported")]
    UnsupportedKind { kind: CapabilityKind, name: String },
    #[error("looking up {resource} [{name}]")]
    DefinitionLookupFailed {
        resource: DefinitionKind,
        name: String,
        #[source]
        cause: StoreError,
    },
    #[error("no template found in {resource} [{name}]")]
    NoTemplateFound {
        resource: DefinitionKind,
        name: String,
    },
    #[error("reading template of {resource} [{name}]")]
    MalformedExtension {
        resource: DefinitionKind,
        name: String,
        #[source]
        source: TemplateError,
    },
    #[error("{resource} [{name}] has no definition reference")]
    MissingReference {
        resource: DefinitionKind,
        name: String,
    },
    #[error("mapping reference of {resource} [{name}]")]
    Mapping {
        resource: DefinitionKind,
        name: String,
        #[source]
        source: MappingError,
    },
}

impl LoadError {
    /// Store error behind a failed lookup, if that is what this is.
    pub fn lookup_cause(&self) -> Option<&StoreError> {
        match self {
            LoadError::DefinitionLookupFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// One entry in a kind's lookup chain.
#[derive(Clone, Copy, Debug)]
pub struct LookupStep {
    pub resource: DefinitionKind,
    /// Whether a failure of this step moves on to the next one.
    pub falls_through: fn(&StoreError) -> bool,
}

fn never(_: &StoreError) -> bool {
    false
}

const COMPONENT_CHAIN: &[LookupStep] = &[
    LookupStep {
        resource: DefinitionKind::ComponentDefinition,
        falls_through: StoreError::is_not_found,
    },
    LookupStep {
        resource: DefinitionKind::WorkloadDefinition,
        falls_through: never,
    },
];

const TRAIT_CHAIN: &[LookupStep] = &[LookupStep {
    resource: DefinitionKind::TraitDefinition,
    falls_through: never,
}];

// Scope templates are not resolvable yet.
const SCOPE_CHAIN: &[LookupStep] = &[];

/// Ordered resource lookups tried for a capability kind.
pub fn lookup_chain(kind: CapabilityKind) -> &'static [LookupStep] {
    match kind {
        CapabilityKind::Component => COMPONENT_CHAIN,
        CapabilityKind::Trait => TRAIT_CHAIN,
        CapabilityKind::Scope => SCOPE_CHAIN,
    }
}

/// Resolves templates and capability descriptors from a definition store.
#[derive(Clone, Debug)]
pub struct TemplateLoader<S> {
    store: S,
}

impl<S: DefinitionStore> TemplateLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the template backing capability `name` of the given kind.
    pub fn load_template(&self, kind: CapabilityKind, name: &str) -> Result<Template, LoadError> {
        let definition = self.locate(kind, name)?;
        let spec = &definition.spec;
        let mut template = extract_template(
            spec.schematic.as_ref(),
            spec.status.as_ref(),
            spec.extension.as_ref(),
        )
        .map_err(|source| LoadError::MalformedExtension {
            resource: definition.kind,
            name: name.to_string(),
            source,
        })?;

        if template.is_empty() {
            return Err(LoadError::NoTemplateFound {
                resource: definition.kind,
                name: name.to_string(),
            });
        }

        attach_identity(&mut template, &definition);
        tracing::debug!(
            %kind,
            definition = name,
            resource = %definition.kind,
            category = template.capability_category.as_str(),
            "resolved template"
        );
        Ok(template)
    }

    /// Build the full capability descriptor for `name`.
    ///
    /// Uses the same lookup chain as `load_template`; an empty template is
    /// not an error here because the descriptor may still be useful.
    pub fn describe_capability(
        &self,
        kind: CapabilityKind,
        name: &str,
    ) -> Result<Capability, LoadError> {
        let definition = self.locate(kind, name)?;
        let mut capability = normalize_capability(
            name,
            definition.spec.extension.as_ref(),
            definition.spec.schematic.as_ref(),
        )
        .map_err(|source| LoadError::MalformedExtension {
            resource: definition.kind,
            name: name.to_string(),
            source,
        })?;
        if capability.capability_type.is_empty() {
            capability.capability_type = kind.as_str().to_string();
        }
        Ok(capability)
    }

    /// Group/version/kind behind the scope definition `name`.
    pub fn scope_gvk(
        &self,
        mapper: &dyn GvkMapper,
        name: &str,
    ) -> Result<GroupVersionKind, LoadError> {
        let resource = DefinitionKind::ScopeDefinition;
        let definition = self.fetch(resource, name)?;
        let reference =
            definition
                .spec
                .reference
                .as_ref()
                .ok_or_else(|| LoadError::MissingReference {
                    resource,
                    name: name.to_string(),
                })?;
        gvk_from_definition(mapper, reference).map_err(|source| LoadError::Mapping {
            resource,
            name: name.to_string(),
            source,
        })
    }

    /// Walk the lookup chain for `kind` and return the first definition found.
    pub fn locate(&self, kind: CapabilityKind, name: &str) -> Result<DefinitionResource, LoadError> {
        let chain = lookup_chain(kind);
        if chain.is_empty() {
            return Err(LoadError::UnsupportedKind {
                kind,
                name: name.to_string(),
            });
        }
        validate_name(name)?;
        let mut last_failure = None;
        for step in chain {
            match self.store.get_definition(step.resource, name) {
                Ok(mut definition) => {
                    // Identity follows the resource that was asked for.
                    definition.kind = step.resource;
                    return Ok(definition);
                }
                Err(cause) if (step.falls_through)(&cause) => {
                    tracing::debug!(
                        resource = %step.resource,
                        definition = name,
                        %cause,
                        "definition lookup falling through"
                    );
                    last_failure = Some((step.resource, cause));
                }
                Err(cause) => return Err(lookup_failed(step.resource, name, cause)),
            }
        }
        // Only reachable when the final step falls through.
        let (resource, cause) = last_failure.ok_or_else(|| LoadError::UnsupportedKind {
            kind,
            name: name.to_string(),
        })?;
        Err(lookup_failed(resource, name, cause))
    }

    fn fetch(&self, resource: DefinitionKind, name: &str) -> Result<DefinitionResource, LoadError> {
        validate_name(name)?;
        self.store
            .get_definition(resource, name)
            .map_err(|cause| lookup_failed(resource, name, cause))
    }
}

/// Resolve a template without keeping a loader around.
pub fn load_template<S: DefinitionStore>(
    store: S,
    kind: CapabilityKind,
    name: &str,
) -> Result<Template, LoadError> {
    TemplateLoader::new(store).load_template(kind, name)
}

fn validate_name(name: &str) -> Result<(), LoadError> {
    if name.trim().is_empty() {
        return Err(LoadError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn lookup_failed(resource: DefinitionKind, name: &str, cause: StoreError) -> LoadError {
    LoadError::DefinitionLookupFailed {
        resource,
        name: name.to_string(),
        cause,
    }
}

fn attach_identity(template: &mut Template, definition: &DefinitionResource) {
    match definition.kind {
        DefinitionKind::ComponentDefinition => {
            template.reference = definition.workload_reference().cloned();
            template.capability_category = definition
                .category_override()
                .apply(template.capability_category);
        }
        // Traits always take the annotation category, even over Helm.
        DefinitionKind::TraitDefinition => {
            template.capability_category = definition.category_override().category();
        }
        // Workload definitions reached through the component fallback carry
        // no reference and their annotations are not consulted.
        DefinitionKind::WorkloadDefinition | DefinitionKind::ScopeDefinition => {}
    }
}
