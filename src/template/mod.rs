//! Template extraction.
//!
//! A definition can describe its template in three competing places: a CUE
//! schematic, a Helm schematic, or a `template` string inside the legacy
//! extension payload. `extract_template` picks exactly one of them in that
//! order and stops at the first hit. Status rules are copied independently of
//! which representation wins.

pub mod capability;
pub mod extension;

pub use capability::{Capability, Parameter, normalize_capability};
pub use extension::LegacyExtension;

use crate::definition::{
    CapabilityCategory, HelmSchematic, RawExtension, Schematic, Status, WorkloadGvk,
};
use serde::Serialize;
use thiserror::Error;

/// Normalized template handed to the engines that render it.
///
/// At most one of `template_str` (non-empty) and `helm` is populated.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub template_str: String,
    pub health: String,
    pub custom_status: String,
    pub capability_category: CapabilityCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<WorkloadGvk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmSchematic>,
}

/// Authoritative structured representation of a schematic.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSource {
    Cue(String),
    Helm(HelmSchematic),
    None,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("{context}")]
    MalformedExtension {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Template {
    /// True when neither a template body nor a Helm reference was found.
    pub fn is_empty(&self) -> bool {
        self.template_str.is_empty() && self.helm.is_none()
    }
}

impl Schematic {
    /// Decide which representation is authoritative. CUE always wins.
    pub fn source(&self) -> TemplateSource {
        if let Some(cue) = &self.cue {
            return TemplateSource::Cue(cue.template.clone());
        }
        if let Some(helm) = &self.helm {
            return TemplateSource::Helm(helm.clone());
        }
        TemplateSource::None
    }
}

/// Build a `Template` from the structured parts of a definition.
///
/// Only a malformed extension payload fails; an entirely empty template is a
/// valid result here and is left for the caller to judge.
pub fn extract_template(
    schematic: Option<&Schematic>,
    status: Option<&Status>,
    extension: Option<&RawExtension>,
) -> Result<Template, TemplateError> {
    let mut template = Template::default();

    if let Some(status) = status {
        template.custom_status = status.custom_status.clone();
        template.health = status.health_policy.clone();
    }

    match schematic.map_or(TemplateSource::None, Schematic::source) {
        TemplateSource::Cue(body) => {
            tracing::trace!("using cue schematic");
            template.template_str = body;
            return Ok(template);
        }
        TemplateSource::Helm(helm) => {
            tracing::trace!("using helm schematic");
            template.helm = Some(helm);
            template.capability_category = CapabilityCategory::Helm;
            return Ok(template);
        }
        TemplateSource::None => {}
    }

    if let Some(extension) = extension {
        let legacy = LegacyExtension::decode(extension.as_bytes()).map_err(|source| {
            TemplateError::MalformedExtension {
                context: "decode extension",
                source,
            }
        })?;
        if let Some(body) = legacy.template {
            tracing::trace!("using legacy extension template");
            template.template_str = body;
        }
    }

    Ok(template)
}
