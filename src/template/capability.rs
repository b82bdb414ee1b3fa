//! Capability descriptors built from a definition's extension payload.
//!
//! The extension may carry arbitrary descriptor fields (description,
//! parameters, applies-to lists...). They are decoded straight onto
//! `Capability`, then the template chosen by `extract_template` is laid over
//! the `template` field so structured schematics still win.

use crate::definition::{CapabilityCategory, RawExtension, Schematic};
use crate::template::{TemplateError, extract_template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Descriptor for one installable capability.
pub struct Capability {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub capability_type: String,
    #[serde(rename = "template", skip_serializing_if = "String::is_empty")]
    pub cue_template: String,
    #[serde(rename = "templateURI", skip_serializing_if = "String::is_empty")]
    pub cue_template_uri: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "definition", skip_serializing_if = "String::is_empty")]
    pub definition_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub crd_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub center: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub category: CapabilityCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applies_to: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// One user-facing parameter of a capability.
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub default: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usage: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    pub ignore: bool,
}

/// Build a capability descriptor from a definition's extension and schematic.
///
/// A `name` field inside the extension takes precedence over `name` unless it
/// is empty.
pub fn normalize_capability(
    name: &str,
    extension: Option<&RawExtension>,
    schematic: Option<&Schematic>,
) -> Result<Capability, TemplateError> {
    let extracted = extract_template(schematic, None, extension)
        .map_err(|err| recontext(err, "parse cue template"))?;

    let mut capability = match extension {
        Some(extension) => serde_json::from_slice::<Option<Capability>>(extension.as_bytes())
            .map_err(|source| TemplateError::MalformedExtension {
                context: "parse extension fail",
                source,
            })?
            .unwrap_or_default(),
        None => Capability::default(),
    };

    if capability.name.is_empty() {
        capability.name = name.to_string();
    }
    if !extracted.template_str.is_empty() {
        capability.cue_template = extracted.template_str;
    }
    Ok(capability)
}

fn recontext(err: TemplateError, context: &'static str) -> TemplateError {
    match err {
        TemplateError::MalformedExtension { source, .. } => {
            TemplateError::MalformedExtension { context, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::CueSchematic;
    use serde_json::json;

    #[test]
    fn extension_fields_populate_descriptor() {
        let ext = RawExtension::from_value(&json!({
            "template": "patch: {}",
            "description": "scales replicas",
            "appliesTo": ["webservice", "worker"],
            "parameters": [{"name": "replicas", "required": true, "default": 1}],
            "unknownField": {"ignored": true}
        }));
        let cap = normalize_capability("scaler", Some(&ext), None).unwrap();
        assert_eq!(cap.name, "scaler");
        assert_eq!(cap.cue_template, "patch: {}");
        assert_eq!(cap.description, "scales replicas");
        assert_eq!(cap.applies_to, vec!["webservice", "worker"]);
        assert_eq!(cap.parameters.len(), 1);
        assert!(cap.parameters[0].required);
        assert_eq!(cap.parameters[0].default, json!(1));
    }

    #[test]
    fn cue_schematic_overlays_extension_template() {
        let ext = RawExtension::from_value(&json!({"template": "legacy: {}"}));
        let schematic = Schematic {
            cue: Some(CueSchematic {
                template: "output: {}".into(),
            }),
            helm: None,
        };
        let cap = normalize_capability("worker", Some(&ext), Some(&schematic)).unwrap();
        assert_eq!(cap.cue_template, "output: {}");
    }

    #[test]
    fn no_extension_yields_named_descriptor() {
        let cap = normalize_capability("bare", None, None).unwrap();
        assert_eq!(
            cap,
            Capability {
                name: "bare".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn extension_name_wins_when_present() {
        let ext = RawExtension::from_value(&json!({"name": "renamed"}));
        let cap = normalize_capability("original", Some(&ext), None).unwrap();
        assert_eq!(cap.name, "renamed");
    }

    #[test]
    fn errors_carry_step_context() {
        let ext = RawExtension::new(b"not-json".to_vec());
        let err = normalize_capability("x", Some(&ext), None).unwrap_err();
        assert_eq!(err.to_string(), "parse cue template");

        let ext = RawExtension::from_value(&json!({"parameters": "replicas"}));
        let err = normalize_capability("x", Some(&ext), None).unwrap_err();
        assert_eq!(err.to_string(), "parse extension fail");
        assert!(std::error::Error::source(&err).is_some());
    }
}
