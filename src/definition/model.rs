//! Deserializable representation of stored definition resources.
//!
//! Only the fields the resolver reads are modelled: the schematic union, the
//! status rules, the opaque extension payload, the workload reference on
//! component definitions, the CRD reference on scope definitions, and the
//! annotations that may carry a category override.

use crate::definition::identity::{CategoryOverride, DefinitionKind, WorkloadGvk};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One stored definition object.
pub struct DefinitionResource {
    pub kind: DefinitionKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub spec: DefinitionSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Spec fields shared by every definition kind.
///
/// `workload` is only meaningful on component definitions and `reference` on
/// scope definitions; the other kinds leave them unset.
pub struct DefinitionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadTypeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<DefinitionReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schematic: Option<Schematic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<RawExtension>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Wrapper around the workload a component definition renders.
pub struct WorkloadTypeDescriptor {
    pub definition: WorkloadGvk,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// CRD reference (`<plural>.<group>`) with an optional pinned version.
pub struct DefinitionReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Structured template representations attached to a definition.
///
/// Both fields may be populated in stored data; `Schematic::source` decides
/// which one is authoritative.
pub struct Schematic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<CueSchematic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmSchematic>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CueSchematic {
    pub template: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Helm chart reference. Release and repository stay opaque.
pub struct HelmSchematic {
    #[serde(default)]
    pub release: Value,
    #[serde(default)]
    pub repository: Value,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Custom status display rule and health check rule.
pub struct Status {
    #[serde(default)]
    pub custom_status: String,
    #[serde(default)]
    pub health_policy: String,
}

/// Opaque extension payload kept as raw bytes.
///
/// Store documents embed the extension as a JSON value, which is re-encoded
/// on load; payloads built in code may hold any bytes, including ones that
/// are not JSON at all.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct RawExtension {
    pub raw: Vec<u8>,
}

impl DefinitionResource {
    pub fn new(kind: DefinitionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            annotations: BTreeMap::new(),
            spec: DefinitionSpec::default(),
        }
    }

    /// Category override declared through annotations.
    pub fn category_override(&self) -> CategoryOverride {
        CategoryOverride::from_annotations(&self.annotations)
    }

    /// Workload the definition targets, if it declares one.
    pub fn workload_reference(&self) -> Option<&WorkloadGvk> {
        self.spec.workload.as_ref().map(|w| &w.definition)
    }
}

impl RawExtension {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// Encode a JSON value as an extension payload.
    pub fn from_value(value: &Value) -> Self {
        Self {
            raw: value.to_string().into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Debug for RawExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawExtension")
            .field(&String::from_utf8_lossy(&self.raw))
            .finish()
    }
}

impl Serialize for RawExtension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Payloads that do not parse are emitted as a string so the
        // document stays valid JSON.
        match serde_json::from_slice::<Value>(&self.raw) {
            Ok(value) => value.serialize(serializer),
            Err(_) => serializer.serialize_str(&String::from_utf8_lossy(&self.raw)),
        }
    }
}

impl<'de> Deserialize<'de> for RawExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_parses_nested_spec() {
        let value = json!({
            "kind": "ComponentDefinition",
            "name": "worker",
            "annotations": {"type": "terraform"},
            "spec": {
                "workload": {"definition": {"apiVersion": "apps/v1", "kind": "Deployment"}},
                "schematic": {"cue": {"template": "output: {}"}},
                "status": {"healthPolicy": "isHealth: true"},
                "extension": {"template": "legacy"}
            }
        });
        let def: DefinitionResource = serde_json::from_value(value).unwrap();
        assert_eq!(def.kind, DefinitionKind::ComponentDefinition);
        assert_eq!(def.category_override(), CategoryOverride::Terraform);
        assert_eq!(
            def.workload_reference(),
            Some(&WorkloadGvk {
                api_version: "apps/v1".into(),
                kind: "Deployment".into(),
            })
        );
        let status = def.spec.status.as_ref().unwrap();
        assert_eq!(status.health_policy, "isHealth: true");
        assert!(status.custom_status.is_empty());

        let ext = def.spec.extension.as_ref().unwrap();
        let decoded: Value = serde_json::from_slice(ext.as_bytes()).unwrap();
        assert_eq!(decoded, json!({"template": "legacy"}));
    }

    #[test]
    fn missing_spec_defaults_to_empty() {
        let def: DefinitionResource =
            serde_json::from_value(json!({"kind": "TraitDefinition", "name": "scaler"})).unwrap();
        assert_eq!(def.spec, DefinitionSpec::default());
        assert!(def.workload_reference().is_none());
    }

    #[test]
    fn malformed_extension_serializes_as_string() {
        let ext = RawExtension::new(b"{not json".to_vec());
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json, Value::String("{not json".into()));
    }
}
