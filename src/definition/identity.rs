use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Annotation key that carries a category override on a definition.
pub const CATEGORY_ANNOTATION: &str = "type";

/// Which class of definition a caller wants resolved.
///
/// Supplied by the caller and never inferred from stored data. Parsing is
/// strict: an unknown kind is an error rather than an `Other` bucket because
/// the locator has to pick a lookup chain for it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CapabilityKind {
    Component,
    Trait,
    Scope,
}

/// Stored resource types a capability can be backed by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DefinitionKind {
    ComponentDefinition,
    WorkloadDefinition,
    TraitDefinition,
    ScopeDefinition,
}

/// Execution backend implied by a resolved template.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum CapabilityCategory {
    #[default]
    Plain,
    Helm,
    Terraform,
}

/// Category hint decoded from a definition's annotations.
///
/// Only `Terraform` is expressed through annotations; Helm is recognised
/// structurally from the schematic instead.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CategoryOverride {
    #[default]
    None,
    Terraform,
}

/// Workload group/version/kind a component definition targets.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadGvk {
    pub api_version: String,
    pub kind: String,
}

/// Fully mapped group/version/kind returned by a `GvkMapper`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Component => "componentDefinition",
            CapabilityKind::Trait => "trait",
            CapabilityKind::Scope => "scope",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "componentDefinition" | "component" => Ok(CapabilityKind::Component),
            "trait" => Ok(CapabilityKind::Trait),
            "scope" => Ok(CapabilityKind::Scope),
            other => Err(format!(
                "unknown capability kind '{other}' (expected component|trait|scope)"
            )),
        }
    }
}

impl Serialize for CapabilityKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CapabilityKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::ComponentDefinition => "ComponentDefinition",
            DefinitionKind::WorkloadDefinition => "WorkloadDefinition",
            DefinitionKind::TraitDefinition => "TraitDefinition",
            DefinitionKind::ScopeDefinition => "ScopeDefinition",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ComponentDefinition" => Ok(DefinitionKind::ComponentDefinition),
            "WorkloadDefinition" => Ok(DefinitionKind::WorkloadDefinition),
            "TraitDefinition" => Ok(DefinitionKind::TraitDefinition),
            "ScopeDefinition" => Ok(DefinitionKind::ScopeDefinition),
            other => Err(format!("unknown definition kind '{other}'")),
        }
    }
}

impl Serialize for DefinitionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DefinitionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl CapabilityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityCategory::Plain => "plain",
            CapabilityCategory::Helm => "helm",
            CapabilityCategory::Terraform => "terraform",
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "helm" => CapabilityCategory::Helm,
            "terraform" => CapabilityCategory::Terraform,
            _ => CapabilityCategory::Plain,
        }
    }
}

impl Serialize for CapabilityCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CapabilityCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl CategoryOverride {
    /// Decode the override from a definition's annotations.
    pub fn from_annotations(annotations: &BTreeMap<String, String>) -> Self {
        match annotations.get(CATEGORY_ANNOTATION).map(String::as_str) {
            Some("terraform") => CategoryOverride::Terraform,
            _ => CategoryOverride::None,
        }
    }

    /// Category to use when the override replaces the extracted one outright.
    pub fn category(self) -> CapabilityCategory {
        match self {
            CategoryOverride::None => CapabilityCategory::Plain,
            CategoryOverride::Terraform => CapabilityCategory::Terraform,
        }
    }

    /// Apply on top of an extracted category, keeping it unless overridden.
    pub fn apply(self, extracted: CapabilityCategory) -> CapabilityCategory {
        match self {
            CategoryOverride::None => extracted,
            CategoryOverride::Terraform => CapabilityCategory::Terraform,
        }
    }
}
