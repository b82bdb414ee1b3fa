//! Legacy extension payload shape.
//!
//! Older definitions carry their template as a `template` string inside the
//! opaque extension object. The payload must be a JSON object (or `null`);
//! any other key, and a `template` that is not a string, is ignored.

use serde::Deserialize;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LegacyExtension {
    pub template: Option<String>,
}

impl LegacyExtension {
    pub fn decode(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}

impl<'de> Deserialize<'de> for LegacyExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LegacyExtensionVisitor)
    }
}

struct LegacyExtensionVisitor;

impl<'de> Visitor<'de> for LegacyExtensionVisitor {
    type Value = LegacyExtension;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an extension object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LegacyExtension::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LegacyExtension::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut template = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "template" {
                // Last occurrence wins, matching how JSON objects decode.
                template = match map.next_value::<Value>()? {
                    Value::String(body) => Some(body),
                    _ => None,
                };
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(LegacyExtension { template })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_string_template_and_ignores_other_keys() {
        let ext = LegacyExtension::decode(br#"{"template":"patch: {}","other":[1,2]}"#).unwrap();
        assert_eq!(ext.template.as_deref(), Some("patch: {}"));
    }

    #[test]
    fn non_string_template_is_not_an_error() {
        let ext = LegacyExtension::decode(br#"{"template":{"nested":true}}"#).unwrap();
        assert_eq!(ext, LegacyExtension::default());
        let ext = LegacyExtension::decode(br#"{"template":null}"#).unwrap();
        assert!(ext.template.is_none());
    }

    #[test]
    fn null_payload_decodes_empty() {
        let ext = LegacyExtension::decode(b"null").unwrap();
        assert!(ext.template.is_none());
    }

    #[test]
    fn non_object_payloads_fail() {
        assert!(LegacyExtension::decode(b"{broken").is_err());
        assert!(LegacyExtension::decode(br#"["template"]"#).is_err());
        assert!(LegacyExtension::decode(b"\"template\"").is_err());
        assert!(LegacyExtension::decode(b"").is_err());
    }
}
