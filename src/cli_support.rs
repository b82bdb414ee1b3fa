//! Argument handling shared by the helper binaries.
//!
//! Both binaries take the same `--store/--kind/--name` triple, so parsing and
//! store loading live here where they can be unit tested without spawning a
//! process.

use crate::definition::CapabilityKind;
use crate::resolve_store_path;
use crate::store::{DefinitionIndex, InMemoryStore};
use anyhow::{Context, Result, anyhow, bail};
use std::ffi::OsString;
use std::path::PathBuf;

/// Parsed `--store/--kind/--name` flags.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupArgs {
    pub store: Option<PathBuf>,
    pub kind: CapabilityKind,
    pub name: String,
}

/// Outcome of parsing: either arguments to act on or a help request.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Run(LookupArgs),
    Help,
}

impl LookupArgs {
    pub fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Parsed> {
        let mut args = args.into_iter();
        let mut store: Option<PathBuf> = None;
        let mut kind: Option<CapabilityKind> = None;
        let mut name: Option<String> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--store" => {
                    store = Some(PathBuf::from(next_value(&mut args, "--store")?));
                }
                "--kind" => {
                    let raw = next_value(&mut args, "--kind")?;
                    kind = Some(raw.parse().map_err(|err: String| anyhow!(err))?);
                }
                "--name" => {
                    let raw = next_value(&mut args, "--name")?;
                    if raw.trim().is_empty() {
                        bail!("--name must not be empty");
                    }
                    name = Some(raw);
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                other => bail!("unknown flag: {other}"),
            }
        }

        Ok(Parsed::Run(LookupArgs {
            store,
            kind: kind.ok_or_else(|| anyhow!("missing required --kind"))?,
            name: name.ok_or_else(|| anyhow!("missing required --name"))?,
        }))
    }

    /// Load the store named by `--store` or `CAPTEMPLATE_STORE`.
    pub fn load_store(&self) -> Result<InMemoryStore> {
        let path = resolve_store_path(self.store.clone())?;
        let index = DefinitionIndex::load(&path)
            .with_context(|| format!("loading definition store {}", path.display()))?;
        Ok(index.into_store())
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed> {
        LookupArgs::parse(args.iter().map(OsString::from))
    }

    #[test]
    fn parses_full_argument_set() {
        let parsed = parse(&["--store", "defs.json", "--kind", "trait", "--name", "scaler"]).unwrap();
        assert_eq!(
            parsed,
            Parsed::Run(LookupArgs {
                store: Some(PathBuf::from("defs.json")),
                kind: CapabilityKind::Trait,
                name: "scaler".into(),
            })
        );
    }

    #[test]
    fn store_flag_is_optional() {
        match parse(&["--kind", "component", "--name", "worker"]).unwrap() {
            Parsed::Run(args) => {
                assert!(args.store.is_none());
                assert_eq!(args.kind, CapabilityKind::Component);
            }
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--kind", "policy", "--name", "x"]).is_err());
        assert!(parse(&["--kind", "trait"]).is_err());
        assert!(parse(&["--kind", "trait", "--name", " "]).is_err());
        assert!(parse(&["--name"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert_eq!(parse(&["-h"]).unwrap(), Parsed::Help);
    }
}
