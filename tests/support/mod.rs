#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Locate a binary built alongside the integration tests.
///
/// Test executables live in `target/<profile>/deps`; cargo places the crate's
/// binaries one level up.
pub fn helper_binary(name: &str) -> PathBuf {
    let exe = std::env::current_exe().expect("test executable path");
    let profile_dir = exe
        .parent()
        .and_then(|deps| deps.parent())
        .expect("test executable lives under target/<profile>/deps");
    let candidate = profile_dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
    assert!(
        candidate.is_file(),
        "unable to locate helper {} at {}",
        name,
        candidate.display()
    );
    candidate
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Write a store document wrapping `definitions` to a temp file.
pub fn write_store(definitions: Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate store file")?;
    let document = json!({
        "schema_version": "definition_store_v1",
        "definitions": definitions,
    });
    serde_json::to_writer(&mut file, &document)?;
    file.flush()?;
    Ok(file)
}

/// Definitions shared by the scenario tests.
pub fn fixture_definitions() -> Value {
    json!([
        {
            "kind": "ComponentDefinition",
            "name": "worker",
            "annotations": {"type": "terraform"},
            "spec": {
                "workload": {"definition": {"apiVersion": "apps/v1", "kind": "Deployment"}},
                "schematic": {"cue": {"template": "output: {}"}}
            }
        },
        {
            "kind": "ComponentDefinition",
            "name": "webservice",
            "spec": {
                "workload": {"definition": {"apiVersion": "apps/v1", "kind": "Deployment"}},
                "schematic": {
                    "cue": {"template": "output: {kind: \"Deployment\"}"},
                    "helm": {"release": {"chart": "nginx"}, "repository": {"url": "https://charts.example.test"}}
                },
                "status": {"healthPolicy": "isHealth: true", "customStatus": "message: \"ready\""}
            }
        },
        {
            "kind": "WorkloadDefinition",
            "name": "legacy-task",
            "spec": {"schematic": {"cue": {"template": "output: {kind: \"Job\"}"}}}
        },
        {
            "kind": "TraitDefinition",
            "name": "scaler",
            "spec": {"extension": {"template": "patch: {}", "appliesTo": ["worker"]}}
        },
        {
            "kind": "TraitDefinition",
            "name": "labels",
            "spec": {"extension": {"description": "no template here"}}
        },
        {
            "kind": "ScopeDefinition",
            "name": "healthscope",
            "spec": {"reference": {"name": "healthscopes.core.oam.dev"}}
        }
    ])
}
