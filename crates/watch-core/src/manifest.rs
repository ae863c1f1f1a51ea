//! Project manifest (`package.json`) reading, writing, and merging
//!
//! Manifests are schemaless: arbitrary JSON objects whose unknown fields
//! must survive a read-merge-write cycle untouched.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::path::Path;
use tokio::fs;

/// The parsed object form of a `package.json`.
pub type Manifest = Map<String, Value>;

/// Read and parse a manifest file. There is no fallback manifest: an
/// unreadable or unparseable file is a hard error.
pub async fn read_manifest(path: &Path) -> Result<Manifest> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{} is not a JSON object", path.display()),
    }
}

/// Write a manifest as pretty-printed JSON (2-space indent) with a trailing
/// newline.
pub async fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let mut data =
        serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    data.push('\n');
    fs::write(path, data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Select `keys` from `source`, in the order given, skipping keys the source
/// does not have. Present `null` values are kept.
pub fn pick(source: &Manifest, keys: &[&str]) -> Manifest {
    let mut out = Map::new();
    for &key in keys {
        if let Some(value) = source.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

/// Recursively merge `overrides` into `base`.
///
/// Override values win on conflicting keys; when both sides hold objects
/// they merge key by key; arrays are replaced, never concatenated.
pub fn deep_merge(base: &Manifest, overrides: &Manifest) -> Manifest {
    let mut out = base.clone();
    for (key, value) in overrides {
        let merged = match (out.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(deep_merge(existing, incoming))
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Build the override fields the template contributes to the local manifest:
/// its `scripts`, plus identity fields derived from `author` and the
/// resolved project name. Without a resolved name only `scripts` and
/// `author` are produced.
pub fn template_overrides(
    template: &Manifest,
    author: &str,
    project_name: Option<&str>,
) -> Manifest {
    let mut overrides = pick(template, &["scripts"]);
    if let Some(name) = project_name {
        overrides.insert("name".to_string(), Value::String(name.to_string()));
        overrides.insert(
            "homepage".to_string(),
            Value::String(format!("https://github.com/{}/{}", author, name)),
        );
        overrides.insert(
            "repository".to_string(),
            json!({
                "type": "git",
                "url": format!("git@github.com:{}/{}", author, name),
            }),
        );
    }
    overrides.insert("author".to_string(), Value::String(author.to_string()));
    overrides
}
