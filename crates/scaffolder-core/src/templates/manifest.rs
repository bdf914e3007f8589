//! `package.json` and PWA `manifest.json` patching

use crate::error::{CreateError, Result};
use crate::naming::package_name;
use crate::report::Notice;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Home screens truncate anything longer
pub const SHORT_NAME_LIMIT: usize = 12;

const PACKAGE_JSON: &str = "package.json";
const PWA_MANIFEST: &str = "manifest.json";

async fn load_object(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| CreateError::io("read", path, e))?;
    serde_json::from_str(&content).map_err(|source| CreateError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

async fn store_object(path: &Path, object: Map<String, Value>) -> Result<()> {
    let content = serde_json::to_string_pretty(&Value::Object(object)).map_err(|source| {
        CreateError::ManifestParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, content)
        .await
        .map_err(|e| CreateError::io("write", path, e))
}

fn missing_package_json() -> Notice {
    Notice::warning("Could not locate `package.json` file!")
}

/// Parsed `<target>/package.json`, or `None` if there is no such file
async fn load_package_json(target: &Path) -> Result<Option<(PathBuf, Map<String, Value>)>> {
    let path = target.join(PACKAGE_JSON);
    if !path.is_file() {
        return Ok(None);
    }
    let pkg = load_object(&path).await?;
    Ok(Some((path, pkg)))
}

async fn store_package_json(
    path: &Path,
    mut pkg: Map<String, Value>,
    app_name: &str,
) -> Result<()> {
    pkg.insert("name".to_string(), Value::String(package_name(app_name)));
    store_object(path, pkg).await
}

/// Set `name` in `<target>/package.json` to the normalized package name
///
/// A missing file is a warning; an unparsable one is fatal.
pub async fn patch_package_json(target: &Path, app_name: &str) -> Result<Vec<Notice>> {
    let Some((path, pkg)) = load_package_json(target).await? else {
        return Ok(vec![missing_package_json()]);
    };
    store_package_json(&path, pkg, app_name).await?;
    Ok(Vec::new())
}

/// First `manifest.json` under `target`, by path order, skipping hidden directories
pub fn find_pwa_manifest(target: &Path) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(target)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == PWA_MANIFEST)
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found.into_iter().next()
}

/// Set `name` and `short_name` of the first PWA manifest, if there is one
pub async fn patch_pwa_manifest(target: &Path, app_name: &str) -> Result<Vec<Notice>> {
    let Some(path) = find_pwa_manifest(target) else {
        return Ok(Vec::new());
    };

    let mut manifest = load_object(&path).await?;
    manifest.insert("name".to_string(), Value::String(app_name.to_string()));
    manifest.insert("short_name".to_string(), Value::String(app_name.to_string()));
    store_object(&path, manifest).await?;

    let mut notices = Vec::new();
    if app_name.chars().count() > SHORT_NAME_LIMIT {
        notices.push(Notice::warning(format!(
            "Your `short_name` should be fewer than {} characters.",
            SHORT_NAME_LIMIT
        )));
    }
    Ok(notices)
}

/// Patch both manifests
///
/// `package.json` is parsed before anything is written, so an unparsable
/// one leaves the PWA manifest untouched.
pub async fn patch_manifests(target: &Path, app_name: &str) -> Result<Vec<Notice>> {
    let pkg = load_package_json(target).await?;

    let mut notices = patch_pwa_manifest(target, app_name).await?;
    match pkg {
        Some((path, pkg)) => store_package_json(&path, pkg, app_name).await?,
        None => notices.push(missing_package_json()),
    }
    Ok(notices)
}
