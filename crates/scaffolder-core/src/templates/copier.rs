//! Bundled static resource installation into the generated `src/`

use crate::error::{CreateError, Result};
use crate::product::StaticResource;
use crate::templates::reference::TemplateReference;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Copy each resource into `<target>/src`
///
/// Skipped entirely when the reference mentions `resourceless_marker`. An
/// existing file is kept unless `force` is set. Returns the written paths.
pub async fn install_static_resources(
    target: &Path,
    reference: &TemplateReference,
    resourceless_marker: &str,
    resources: &[StaticResource],
    force: bool,
) -> Result<Vec<PathBuf>> {
    if reference.mentions(resourceless_marker) {
        return Ok(Vec::new());
    }

    let src_dir = target.join("src");
    fs::create_dir_all(&src_dir)
        .await
        .map_err(|e| CreateError::io("create directory", &src_dir, e))?;

    let mut written = Vec::new();
    for resource in resources {
        let dest = src_dir.join(resource.file_name);
        if dest.exists() && !force {
            continue;
        }
        fs::write(&dest, resource.contents)
            .await
            .map_err(|e| CreateError::io("write", &dest, e))?;
        written.push(dest);
    }

    Ok(written)
}
