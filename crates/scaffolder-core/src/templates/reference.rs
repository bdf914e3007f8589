//! Template references and destination paths

use crate::report::Notice;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A remote template in `org/repo` or `org/repo#tag` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReference {
    pub org: String,
    pub repo: String,
    pub tag: Option<String>,
}

impl TemplateReference {
    /// `org/repo` without the tag
    pub fn slug(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Tag to download, `HEAD` when none was given
    pub fn tag_or_head(&self) -> &str {
        self.tag.as_deref().unwrap_or("HEAD")
    }

    /// Whether the reference text contains `marker` anywhere
    pub fn mentions(&self, marker: &str) -> bool {
        self.to_string().contains(marker)
    }
}

impl fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)?;
        if let Some(tag) = &self.tag {
            write!(f, "#{}", tag)?;
        }
        Ok(())
    }
}

/// Normalize a user-supplied template string
///
/// A string without `/` gets `default_org` prepended, and an info notice
/// saying so is returned alongside.
pub fn resolve_template(raw: &str, default_org: &str) -> (TemplateReference, Option<Notice>) {
    let raw = raw.trim();
    let (full, notice) = if raw.contains('/') {
        (raw.to_string(), None)
    } else {
        let full = format!("{}/{}", default_org, raw);
        let notice = Notice::info(format!("Assuming you meant {}...", full));
        (full, Some(notice))
    };

    let (path, tag) = match full.split_once('#') {
        Some((path, tag)) if !tag.is_empty() => (path, Some(tag.to_string())),
        Some((path, _)) => (path, None),
        None => (full.as_str(), None),
    };

    let (org, repo) = path.split_once('/').unwrap_or((default_org, path));

    let reference = TemplateReference {
        org: org.to_string(),
        repo: repo.trim_end_matches('/').to_string(),
        tag,
    };

    (reference, notice)
}

/// Resolve `dest` against `cwd`, itself resolved against the process directory
pub fn resolve_destination(process_dir: &Path, cwd: Option<&Path>, dest: &Path) -> PathBuf {
    let base = match cwd {
        Some(cwd) => process_dir.join(cwd),
        None => process_dir.to_path_buf(),
    };
    normalize(&base.join(dest))
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Application name implied by the destination: its last path component
pub fn default_app_name(dest: &str) -> String {
    Path::new(dest)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dest.to_string())
}
