//! Placeholder substitution over extracted files
//!
//! Entries are applied one after another over the progressively rewritten
//! text. A replacement value that itself contains another entry's
//! placeholder is therefore expanded only if that entry comes later.

use crate::error::{CreateError, Result};
use crate::runtime::PackageManager;
use regex::{NoExpand, Regex};
use std::path::PathBuf;
use tokio::fs;

/// Ordered `(pattern, replacement)` pairs
#[derive(Debug, Clone, Default)]
pub struct SubstitutionDictionary {
    entries: Vec<(Regex, String)>,
}

impl SubstitutionDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard entries: package manager commands, year, application name
    pub fn standard(package_manager: PackageManager, year: i32, name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("pkg-install", package_manager.install_command());
        dict.insert("pkg-run", package_manager.run_prefix());
        dict.insert("pkg-add", package_manager.add_command());
        dict.insert("now-year", year.to_string());
        dict.insert("name", name);
        dict
    }

    /// Append an entry matching `{{ key }}` with any inner whitespace
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(key));
        let regex = Regex::new(&pattern).expect("escaped placeholder pattern is valid");
        self.entries.push((regex, value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every entry in insertion order
    pub fn apply(&self, text: &str) -> String {
        let mut buf = text.to_string();
        for (pattern, value) in &self.entries {
            let replaced = pattern.replace_all(&buf, NoExpand(value)).into_owned();
            buf = replaced;
        }
        buf
    }
}

/// Rewrite each file in place; returns how many files were processed
///
/// Files that are not valid UTF-8 are left untouched. A failure stops the
/// pass: files before it stay rewritten, files after it are not visited.
pub async fn substitute_files(files: &[PathBuf], dict: &SubstitutionDictionary) -> Result<usize> {
    let mut rewritten = 0;

    for path in files {
        let bytes = fs::read(path).await.map_err(|source| CreateError::Substitution {
            path: path.clone(),
            rewritten,
            source,
        })?;

        let Ok(text) = String::from_utf8(bytes) else {
            continue;
        };

        let replaced = dict.apply(&text);
        if replaced != text {
            fs::write(path, replaced)
                .await
                .map_err(|source| CreateError::Substitution {
                    path: path.clone(),
                    rewritten,
                    source,
                })?;
        }
        rewritten += 1;
    }

    Ok(rewritten)
}
