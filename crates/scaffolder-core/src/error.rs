//! Failure taxonomy for project creation
//!
//! Every fatal condition the pipeline can hit is one variant here. The
//! binary's dispatcher turns any of them into a single-line message and a
//! non-zero exit; nothing in the library terminates the process.

use crate::templates::fetcher::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a proposed application name was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameViolations {
    pub name: String,
    pub reasons: Vec<String>,
}

impl std::fmt::Display for NameViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = vec![format!("Invalid package name: {}", self.name)];
        lines.extend(self.reasons.iter().map(|r| capitalize(r)));
        write!(f, "{}", lines.join("\n  ~ "))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("Invalid argument {argument} passed to {command}. Please refer to '{command} --help' for full list of options.")]
    InvalidArgument { argument: String, command: String },

    #[error("{0}")]
    InvalidName(NameViolations),

    #[error("Refusing to overwrite current directory! Please specify a different destination or use the `--force` flag")]
    DestinationExists(PathBuf),

    #[error("Refusing to overwrite current directory!")]
    OverwriteDeclined(PathBuf),

    #[error("Could not find repository: {0}")]
    FetchNotFound(String),

    #[error(transparent)]
    Fetch(FetchError),

    #[error("No `template` directory found within {0}!")]
    NoTemplateDirectory(String),

    #[error("Failed to read template archive for {reference}")]
    Archive {
        reference: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to parse {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} cannot be found")]
    ToolNotFound(String),

    #[error("`{command}` exited with status {code}")]
    HookFailed { command: String, code: i32 },

    #[error("Failed to substitute placeholders in {} ({rewritten} file(s) already rewritten)", path.display())]
    Substitution {
        path: PathBuf,
        rewritten: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CreateError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl From<FetchError> for CreateError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { reference } => Self::FetchNotFound(reference),
            other => Self::Fetch(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CreateError>;
