//! Template archive fetching from a remote host or a local directory
//!
//! Both sources produce the same zip layout:
//! - Remote: downloads `<base>/<org>/<repo>/archive/<tag>.zip`
//! - Local: zips `<dir>/<org>/<repo>` in memory under a `<repo>-local/` prefix
//!
//! This keeps extraction identical between development and production.

use super::reference::TemplateReference;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Why a template archive could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    /// The organization, repository or tag does not exist
    #[error("Could not find repository: {reference}")]
    NotFound { reference: String },

    /// Network, authentication, rate limiting, malformed responses
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Template source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.archive_url_env())
            .unwrap_or_else(|_| config.default_archive_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid archive URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Raw zip bytes of one template repository
#[derive(Debug, Clone)]
pub struct TemplateArchive {
    pub reference: TemplateReference,
    pub bytes: Vec<u8>,
}

/// Archive fetcher - retrieves template archives from remote or local sources
pub struct ArchiveFetcher {
    source: TemplateSource,
    client: reqwest::Client,
}

impl ArchiveFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    /// Get the template source
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Build `<base>/<org>/<repo>/archive/<tag>.zip`, preserving query parameters
    pub fn archive_url(base: &Url, reference: &TemplateReference) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(&reference.org)
            .push(&reference.repo)
            .push("archive")
            .push(&format!("{}.zip", reference.tag_or_head()));
        Ok(url)
    }

    /// Retrieve the archive for a resolved reference
    pub async fn fetch(
        &self,
        reference: &TemplateReference,
    ) -> std::result::Result<TemplateArchive, FetchError> {
        let bytes = match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = Self::archive_url(base_url, reference)?;
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch template archive from {}", url))?;

                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(FetchError::NotFound {
                        reference: reference.to_string(),
                    });
                }
                if !response.status().is_success() {
                    return Err(anyhow::anyhow!(
                        "Failed to fetch template '{}' from {}: HTTP {}",
                        reference,
                        url,
                        response.status()
                    )
                    .into());
                }

                response
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to download {}", url))?
                    .to_vec()
            }
            TemplateSource::Local(path) => {
                let repo_dir = path.join(&reference.org).join(&reference.repo);
                if !repo_dir.is_dir() {
                    return Err(FetchError::NotFound {
                        reference: reference.to_string(),
                    });
                }
                Self::build_local_zip(&repo_dir, &reference.repo)?
            }
        };

        Ok(TemplateArchive {
            reference: reference.clone(),
            bytes,
        })
    }

    /// Zip a local repository directory the way the remote host lays out archives
    pub fn build_local_zip(repo_dir: &Path, repo_name: &str) -> Result<Vec<u8>> {
        let prefix = format!("{}-local", repo_name);

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            zip.add_directory(format!("{}/", prefix), options)?;

            for entry in WalkDir::new(repo_dir).min_depth(1).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk {}", repo_dir.display()))?;
                let relative = entry
                    .path()
                    .strip_prefix(repo_dir)
                    .with_context(|| format!("Unexpected path {}", entry.path().display()))?;
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let zip_path = format!("{}/{}", prefix, name);

                if entry.file_type().is_dir() {
                    zip.add_directory(format!("{}/", zip_path), options)?;
                } else if entry.file_type().is_file() {
                    let content = std::fs::read(entry.path())
                        .with_context(|| format!("Failed to read {}", entry.path().display()))?;
                    zip.start_file(zip_path, options)?;
                    zip.write_all(&content)?;
                }
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }
}
