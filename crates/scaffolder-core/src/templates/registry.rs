//! Official template listing from the remote registry
//!
//! The registry answers with a JSON list of repositories. For interactive
//! selection the listing falls back to the last cached response, then to a
//! hardcoded list, so the picker works offline.

use crate::config::ListingCache;
use crate::product::ProductConfig;
use crate::report::Notice;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Registry requests give up after this long
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// Value of the choice that asks for a free-form reference
pub const CUSTOM_TEMPLATE_VALUE: &str = "custom";

/// One repository as returned by the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoListing {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// A template offered in the interactive picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateChoice {
    /// Reference passed on to resolution (`org/repo`)
    pub value: String,
    pub title: String,
    pub description: String,
}

impl TemplateChoice {
    pub fn new(value: &str, title: &str, description: &str) -> Self {
        Self {
            value: value.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn custom() -> Self {
        Self::new(CUSTOM_TEMPLATE_VALUE, "Custom", "Use your own template")
    }

    pub fn is_custom(&self) -> bool {
        self.value == CUSTOM_TEMPLATE_VALUE
    }
}

/// Where a set of choices came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    Registry,
    Cache,
    Fallback,
}

/// Picker choices plus anything worth telling the user about them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceListing {
    pub choices: Vec<TemplateChoice>,
    pub source: ChoiceSource,
    pub notices: Vec<Notice>,
}

/// Drop archived repositories
pub fn active_repos(repos: Vec<RepoListing>) -> Vec<RepoListing> {
    repos.into_iter().filter(|r| !r.archived).collect()
}

/// Turn registry entries into picker choices
pub fn normalize_listing(repos: Vec<RepoListing>) -> Vec<TemplateChoice> {
    active_repos(repos)
        .into_iter()
        .map(|r| TemplateChoice {
            value: r.full_name,
            title: r.name,
            description: r.description.unwrap_or_default(),
        })
        .collect()
}

pub struct TemplateRegistry {
    url: Url,
    client: reqwest::Client,
    cache: Option<ListingCache>,
    fallback: Vec<TemplateChoice>,
}

impl TemplateRegistry {
    pub fn new(
        url: Url,
        user_agent: &str,
        cache: Option<ListingCache>,
        fallback: Vec<TemplateChoice>,
    ) -> Self {
        Self {
            url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(REGISTRY_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache,
            fallback,
        }
    }

    /// Create a registry from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .unwrap_or_else(|_| config.default_registry_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Ok(Self::new(
            url,
            config.user_agent(),
            ListingCache::in_home(config.cache_file_name()),
            config.fallback_templates(),
        ))
    }

    async fn fetch_raw(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template listing from {}", self.url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch template listing from {}: HTTP {}",
                self.url,
                response.status()
            );
        }

        response.text().await.context("Failed to read template listing")
    }

    fn parse(raw: &str) -> Result<Vec<RepoListing>> {
        serde_json::from_str(raw).context("Failed to parse template listing")
    }

    /// Non-archived official templates, straight from the network
    pub async fn list_official(&self) -> Result<Vec<RepoListing>> {
        let raw = self.fetch_raw().await?;
        Ok(active_repos(Self::parse(&raw)?))
    }

    /// Choices for the picker, with the custom choice appended
    ///
    /// Tries the network (refreshing the cache), then the cache, then the
    /// fallback list. Never fails.
    pub async fn choices(&self) -> ChoiceListing {
        let mut notices = Vec::new();
        let (mut choices, source) = match self.fetch_raw().await {
            Ok(raw) => match Self::parse(&raw) {
                Ok(repos) => {
                    notices.extend(self.refresh_cache(&raw).await);
                    (normalize_listing(repos), ChoiceSource::Registry)
                }
                Err(_) => self.cached_or_fallback().await,
            },
            Err(_) => self.cached_or_fallback().await,
        };

        choices.push(TemplateChoice::custom());
        ChoiceListing {
            choices,
            source,
            notices,
        }
    }

    /// Store a fresh listing; a failure becomes a warning
    async fn refresh_cache(&self, raw: &str) -> Option<Notice> {
        let cache = self.cache.as_ref()?;
        cache
            .write(raw)
            .await
            .err()
            .map(|e| Notice::warning(format!("Failed to update template cache: {:#}", e)))
    }

    async fn cached_or_fallback(&self) -> (Vec<TemplateChoice>, ChoiceSource) {
        if let Some(cache) = &self.cache {
            if let Ok(repos) = cache.read().await.and_then(|raw| Self::parse(&raw)) {
                return (normalize_listing(repos), ChoiceSource::Cache);
            }
        }
        (self.fallback.clone(), ChoiceSource::Fallback)
    }
}
