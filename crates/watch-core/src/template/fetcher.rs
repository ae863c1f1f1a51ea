//! Template file fetching from the remote repository
//!
//! Two modes: the template's own manifest comes back as parsed JSON; every
//! other file streams straight through the line substitution onto disk, so
//! there is no separate download-then-edit step.

use crate::manifest::Manifest;
use crate::product::ProductConfig;
use crate::substitute::{LineSink, Replacements};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use url::Url;

/// Fetches template files from a remote base URL.
pub struct TemplateFetcher {
    base_url: Url,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a fetcher with a custom user agent.
    pub fn new(base_url: Url, user_agent: &str) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config, honoring the product's
    /// template-URL environment override.
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::new(url, config.user_agent()))
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(&self, file_name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.base_url))?
            .pop_if_empty()
            .push(file_name);
        Ok(url)
    }

    /// Fetch the template's manifest (`package.json`) as parsed JSON.
    pub async fn fetch_manifest(&self) -> Result<Manifest> {
        let url = self.build_url("package.json")?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template manifest from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch template manifest from {}: HTTP {}",
                url,
                response.status()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse template manifest")
    }

    /// Download a template file into `dest`, applying `replacements` line by
    /// line while the body streams in. An empty body leaves `dest` untouched.
    pub async fn download_file(
        &self,
        file_name: &str,
        dest: &Path,
        replacements: &Replacements,
    ) -> Result<()> {
        let url = self.build_url(file_name)?;
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "unexpected response {}",
                status.canonical_reason().unwrap_or_else(|| status.as_str())
            );
        }

        let Some(first) = response.chunk().await? else {
            return Ok(());
        };

        let file = fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut sink = LineSink::new(file, replacements);
        sink.write_chunk(&first)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        while let Some(chunk) = response.chunk().await? {
            sink.write_chunk(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
        }
        sink.finish()
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        Ok(())
    }
}
