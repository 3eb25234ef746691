// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release listing over the GitHub releases API.
//!
//! Fetches a fixed number of pages concurrently and joins them in page
//! order. History beyond `pages * per_page` releases is not listed.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use spsetup_core::SetupError;
use tracing::debug;

/// Releases endpoint for the Steampipe CLI repository.
pub const DEFAULT_API_URL: &str = "https://api.github.com/repos/turbot/steampipe/releases";

/// User agent GitHub requires on API requests.
pub const DEFAULT_USER_AGENT: &str = "setup-steampipe";

pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_PAGES: u32 = 3;

/// Source of available release tags.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// All known release tags, in listing order (not necessarily sorted).
    async fn list_tags(&self) -> Result<Vec<String>, SetupError>;
}

/// The subset of a GitHub release object we read.
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Paginated GitHub releases client.
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: reqwest::Client,
    api_url: String,
    per_page: u32,
    pages: u32,
}

impl GithubReleases {
    /// Creates a client for `api_url` with the default page size and count.
    pub fn new(api_url: impl Into<String>, user_agent: &str) -> Result<Self, SetupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| SetupError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            per_page: DEFAULT_PER_PAGE,
            pages: DEFAULT_PAGES,
        })
    }

    /// Overrides the page size and the number of pages fetched.
    pub fn with_pagination(mut self, per_page: u32, pages: u32) -> Self {
        self.per_page = per_page;
        self.pages = pages;
        self
    }

    fn page_url(&self, page: u32) -> Result<reqwest::Url, SetupError> {
        let mut url = reqwest::Url::parse(&self.api_url).map_err(|e| {
            SetupError::Config(format!("invalid release API url `{}`: {e}", self.api_url))
        })?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Fetches one page and returns its tags sorted lexically.
    async fn fetch_page(&self, page: u32) -> Result<Vec<String>, SetupError> {
        let url = self.page_url(page)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SetupError::Http {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, page, "release page received");
        if (400..=599).contains(&status.as_u16()) {
            return Err(SetupError::ReleaseListing {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let releases: Vec<Release> = response.json().await.map_err(|e| SetupError::Http {
            message: format!("failed to parse release listing from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut tags: Vec<String> = releases.into_iter().map(|r| r.tag_name).collect();
        tags.sort();
        Ok(tags)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn list_tags(&self) -> Result<Vec<String>, SetupError> {
        let pages = try_join_all((1..=self.pages).map(|page| self.fetch_page(page))).await?;
        let tags: Vec<String> = pages.into_iter().flatten().collect();
        debug!(count = tags.len(), "release listing fetched");
        Ok(tags)
    }
}

/// A fixed in-memory listing.
#[derive(Debug, Clone, Default)]
pub struct StaticReleases(pub Vec<String>);

#[async_trait]
impl ReleaseSource for StaticReleases {
    async fn list_tags(&self) -> Result<Vec<String>, SetupError> {
        Ok(self.0.clone())
    }
}
