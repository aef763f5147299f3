//! HTTP client for the fencing-tracker site: the JSON search endpoint and
//! the three HTML pages per fencer.

use std::time::Duration;

use fencer_core::{profile_url, SearchResult};
use reqwest::{Client, StatusCode};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::retry::{retry, RetryPolicy};
use crate::types::{RawSearchItem, SearchRequest};

/// The HTML pages fetched for one fencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Profile,
    Strength,
    History,
}

impl ResourceKind {
    #[must_use]
    pub fn path_suffix(self) -> &'static str {
        match self {
            Self::Profile => "",
            Self::Strength => "/strength",
            Self::History => "/history",
        }
    }

    /// `{base}/p/{id}/{slug}` plus the page suffix.
    #[must_use]
    pub fn url(self, base_url: &str, id: &str, slug: &str) -> String {
        format!("{}{}", profile_url(base_url, id, slug), self.path_suffix())
    }
}

/// Maps a response status to the error taxonomy. 2xx is `Ok`.
fn check_status(status: StatusCode, url: &str) -> Result<(), ScraperError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ScraperError::RateLimited {
            url: url.to_owned(),
        });
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_owned(),
        });
    }
    if status.is_server_error() {
        return Err(ScraperError::ServerError {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    if !status.is_success() {
        return Err(ScraperError::HttpError {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(())
}

/// Fencing-tracker client. Every request goes through the configured
/// [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct FencingTrackerClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    search_limit: u32,
}

impl FencingTrackerClient {
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `config.base_url` is not an
    ///   absolute http(s) URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidBaseUrl {
                base_url,
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            retry: config.retry,
            search_limit: config.search_limit,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs one search query. An empty `Vec` means the site found nothing.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] / [`ScraperError::ServerError`] once retries are exhausted.
    /// - [`ScraperError::HttpError`] / [`ScraperError::NotFound`] for other non-2xx statuses.
    /// - [`ScraperError::Http`] on transport failure.
    /// - [`ScraperError::Deserialize`] if the body is not the expected JSON array.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ScraperError> {
        let url = format!("{}/search", self.base_url);
        let body = SearchRequest {
            query,
            limit: self.search_limit,
        };

        let client = &self.client;
        let (url, body) = (url.as_str(), &body);
        let items = retry(&self.retry, move || async move {
            let response = client.post(url).json(body).send().await?;
            check_status(response.status(), url)?;
            let text = response.text().await?;
            serde_json::from_str::<Vec<RawSearchItem>>(&text).map_err(|e| {
                ScraperError::Deserialize {
                    context: format!("search results for \"{query}\""),
                    source: e,
                }
            })
        })
        .await?;

        let total = items.len();
        let results: Vec<SearchResult> =
            items.into_iter().filter_map(RawSearchItem::into_result).collect();
        if results.len() < total {
            tracing::debug!(
                query,
                dropped = total - results.len(),
                "search items without an id were dropped"
            );
        }
        Ok(results)
    }

    /// Fetches a response body as text.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search`], minus deserialization.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScraperError> {
        let client = &self.client;
        retry(&self.retry, move || async move {
            let response = client.get(url).send().await?;
            check_status(response.status(), url)?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches one of a fencer's HTML pages.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_text`].
    pub async fn fetch_page(
        &self,
        kind: ResourceKind,
        id: &str,
        slug: &str,
    ) -> Result<String, ScraperError> {
        let url = kind.url(&self.base_url, id, slug);
        tracing::debug!(url = %url, ?kind, "fetching page");
        self.fetch_text(&url).await
    }
}
