use fencer_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("server error {status} from {url}")]
    ServerError { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpError { status: u16, url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse grouping used for the one-line message shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    RateLimit,
    Generic,
}

impl ScraperError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                ErrorCategory::Network
            }
            _ => ErrorCategory::Generic,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Unable to reach fencingtracker.com. Please check your connection and try again."
            }
            ErrorCategory::RateLimit => "Too many requests. Please wait a moment and try again.",
            ErrorCategory::Generic => "An error occurred while searching. Please try again.",
        }
    }

    /// True for a 404, whether it came back as a status or inside a
    /// transport error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Http(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
