//! Wire shapes for the search endpoint and the cached page records.

use std::fmt;
use std::sync::LazyLock;

use fencer_core::SearchResult;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const UNKNOWN_CLUB: &str = "Unknown Club";
const DEFAULT_COUNTRY: &str = "USA";

/// Ids arrive as numbers or strings depending on the record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(serde_json::Number),
    Text(String),
}

impl IdValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => n.as_u64() == Some(0),
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// One element of the `POST /search` response array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchItem {
    #[serde(default)]
    pub usfa_id: Option<IdValue>,
    #[serde(default)]
    pub id: Option<IdValue>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl RawSearchItem {
    /// Maps to a [`SearchResult`], or `None` when the item has no usable id.
    ///
    /// The site already returns names in slug order and casing, so the slug
    /// only swaps whitespace runs for hyphens.
    #[must_use]
    pub fn into_result(self) -> Option<SearchResult> {
        let id = self
            .usfa_id
            .filter(|v| !v.is_blank())
            .or(self.id.filter(|v| !v.is_blank()))?
            .to_string();
        let slug = WHITESPACE_RE.replace_all(self.name.trim(), "-").into_owned();

        Some(SearchResult {
            id,
            slug,
            name: self.name,
            club: non_empty_or(self.club, UNKNOWN_CLUB),
            country: non_empty_or(self.country, DEFAULT_COUNTRY),
        })
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
}

/// Cached profile page. Keeps the slug that actually worked, which may
/// differ from the one search returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub html: String,
    pub id: String,
    pub slug: String,
}

/// Cached strength or history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlPage {
    pub html: String,
}
