//! Search resolution: walk the query's name variants through the cache and
//! the search endpoint until one of them returns fencers.

use fencer_core::{normalize_query, SearchResult};
use fencer_store::{keys, Clock, KvStore, TtlCache};

use crate::client::FencingTrackerClient;
use crate::error::ScraperError;
use crate::pages::{cached_get, cached_put};

/// Outcome of [`resolve`]. Empty `results` with no failures means the site
/// simply has no such fencer.
#[derive(Debug, Default)]
pub struct Resolution {
    pub results: Vec<SearchResult>,
    /// Variants that reached the cache or the network.
    pub attempted: usize,
    /// Variants whose search request failed.
    pub failures: usize,
    pub last_error: Option<ScraperError>,
}

impl Resolution {
    /// Nothing found, and every variant tried ended in an error.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.results.is_empty() && self.attempted > 0 && self.failures == self.attempted
    }
}

/// Tries each variant of `query` in order and returns the first non-empty
/// result set.
///
/// Only non-empty results are cached, so a variant that came back empty is
/// asked again on the next call.
pub async fn resolve<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    query: &str,
) -> Resolution {
    let name_query = normalize_query(query);
    let mut resolution = Resolution::default();

    for variant in name_query.variants.iter().map(String::as_str) {
        resolution.attempted += 1;
        let key = keys::search(variant);

        if let Some(results) = cached_get::<Vec<SearchResult>, _, _>(cache, &key).await {
            if !results.is_empty() {
                resolution.results = results;
                return resolution;
            }
        }

        match client.search(variant).await {
            Ok(results) if !results.is_empty() => {
                tracing::debug!(variant, count = results.len(), "search variant matched");
                cached_put(cache, &key, &results).await;
                resolution.results = results;
                return resolution;
            }
            Ok(_) => {
                tracing::debug!(variant, "search variant returned no results");
            }
            Err(e) => {
                tracing::warn!(variant, error = %e, "search variant failed");
                resolution.failures += 1;
                resolution.last_error = Some(e);
            }
        }
    }

    tracing::info!(
        query = %name_query.normalized,
        variants = resolution.attempted,
        failures = resolution.failures,
        "no results for any search variant"
    );
    resolution
}

/// [`resolve`], keeping only the results. Never fails: "no such fencer" is
/// an empty `Vec`.
pub async fn search_fencers<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    query: &str,
) -> Vec<SearchResult> {
    resolve(client, cache, query).await.results
}
