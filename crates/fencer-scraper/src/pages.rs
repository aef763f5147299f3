//! Cache-then-fetch for a fencer's profile, strength, and history pages.
//!
//! Cache failures never fail a page load: a broken read is a miss and a
//! broken write is logged and dropped.

use fencer_core::{build_slug_from_name, create_slug};
use fencer_store::{keys, Clock, KvStore, TtlCache};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{FencingTrackerClient, ResourceKind};
use crate::error::ScraperError;
use crate::types::{HtmlPage, ProfilePage};

pub(crate) async fn cached_get<T, S, C>(cache: &TtlCache<S, C>, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KvStore,
    C: Clock,
{
    match cache.get(key).await {
        Ok(Some(value)) => {
            tracing::debug!(key, "cache hit");
            Some(value)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "cache read failed; treating as miss");
            None
        }
    }
}

pub(crate) async fn cached_put<T, S, C>(cache: &TtlCache<S, C>, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KvStore,
    C: Clock,
{
    if let Err(e) = cache.set(key, value).await {
        tracing::warn!(key, error = %e, "cache write failed");
    }
}

/// Slug to try after the search slug 404s, if there is a different one.
fn regenerated_slug(name: &str, current: &str) -> Option<String> {
    [build_slug_from_name(name), create_slug(name)]
        .into_iter()
        .find(|candidate| !candidate.is_empty() && candidate != current)
}

/// Loads the profile page for `id`.
///
/// When the page 404s and `fallback_name` is given, one more fetch is made
/// with a slug rebuilt from the name; the cached record keeps that slug.
///
/// # Errors
///
/// Returns the fetch error when neither slug works.
pub async fn get_profile_page<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    id: &str,
    slug: &str,
    fallback_name: Option<&str>,
) -> Result<ProfilePage, ScraperError> {
    let key = keys::profile(id);
    if let Some(page) = cached_get::<ProfilePage, _, _>(cache, &key).await {
        return Ok(page);
    }

    let page = match client.fetch_page(ResourceKind::Profile, id, slug).await {
        Ok(html) => ProfilePage {
            html,
            id: id.to_owned(),
            slug: slug.to_owned(),
        },
        Err(err) if err.is_not_found() => {
            let Some(new_slug) = fallback_name.and_then(|name| regenerated_slug(name, slug)) else {
                return Err(err);
            };
            tracing::warn!(
                id,
                slug,
                new_slug = %new_slug,
                "profile not found; retrying with regenerated slug"
            );
            let html = client
                .fetch_page(ResourceKind::Profile, id, &new_slug)
                .await?;
            ProfilePage {
                html,
                id: id.to_owned(),
                slug: new_slug,
            }
        }
        Err(err) => return Err(err),
    };

    cached_put(cache, &key, &page).await;
    Ok(page)
}

async fn get_html_page<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    kind: ResourceKind,
    key: String,
    id: &str,
    slug: &str,
) -> Result<HtmlPage, ScraperError> {
    if let Some(page) = cached_get::<HtmlPage, _, _>(cache, &key).await {
        return Ok(page);
    }

    let page = HtmlPage {
        html: client.fetch_page(kind, id, slug).await?,
    };
    cached_put(cache, &key, &page).await;
    Ok(page)
}

/// # Errors
///
/// Returns the fetch error on a cache miss that cannot be filled.
pub async fn get_strength_page<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    id: &str,
    slug: &str,
) -> Result<HtmlPage, ScraperError> {
    get_html_page(client, cache, ResourceKind::Strength, keys::strength(id), id, slug).await
}

/// # Errors
///
/// Returns the fetch error on a cache miss that cannot be filled.
pub async fn get_history_page<S: KvStore, C: Clock>(
    client: &FencingTrackerClient,
    cache: &TtlCache<S, C>,
    id: &str,
    slug: &str,
) -> Result<HtmlPage, ScraperError> {
    get_html_page(client, cache, ResourceKind::History, keys::history(id), id, slug).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerated_slug_skips_the_failed_one() {
        assert_eq!(
            regenerated_slug("Kiefer, Lee", "Kiefer-Lee").as_deref(),
            Some("Lee-Kiefer")
        );
        assert_eq!(
            regenerated_slug("Lee Kiefer", "Lee-Kiefer").as_deref(),
            None
        );
        assert_eq!(regenerated_slug("", "x"), None);
    }
}
