//! `lookup`, `variants`, and `slug` command handlers.

use std::time::Duration;

use anyhow::bail;
use chrono::{Datelike, Utc};
use fencer_core::{build_slug_from_name, create_slug, normalize_query, AppConfig};
use fencer_scraper::{FencerView, FencingTrackerClient, Lookup, LookupOutcome, ScraperConfig};
use fencer_store::{SqliteStore, TrackedFencers, TtlCache};

use crate::display;

pub(crate) fn build_lookup(
    config: &AppConfig,
    store: SqliteStore,
) -> anyhow::Result<Lookup<SqliteStore>> {
    let client = FencingTrackerClient::new(&ScraperConfig::from_app_config(config))?;
    let cache =
        TtlCache::new(store).with_default_ttl(Duration::from_secs(config.cache_ttl_secs));
    Ok(Lookup::new(client, cache))
}

/// Runs a lookup and narrows it to one fencer, loading the `pick`-th
/// candidate when several match. Prints and returns `None` for outcomes
/// that do not end in a single fencer.
///
/// # Errors
///
/// Returns an error if every search attempt failed or `pick` is out of range.
pub(crate) async fn find_fencer(
    lookup: &Lookup<SqliteStore>,
    query: &str,
    pick: Option<usize>,
) -> anyhow::Result<Option<Box<FencerView>>> {
    let outcome = match (lookup.run(query).await, pick) {
        (LookupOutcome::Candidates(candidates), Some(n)) => {
            let Some(choice) = n.checked_sub(1).and_then(|i| candidates.get(i)) else {
                bail!("--pick {n} is out of range (1-{})", candidates.len());
            };
            let ticket = lookup.begin();
            lookup.load_fencer(choice, ticket).await
        }
        (outcome, _) => outcome,
    };

    match outcome {
        LookupOutcome::Fencer(view) => Ok(Some(view)),
        LookupOutcome::NoResults => {
            println!("no fencers found for \"{query}\"");
            Ok(None)
        }
        LookupOutcome::Candidates(candidates) => {
            print!("{}", display::format_candidates(&candidates));
            println!("re-run with --pick N to choose one");
            Ok(None)
        }
        LookupOutcome::Failed { message, .. } => bail!(message),
        LookupOutcome::Stale => {
            tracing::debug!(query, "lookup superseded");
            Ok(None)
        }
    }
}

/// # Errors
///
/// Returns an error if the client cannot be built, the search fails
/// outright, or the tracked list cannot be read.
pub(crate) async fn run_lookup(
    config: &AppConfig,
    store: SqliteStore,
    query: &str,
    pick: Option<usize>,
) -> anyhow::Result<()> {
    let tracked = TrackedFencers::new(store.clone());
    let lookup = build_lookup(config, store)?;

    let Some(view) = find_fencer(&lookup, query, pick).await? else {
        return Ok(());
    };

    let is_tracked = tracked.contains(&view.profile.id).await?;
    print!(
        "{}",
        display::format_fencer(&view, &config.base_url, Utc::now().year(), is_tracked)
    );
    Ok(())
}

pub(crate) fn run_variants(name: &str) {
    print!("{}", display::format_variants(&normalize_query(name)));
}

pub(crate) fn run_slug(name: &str) {
    println!("slug:       {}", create_slug(name));
    println!("from name:  {}", build_slug_from_name(name));
}
