//! One user lookup, end to end: resolve the query, then load profile,
//! strength, and history for the chosen fencer in parallel.

use std::sync::atomic::{AtomicU64, Ordering};

use fencer_core::{HistoryReport, Profile, SearchResult, StrengthReport};
use fencer_store::{Clock, KvStore, SystemClock, TtlCache};

use crate::client::FencingTrackerClient;
use crate::error::{ErrorCategory, ScraperError};
use crate::html::{parse_history_html, parse_profile_html, parse_strength_html};
use crate::pages::{get_history_page, get_profile_page, get_strength_page};
use crate::resolver::resolve;

/// Tag handed out when a lookup starts. Only the newest one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(u64);

/// Monotonic lookup counter used to drop responses that a newer lookup has
/// overtaken.
#[derive(Debug, Default)]
pub struct LookupSequence {
    latest: AtomicU64,
}

impl LookupSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new lookup; every earlier ticket becomes stale.
    pub fn begin(&self) -> LookupTicket {
        LookupTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn current(&self) -> LookupTicket {
        LookupTicket(self.latest.load(Ordering::SeqCst))
    }

    #[must_use]
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.current() == ticket
    }
}

/// Everything shown for one fencer. Sections that failed to load hold
/// defaults, and `warnings` says which.
#[derive(Debug, Clone, PartialEq)]
pub struct FencerView {
    pub result: SearchResult,
    pub profile: Profile,
    pub strength: StrengthReport,
    pub history: HistoryReport,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The site knows no such fencer.
    NoResults,
    /// Every search attempt errored.
    Failed {
        message: String,
        category: ErrorCategory,
    },
    /// Several fencers matched; pick one and call [`Lookup::load_fencer`].
    Candidates(Vec<SearchResult>),
    Fencer(Box<FencerView>),
    /// A newer lookup started while this one was in flight.
    Stale,
}

pub struct Lookup<S, C = SystemClock> {
    client: FencingTrackerClient,
    cache: TtlCache<S, C>,
    sequence: LookupSequence,
}

impl<S: KvStore, C: Clock> Lookup<S, C> {
    pub fn new(client: FencingTrackerClient, cache: TtlCache<S, C>) -> Self {
        Self {
            client,
            cache,
            sequence: LookupSequence::new(),
        }
    }

    pub fn client(&self) -> &FencingTrackerClient {
        &self.client
    }

    pub fn cache(&self) -> &TtlCache<S, C> {
        &self.cache
    }

    pub fn sequence(&self) -> &LookupSequence {
        &self.sequence
    }

    /// Shorthand for `self.sequence().begin()`.
    pub fn begin(&self) -> LookupTicket {
        self.sequence.begin()
    }

    /// Runs a lookup for `query`. A single match is loaded straight away.
    pub async fn run(&self, query: &str) -> LookupOutcome {
        let ticket = self.sequence.begin();

        match self.cache.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "purged expired cache entries before lookup"),
            Err(e) => tracing::warn!(error = %e, "cache purge failed"),
        }

        let resolution = resolve(&self.client, &self.cache, query).await;
        if !self.sequence.is_current(ticket) {
            tracing::debug!(query, "search finished after a newer lookup; discarding");
            return LookupOutcome::Stale;
        }

        let all_failed = resolution.all_failed();
        let mut results = resolution.results;
        match results.len() {
            0 => match resolution.last_error.filter(|_| all_failed) {
                Some(err) => failed(&err),
                None => LookupOutcome::NoResults,
            },
            1 => {
                let result = results.remove(0);
                self.load_fencer(&result, ticket).await
            }
            _ => LookupOutcome::Candidates(results),
        }
    }

    /// Loads profile, strength, and history for `result` concurrently. A
    /// section that fails is replaced by its default and noted in
    /// [`FencerView::warnings`]; the others are unaffected.
    pub async fn load_fencer(&self, result: &SearchResult, ticket: LookupTicket) -> LookupOutcome {
        let (profile, strength, history) = tokio::join!(
            get_profile_page(
                &self.client,
                &self.cache,
                &result.id,
                &result.slug,
                Some(result.name.as_str()),
            ),
            get_strength_page(&self.client, &self.cache, &result.id, &result.slug),
            get_history_page(&self.client, &self.cache, &result.id, &result.slug),
        );

        if !self.sequence.is_current(ticket) {
            tracing::debug!(id = %result.id, "fencer loaded after a newer lookup; discarding");
            return LookupOutcome::Stale;
        }

        let mut warnings = Vec::new();
        let profile = match profile {
            Ok(page) => parse_profile_html(&page.html, &page.id, &page.slug),
            Err(e) => {
                warnings.push(section_warning("profile", &result.id, &e));
                Profile::fallback(result)
            }
        };
        let strength = match strength {
            Ok(page) => parse_strength_html(&page.html),
            Err(e) => {
                warnings.push(section_warning("strength", &result.id, &e));
                StrengthReport::default()
            }
        };
        let history = match history {
            Ok(page) => parse_history_html(&page.html),
            Err(e) => {
                warnings.push(section_warning("history", &result.id, &e));
                HistoryReport::default()
            }
        };

        LookupOutcome::Fencer(Box::new(FencerView {
            result: result.clone(),
            profile,
            strength,
            history,
            warnings,
        }))
    }
}

fn failed(err: &ScraperError) -> LookupOutcome {
    LookupOutcome::Failed {
        message: err.user_message().to_owned(),
        category: err.category(),
    }
}

fn section_warning(section: &str, id: &str, err: &ScraperError) -> String {
    tracing::warn!(section, id, error = %err, "fencer section unavailable");
    format!("{section} unavailable: {}", err.user_message())
}
