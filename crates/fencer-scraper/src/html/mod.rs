//! Field extraction from fencing-tracker HTML pages.
//!
//! The extractors are pure: they take a parsed [`Dom`] and never touch the
//! cache or the network. Missing fields fall back to defaults instead of
//! failing.

mod dom;
mod history;
pub mod object_literal;
mod profile;
mod strength;

use fencer_core::{HistoryReport, Profile, StrengthReport};

pub use dom::{Dom, ScraperDom};
pub use history::parse_history;
pub use profile::parse_profile;
pub use strength::{extract_series, parse_strength};

#[must_use]
pub fn parse_profile_html(html: &str, id: &str, slug: &str) -> Profile {
    parse_profile(&ScraperDom::parse(html), id, slug)
}

#[must_use]
pub fn parse_strength_html(html: &str) -> StrengthReport {
    parse_strength(&ScraperDom::parse(html))
}

#[must_use]
pub fn parse_history_html(html: &str) -> HistoryReport {
    parse_history(&ScraperDom::parse(html))
}
