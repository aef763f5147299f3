pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod lookup;
pub mod pages;
pub mod resolver;
pub mod retry;
pub mod types;

pub use client::{FencingTrackerClient, ResourceKind};
pub use config::ScraperConfig;
pub use error::{ErrorCategory, ScraperError};
pub use html::{parse_history_html, parse_profile_html, parse_strength_html};
pub use lookup::{FencerView, Lookup, LookupOutcome, LookupSequence, LookupTicket};
pub use pages::{get_history_page, get_profile_page, get_strength_page};
pub use resolver::{resolve, search_fencers, Resolution};
pub use retry::{is_retriable, RetryPolicy};
pub use types::{HtmlPage, ProfilePage, RawSearchItem};
