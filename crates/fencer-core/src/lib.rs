pub mod app_config;
pub mod config;
pub mod names;
pub mod records;
pub mod weapon;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use names::{
    build_slug_from_name, build_structured_variants, create_slug, normalize_query, parse_slug,
    parse_structured_external_name, NameQuery, StructuredName, Suffix,
};
pub use records::{
    approx_age, profile_url, HistoryReport, Profile, SearchResult, StrengthReport, TrackedFencer,
    WeaponStrength,
};
pub use weapon::{
    normalize_weapon, parse_strength_range, parse_strength_value, BoutKind, StrengthRange,
    StrengthScore, StrengthValue, Weapon,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
