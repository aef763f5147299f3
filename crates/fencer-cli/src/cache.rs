//! `cache` command handlers.

use clap::Subcommand;
use fencer_core::AppConfig;
use fencer_store::{SqliteStore, TtlCache};

/// Sub-commands available under `cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Delete expired cache entries
    Purge,
    /// Delete everything stored locally, tracked fencers included
    Clear,
    /// Count live and expired cache entries
    Stats,
}

/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub(crate) async fn run_cache_command(
    config: &AppConfig,
    store: SqliteStore,
    command: CacheCommands,
) -> anyhow::Result<()> {
    let cache = TtlCache::new(store);
    match command {
        CacheCommands::Purge => {
            let purged = cache.purge_expired().await?;
            println!("purged {purged} expired entries");
        }
        CacheCommands::Clear => {
            cache.clear().await?;
            println!("cleared {}", config.cache_path.display());
        }
        CacheCommands::Stats => {
            let stats = cache.stats().await?;
            println!("active:  {}", stats.active);
            println!("expired: {}", stats.expired);
            println!("total:   {}", stats.total);
        }
    }
    Ok(())
}
