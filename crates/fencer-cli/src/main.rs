mod cache;
mod display;
mod lookup;
mod tracked;

use clap::{Parser, Subcommand};
use fencer_store::SqliteStore;
use tracing_subscriber::EnvFilter;

use crate::cache::CacheCommands;
use crate::tracked::TrackedCommands;

#[derive(Debug, Parser)]
#[command(name = "fencer")]
#[command(about = "Look up fencer strength and records on fencingtracker.com")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a fencer by name
    Lookup {
        /// Name in any common layout, e.g. "Kiefer, Lee" or "KIEFER Lee"
        #[arg(required = true)]
        query: Vec<String>,
        /// Load the N-th candidate (1-based) when several fencers match
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Show the search variants generated for a name
    Variants {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Show the profile slugs generated for a name
    Slug {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Inspect or clean the local cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Manage tracked fencers
    Tracked {
        #[command(subcommand)]
        command: TrackedCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = fencer_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Variants { name } => lookup::run_variants(&name.join(" ")),
        Commands::Slug { name } => lookup::run_slug(&name.join(" ")),
        Commands::Lookup { query, pick } => {
            let store = SqliteStore::open(&config.cache_path).await?;
            lookup::run_lookup(&config, store, &query.join(" "), pick).await?;
        }
        Commands::Cache { command } => {
            let store = SqliteStore::open(&config.cache_path).await?;
            cache::run_cache_command(&config, store, command).await?;
        }
        Commands::Tracked { command } => {
            let store = SqliteStore::open(&config.cache_path).await?;
            tracked::run_tracked_command(&config, store, command).await?;
        }
    }

    Ok(())
}
