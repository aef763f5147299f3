//! `tracked` command handlers.

use clap::Subcommand;
use fencer_core::{AppConfig, TrackedFencer};
use fencer_store::{SqliteStore, TrackedFencers};

use crate::display;
use crate::lookup::{build_lookup, find_fencer};

/// Sub-commands available under `tracked`.
#[derive(Debug, Subcommand)]
pub enum TrackedCommands {
    /// List tracked fencers
    List,
    /// Look a fencer up and start tracking them
    Add {
        #[arg(required = true)]
        query: Vec<String>,
        /// Track the N-th candidate (1-based) when several fencers match
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Stop tracking a fencer
    Remove {
        /// Fencer id as shown by `tracked list`
        id: String,
    },
}

/// # Errors
///
/// Returns an error if the store fails or, for `add`, the lookup fails.
pub(crate) async fn run_tracked_command(
    config: &AppConfig,
    store: SqliteStore,
    command: TrackedCommands,
) -> anyhow::Result<()> {
    let tracked = TrackedFencers::new(store.clone());
    match command {
        TrackedCommands::List => {
            let entries = tracked.list().await?;
            if entries.is_empty() {
                println!("no tracked fencers; add one with `tracked add <NAME>`");
            } else {
                print!("{}", display::format_tracked(entries));
            }
        }
        TrackedCommands::Add { query, pick } => {
            let lookup = build_lookup(config, store)?;
            let Some(view) = find_fencer(&lookup, &query.join(" "), pick).await? else {
                return Ok(());
            };
            let entry = TrackedFencer::from_lookup(&view.profile, &view.strength);
            println!("tracking {} ({})", entry.name, entry.id);
            tracked.upsert(entry).await?;
        }
        TrackedCommands::Remove { id } => {
            if tracked.remove(&id).await? {
                println!("stopped tracking {id}");
            } else {
                println!("{id} is not tracked");
            }
        }
    }
    Ok(())
}
