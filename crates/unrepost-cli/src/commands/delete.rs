//! Delete command implementation.
//!
//! Loads the snapshot, confirms the destructive action, then runs the
//! deletion engine. The snapshot on disk is rewritten after every successful
//! deletion, so re-running after an interrupt picks up where it left off.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use unrepost::{DeletionEngine, RepostStore, SignServer, TikTokClient};

use crate::cli::ConnectionArgs;
use crate::commands::snapshot_store;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// TikTok username (without the @)
    pub username: String,

    /// Number of most recent reposts to keep
    #[arg(long)]
    pub keep: usize,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Directory for snapshots (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let config = args.connection.to_config()?;
    let store = snapshot_store(args.data_dir.as_ref())?;

    let reposts = store.load(&args.username);
    if reposts.is_empty() {
        bail!(
            "No reposts found in {}. Run 'unrepost fetch {}' first.",
            store.path_for(&args.username).display(),
            args.username
        );
    }

    output::field("Reposts in snapshot", &reposts.len().to_string());

    if args.keep > reposts.len() {
        output::warn(&format!(
            "Keep count ({}) exceeds the number of reposts ({}); nothing to delete",
            args.keep,
            reposts.len()
        ));
        return Ok(());
    }

    let doomed = reposts.len() - args.keep;
    if !args.force && !confirm(doomed, &args.username)? {
        output::warn("Deletion cancelled");
        return Ok(());
    }

    let driver = Arc::new(SignServer::new(config.sign_server.clone()));
    let client = TikTokClient::connect(config.clone(), driver, &args.username)
        .await
        .context("Failed to initialize API session")?;

    let engine = DeletionEngine::new(&client, &store, config.request_delay);
    let deleted = engine.run(reposts, args.keep, &args.username).await;

    if deleted > 0 {
        output::success(&format!("Deleted {deleted} of {doomed} reposts"));
    } else {
        output::warn("No reposts were deleted");
    }

    Ok(())
}

/// This cannot be undone on the remote side; require an explicit yes.
fn confirm(count: usize, username: &str) -> Result<bool> {
    eprint!(
        "This will permanently delete {count} reposts for @{username}. Continue? [y/N] "
    );
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;

    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
