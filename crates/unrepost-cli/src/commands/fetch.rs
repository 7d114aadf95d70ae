//! Fetch command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use unrepost::{RepostCollector, RetryPolicy, RepostStore, SignServer, TikTokClient};

use crate::cli::ConnectionArgs;
use crate::commands::snapshot_store;
use crate::output;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// TikTok username (without the @)
    pub username: String,

    /// Directory for snapshots (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn run(args: FetchArgs) -> Result<()> {
    let config = args.connection.to_config()?;
    let store = snapshot_store(args.data_dir.as_ref())?;

    output::field("Fetching reposts for", &format!("@{}", args.username));

    let driver = Arc::new(SignServer::new(config.sign_server.clone()));
    let client = TikTokClient::connect(config.clone(), driver, &args.username)
        .await
        .context("Failed to initialize API session")?;

    let sec_uid = client
        .resolve_user(&args.username)
        .await
        .with_context(|| format!("Could not resolve user @{}", args.username))?;
    output::success(&format!("Found user @{}", args.username));

    let collector = RepostCollector::new(&client, RetryPolicy::from_config(&config));
    let reposts = collector.collect(&sec_uid).await;

    if reposts.is_empty() {
        output::warn("No reposts were found");
        return Ok(());
    }

    if !store.save(&reposts, &args.username) {
        bail!(
            "Failed to save snapshot to {}",
            store.path_for(&args.username).display()
        );
    }

    output::success(&format!(
        "Saved {} reposts to {}",
        reposts.len(),
        store.path_for(&args.username).display()
    ));

    Ok(())
}
