//! Show command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use unrepost::RepostStore;

use crate::commands::snapshot_store;
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// TikTok username (without the @)
    pub username: String,

    /// Directory for snapshots (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print the raw JSON of each repost instead of a summary line
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(args: ShowArgs) -> Result<()> {
    let store = snapshot_store(args.data_dir.as_ref())?;
    let reposts = store.load(&args.username);

    if reposts.is_empty() {
        output::warn(&format!(
            "No reposts found in {}. Run 'unrepost fetch {}' first.",
            store.path_for(&args.username).display(),
            args.username
        ));
        return Ok(());
    }

    output::field("Snapshot", &store.path_for(&args.username).display().to_string());
    output::field("Reposts", &reposts.len().to_string());
    println!();

    for (i, repost) in reposts.iter().enumerate() {
        if args.raw {
            println!("{}", serde_json::to_string_pretty(repost.as_value())?);
            continue;
        }

        let id = repost.video_id().unwrap_or_else(|| "<no id>".to_string());
        let author = repost.author().unwrap_or("<unknown>");
        let desc = repost.description().unwrap_or("");
        println!(
            "{:>5}  {}  {}  {}",
            (i + 1).to_string().dimmed(),
            id,
            format!("@{author}").cyan(),
            desc
        );
    }

    Ok(())
}
