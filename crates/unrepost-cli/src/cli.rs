//! CLI argument definitions.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use url::Url;

use unrepost::{Browser, RunConfig};

/// Fetch, snapshot, and prune a user's TikTok reposts.
#[derive(Parser, Debug)]
#[command(name = "unrepost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all reposts for a user and save them to a snapshot
    Fetch(crate::commands::fetch::FetchArgs),

    /// Show the reposts in a saved snapshot
    Show(crate::commands::show::ShowArgs),

    /// Delete reposts, keeping only the N most recent
    Delete(crate::commands::delete::DeleteArgs),
}

/// Session and rate-limit settings shared by the network commands.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// msToken value captured from a logged-in browser session
    #[arg(long, env = "UNREPOST_MS_TOKEN", hide_env_values = true)]
    pub ms_token: String,

    /// sid_tt session cookie value
    #[arg(long, env = "UNREPOST_SID_TT", hide_env_values = true, default_value = "")]
    pub sid_tt: String,

    /// Seconds to wait between requests
    #[arg(long, default_value_t = 1.0)]
    pub request_delay: f64,

    /// Browser engine for the signing service (chromium, firefox, webkit)
    #[arg(long, env = "UNREPOST_BROWSER", default_value = "chromium")]
    pub browser: String,

    /// Retry ceiling for empty pages that still claim more data
    #[arg(long, default_value_t = 50)]
    pub max_empty_retries: u32,

    /// URL of the local signing service
    #[arg(long, env = "UNREPOST_SIGN_SERVER", default_value = "http://127.0.0.1:8080/")]
    pub sign_server: String,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<RunConfig> {
        let sign_server = Url::parse(&self.sign_server).context("Invalid sign server URL")?;
        let browser: Browser = self
            .browser
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let mut config = RunConfig::new(&self.ms_token, &self.sid_tt, sign_server);
        config.request_delay = Duration::from_secs_f64(self.request_delay);
        config.browser = browser;
        config.max_empty_retries = self.max_empty_retries;
        Ok(config)
    }
}
