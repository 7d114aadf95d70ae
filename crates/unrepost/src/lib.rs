//! unrepost - TikTok repost fetch / snapshot / cleanup library.
//!
//! Drives the platform's private web API through an external signing layer
//! to list a user's reposts to completion, mirror them to an on-disk
//! snapshot, and delete everything past a keep count while checkpointing the
//! snapshot after every successful deletion.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use unrepost::{
//!     DeletionEngine, JsonSnapshotStore, RepostCollector, RetryPolicy, RunConfig, SignServer,
//!     TikTokClient,
//! };
//!
//! # async fn example() -> Result<(), unrepost::Error> {
//! let config = RunConfig::new("ms-token", "sid-tt", "http://127.0.0.1:8080".parse().unwrap());
//! let driver = Arc::new(SignServer::new(config.sign_server.clone()));
//! let client = TikTokClient::connect(config.clone(), driver, "somebody").await?;
//!
//! let sec_uid = client.resolve_user("somebody").await?;
//! let collector = RepostCollector::new(&client, RetryPolicy::from_config(&config));
//! let reposts = collector.collect(&sec_uid).await;
//!
//! let store = JsonSnapshotStore::new(".");
//! let engine = DeletionEngine::new(&client, &store, config.request_delay);
//! let deleted = engine.run(reposts, 100, "somebody").await;
//! println!("deleted {deleted} reposts");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod collect;
pub mod config;
pub mod delete;
pub mod error;
pub mod repost;
pub mod session;
pub mod store;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::TikTokClient;
pub use collect::{decide, Page, PageDecision, PageFetcher, RepostCollector, RetryPolicy};
pub use config::{Browser, RunConfig};
pub use delete::{split_keep, DeletionEngine, RepostDeleter};
pub use error::Error;
pub use repost::Repost;
pub use session::{Session, SessionDriver, SignServer};
pub use store::{JsonSnapshotStore, RepostStore};
pub use types::{Cursor, SecUid};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
