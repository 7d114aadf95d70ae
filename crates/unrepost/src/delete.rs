//! The deletion engine.
//!
//! Deletes everything past a keep count, one item at a time, and rewrites
//! the on-disk snapshot after every successful deletion so the persisted
//! mirror tracks the remote state to within one in-flight operation.
//!
//! Strictly sequential and deliberately slow: a fixed delay follows every
//! delete request. One request at a time is the rate limit.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::repost::Repost;
use crate::store::RepostStore;

/// One delete call. Implementations absorb their own failures into `false`;
/// the engine never sees an error, only success or not.
#[async_trait]
pub trait RepostDeleter: Send + Sync {
    async fn delete_repost(&self, video_id: &str) -> bool;
}

/// Split a collection into the kept prefix and the deletion-candidate
/// suffix. Order is reverse-chronological as delivered by the API, so "keep
/// the N most recent" is purely positional.
pub fn split_keep(reposts: &[Repost], keep_count: usize) -> (&[Repost], &[Repost]) {
    reposts.split_at(keep_count.min(reposts.len()))
}

/// Sequential delete-and-checkpoint engine.
pub struct DeletionEngine<'a, D, S> {
    deleter: &'a D,
    store: &'a S,
    delay: Duration,
}

impl<'a, D, S> DeletionEngine<'a, D, S>
where
    D: RepostDeleter,
    S: RepostStore,
{
    pub fn new(deleter: &'a D, store: &'a S, delay: Duration) -> Self {
        Self {
            deleter,
            store,
            delay,
        }
    }

    /// Delete every repost past `keep_count`, checkpointing the snapshot for
    /// `username` after each success. Returns the number of successful
    /// deletions.
    ///
    /// Items whose delete call fails, and items missing a video id, stay in
    /// the working collection and therefore in the snapshot. A later run
    /// will see them again.
    pub async fn run(&self, reposts: Vec<Repost>, keep_count: usize, username: &str) -> usize {
        let keep_count = keep_count.min(reposts.len());
        let (to_keep, to_delete) = split_keep(&reposts, keep_count);
        let total = to_delete.len();

        info!(keeping = to_keep.len(), deleting = total, "deletion plan");

        if total == 0 {
            info!("no reposts to delete");
            return 0;
        }

        let to_delete = to_delete.to_vec();
        let mut working = reposts;
        let mut success_count = 0usize;
        let started = Instant::now();

        for (i, repost) in to_delete.iter().enumerate() {
            let Some(video_id) = repost.video_id() else {
                // No id means no delete call: the item is left untouched in
                // both the working collection and the snapshot.
                warn!(item = i + 1, total, "repost has no video id, skipping");
                continue;
            };

            let remaining = total - i;
            let eta = estimate_remaining(started.elapsed(), i, remaining, self.delay);
            info!(
                item = i + 1,
                total,
                video_id = %video_id,
                remaining,
                eta = %format_duration(eta),
                "deleting repost"
            );

            if self.deleter.delete_repost(&video_id).await {
                // Failed and skipped items stay in place, so the item's
                // current index is its original one shifted left once per
                // prior success.
                let index = keep_count + i - success_count;
                working.remove(index);
                success_count += 1;

                if self.store.save(&working, username) {
                    debug!(remaining = working.len(), "snapshot checkpointed");
                } else {
                    warn!("snapshot checkpoint failed, on-disk mirror is stale");
                }
            } else {
                warn!(item = i + 1, total, "failed to delete repost");
            }

            // Unconditional: success and failure are rate-limited alike.
            sleep(self.delay).await;
        }

        let elapsed = started.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            success_count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            deleted = success_count,
            attempted = total,
            elapsed_secs = elapsed.as_secs_f64(),
            rate,
            "deletion complete"
        );

        success_count
    }
}

/// Rough ETA from the observed average request time; before any request has
/// completed, fall back to the configured delay.
fn estimate_remaining(
    elapsed: Duration,
    done: usize,
    remaining: usize,
    fallback: Duration,
) -> Duration {
    let avg = if done > 0 {
        elapsed / done as u32
    } else {
        fallback
    };
    avg * remaining as u32
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
