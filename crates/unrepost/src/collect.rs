//! The pagination engine.
//!
//! Walks the repost list cursor by cursor until the server reports no more
//! data. The one wrinkle is an observed server anomaly: a page can come back
//! empty while `hasMore` is still true. That is not end-of-data; the engine
//! retries the same cursor with linearly increasing waits, up to a ceiling,
//! then abandons the cursor and advances to whatever the server offered as
//! the next one.
//!
//! The continue/retry/skip/finish choice is a pure function ([`decide`]) over
//! explicit state, so the policy is testable without a network or a clock;
//! [`RepostCollector`] is the effects shell that performs fetches and sleeps.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::repost::Repost;
use crate::types::{Cursor, SecUid};

/// One normalized page of results.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Repost>,
    pub next_cursor: Cursor,
    pub has_more: bool,
}

impl Page {
    /// An end-of-data page keeping the caller's cursor. Fetch failures are
    /// folded into this shape.
    pub fn end(cursor: Cursor) -> Self {
        Self {
            items: Vec::new(),
            next_cursor: cursor,
            has_more: false,
        }
    }
}

/// One "list reposts" call for a given cursor. Implementations absorb their
/// own failures into an end-of-data [`Page`]; retrying is the collector's
/// job.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, sec_uid: &SecUid, cursor: &Cursor) -> Page;
}

/// Retry policy for the empty-but-more anomaly.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base inter-request delay; also the unit of the retry backoff.
    pub base_delay: Duration,
    /// Number of retries of a stuck cursor before skipping past it.
    pub max_empty_retries: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            base_delay: config.request_delay,
            max_empty_retries: config.max_empty_retries,
        }
    }
}

/// What to do after one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageDecision {
    /// Server reported no more data: append what came and stop.
    Finish,
    /// Normal page: append items, move to the next cursor, reset retries.
    Advance { sleep: Duration },
    /// Empty-but-more anomaly, under the ceiling: retry the same cursor
    /// after a linearly increased wait.
    RetryEmpty { sleep: Duration },
    /// Ceiling reached: give up on this cursor, adopt the server's next
    /// cursor, reset retries, continue as a normal advance.
    SkipCursor { sleep: Duration },
}

/// Pure decision over one fetch result.
///
/// `retry_count` is the number of consecutive empty-but-more results seen
/// for the current cursor, counting this one. The `n`th retry waits
/// `base_delay * (1 + n)`, strictly increasing; once the count exceeds the
/// ceiling the cursor is skipped instead.
pub fn decide(
    items: usize,
    has_more: bool,
    retry_count: u32,
    policy: &RetryPolicy,
) -> PageDecision {
    if items == 0 && has_more {
        if retry_count <= policy.max_empty_retries {
            return PageDecision::RetryEmpty {
                sleep: policy.base_delay * (1 + retry_count),
            };
        }
        return PageDecision::SkipCursor {
            sleep: policy.base_delay,
        };
    }

    if has_more {
        PageDecision::Advance {
            sleep: policy.base_delay,
        }
    } else {
        PageDecision::Finish
    }
}

/// Drives a [`PageFetcher`] across cursors to completion.
pub struct RepostCollector<'a, F> {
    fetcher: &'a F,
    policy: RetryPolicy,
}

impl<'a, F: PageFetcher> RepostCollector<'a, F> {
    pub fn new(fetcher: &'a F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Fetch every page of reposts for the given user, in cursor order.
    ///
    /// Strictly sequential: one fetch in flight at a time, with the
    /// policy's delay between requests. Cursors are stateful server-side and
    /// do not tolerate interleaving.
    pub async fn collect(&self, sec_uid: &SecUid) -> Vec<Repost> {
        let mut all = Vec::new();
        let mut cursor = Cursor::start();
        let mut retry_count = 0u32;
        let mut page = 1u32;
        let started = Instant::now();

        loop {
            info!(page, cursor = %cursor, "fetching repost page");
            if retry_count > 0 {
                warn!(
                    retry = retry_count,
                    max = self.policy.max_empty_retries,
                    cursor = %cursor,
                    "retrying empty page"
                );
            }

            let fetched = self.fetcher.fetch_page(sec_uid, &cursor).await;
            if fetched.items.is_empty() && fetched.has_more {
                retry_count += 1;
            }

            match decide(
                fetched.items.len(),
                fetched.has_more,
                retry_count,
                &self.policy,
            ) {
                PageDecision::Finish => {
                    all.extend(fetched.items);
                    break;
                }
                PageDecision::Advance { sleep: wait } => {
                    all.extend(fetched.items);
                    info!(total = all.len(), "more pages available");
                    cursor = fetched.next_cursor;
                    retry_count = 0;
                    page += 1;
                    sleep(wait).await;
                }
                PageDecision::RetryEmpty { sleep: wait } => {
                    warn!(
                        cursor = %cursor,
                        wait_secs = wait.as_secs_f64(),
                        "empty page but more data available, retrying same cursor"
                    );
                    sleep(wait).await;
                }
                PageDecision::SkipCursor { sleep: wait } => {
                    warn!(
                        cursor = %cursor,
                        next_cursor = %fetched.next_cursor,
                        "retry ceiling reached, moving to next cursor"
                    );
                    cursor = fetched.next_cursor;
                    retry_count = 0;
                    page += 1;
                    sleep(wait).await;
                }
            }
        }

        let elapsed = started.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            all.len() as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            total = all.len(),
            pages = page,
            elapsed_secs = elapsed.as_secs_f64(),
            rate,
            "repost collection complete"
        );

        all
    }
}
