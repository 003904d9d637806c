//! Drives the extractor under a bounded retry policy.

use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};

use crate::store::{capture_timestamp, MergeStore};
use crate::types::ScrapeResult;

use super::fetch::ScrapeError;

/// Retry behaviour for one trigger tick.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts before the tick is abandoned.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            delay: Duration::from_secs(15),
        }
    }
}

/// How a tick ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A capture was merged into the workbook.
    Merged { period: String, records: usize },
    /// The page shape changed; wait for the next scheduled tick.
    Deferred,
    /// Retryable failures exhausted the attempt budget.
    Abandoned { attempts: u32 },
    /// The scrape succeeded but the workbook rewrite failed; that capture
    /// is lost.
    PersistFailed,
}

/// Owns the per-tick retry loop. Blocking errors are retried after a fixed
/// delay up to the policy's attempt budget; structural errors end the tick
/// immediately, on the assumption that the page layout changed and an
/// immediate retry cannot help.
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run one tick to completion. At most one merge happens per call, and
    /// extraction attempts are strictly sequential.
    pub fn run_once<F>(&self, mut extract: F, store: &MergeStore) -> TickOutcome
    where
        F: FnMut() -> Result<ScrapeResult, ScrapeError>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match extract() {
                Ok(result) => {
                    let timestamp = capture_timestamp(Local::now());
                    return match store.merge(&result, &timestamp) {
                        Ok(records) => {
                            info!(period = %result.period, records, attempts, "tick complete");
                            TickOutcome::Merged {
                                period: result.period,
                                records,
                            }
                        }
                        Err(e) => {
                            error!("failed to persist capture, dropping it: {e}");
                            TickOutcome::PersistFailed
                        }
                    };
                }
                Err(e) if e.is_retryable() => {
                    if attempts >= self.policy.max_attempts {
                        warn!("giving up after {attempts} attempts: {e}");
                        return TickOutcome::Abandoned { attempts };
                    }
                    match &e {
                        ScrapeError::Blocked(status) => {
                            warn!(status, "blocked by site, retrying after delay");
                        }
                        _ => warn!("network failure, retrying after delay: {e}"),
                    }
                    thread::sleep(self.policy.delay);
                }
                Err(e) => {
                    warn!("page no longer parseable, deferring to next tick: {e}");
                    return TickOutcome::Deferred;
                }
            }
        }
    }
}
