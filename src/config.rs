//! Runtime configuration, fixed at startup.

use std::path::PathBuf;

use crate::schedule::Schedule;
use crate::scrape::{RetryPolicy, LISTING_URL};

/// Everything the process needs. There is no reload: the binary reads path
/// overrides once at startup and the rest are compile-time defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing page to scrape.
    pub url: String,
    /// Workbook file, created on the first successful capture.
    pub workbook_path: PathBuf,
    /// Append log file.
    pub log_path: PathBuf,
    /// Keep the log file newest-first after every tick.
    pub newest_first_log: bool,
    pub schedule: Schedule,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: LISTING_URL.to_string(),
            workbook_path: PathBuf::from("data.json"),
            log_path: PathBuf::from("scraping_log.txt"),
            newest_first_log: false,
            schedule: Schedule::default(),
            retry: RetryPolicy::default(),
        }
    }
}
