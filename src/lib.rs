//! Periodic capture of the zucai odds listing into a per-period history
//! workbook.
//!
//! The pipeline is a single thread of control: a wall-clock
//! [`schedule::Schedule`] fires one [`scrape::RetryController`] tick at
//! fixed minute offsets; the controller drives the [`scrape::Extractor`]
//! until a capture succeeds or the tick gives up, and hands each success to
//! the [`store::MergeStore`], which folds it into the on-disk workbook
//! without touching any earlier capture.

pub mod config;
pub mod logging;
pub mod schedule;
pub mod scrape;
pub mod store;
pub mod types;
