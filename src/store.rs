//! Per-period history workbook and the merge that grows it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{LongRecord, MatchRow, ScoreType, ScrapeResult};

/// Column-label format for capture timestamps.
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";

/// Format a wall-clock instant as a workbook column label.
pub fn capture_timestamp(now: DateTime<Local>) -> String {
    now.format(CAPTURE_TIMESTAMP_FORMAT).to_string()
}

/// Failure to read or rewrite the workbook file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workbook io error: {0}")]
    Io(#[from] io::Error),
    #[error("workbook serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Recording the same timestamp twice would rewrite history.
    #[error("capture {timestamp} already recorded for period {period}")]
    DuplicateCapture { period: String, timestamp: String },
}

/// One row of a period table: a (team pair, score type) identity plus one
/// value slot per recorded capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub home_team: String,
    pub away_team: String,
    pub score_type: ScoreType,
    /// Parallel to [`PeriodTable::captures`]; `None` where this row was not
    /// on the page at that capture.
    pub values: Vec<Option<String>>,
}

impl TableRow {
    fn matches(&self, record: &LongRecord) -> bool {
        self.home_team == record.home_team
            && self.away_team == record.away_team
            && self.score_type == record.score_type
    }
}

/// History table for one betting period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTable {
    /// Capture timestamps in the order they were recorded.
    pub captures: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl PeriodTable {
    /// Overlay one capture onto the table.
    ///
    /// Existing captures are never touched: the new timestamp becomes one
    /// more column, and incoming records land on the row matching their
    /// (home, away, score_type) key. A key the table has not seen before
    /// gets a fresh row with empty slots for the older captures; a row the
    /// page no longer lists gets an empty slot for the new one.
    pub fn merge_capture(
        &mut self,
        period: &str,
        records: &[LongRecord],
        timestamp: &str,
    ) -> Result<(), StoreError> {
        if self.captures.iter().any(|c| c == timestamp) {
            return Err(StoreError::DuplicateCapture {
                period: period.to_string(),
                timestamp: timestamp.to_string(),
            });
        }

        self.captures.push(timestamp.to_string());
        let slot = self.captures.len() - 1;
        for row in &mut self.rows {
            row.values.push(None);
        }

        for record in records {
            match self.rows.iter_mut().find(|row| row.matches(record)) {
                Some(row) => row.values[slot] = Some(record.value.clone()),
                None => {
                    let mut values = vec![None; self.captures.len()];
                    values[slot] = Some(record.value.clone());
                    self.rows.push(TableRow {
                        home_team: record.home_team.clone(),
                        away_team: record.away_team.clone(),
                        score_type: record.score_type,
                        values,
                    });
                }
            }
        }

        Ok(())
    }
}

/// The whole persisted artifact: period id → history table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub periods: BTreeMap<String, PeriodTable>,
}

/// Expand match rows into long-format records, three per match, preserving
/// page order.
pub fn expand_rows(rows: &[MatchRow]) -> Vec<LongRecord> {
    let mut records = Vec::with_capacity(rows.len() * 3);
    for row in rows {
        for score_type in ScoreType::ALL {
            records.push(LongRecord {
                home_team: row.home_team.clone(),
                away_team: row.away_team.clone(),
                score_type,
                value: row.value(score_type).to_string(),
            });
        }
    }
    records
}

/// Owns the workbook file: reads, merges, and rewrites it as a unit.
pub struct MergeStore {
    path: PathBuf,
}

impl MergeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fold one capture into the workbook and rewrite it on disk.
    ///
    /// Returns the number of long-format records merged.
    pub fn merge(&self, result: &ScrapeResult, timestamp: &str) -> Result<usize, StoreError> {
        let mut workbook = self.load()?;

        let records = expand_rows(&result.rows);
        workbook
            .periods
            .entry(result.period.clone())
            .or_default()
            .merge_capture(&result.period, &records, timestamp)?;

        self.save(&workbook)?;
        info!(
            period = %result.period,
            records = records.len(),
            timestamp,
            "capture merged into workbook"
        );
        Ok(records.len())
    }

    /// Read the workbook, treating a missing file as empty.
    pub fn load(&self) -> Result<Workbook, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no workbook yet, starting empty");
                Ok(Workbook::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrite the whole workbook through a sibling temp file so an outside
    /// reader never observes a half-written store.
    fn save(&self, workbook: &Workbook) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(workbook)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
