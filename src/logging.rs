//! Log sink: console echo plus an append-mode file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: a console layer plus an ANSI-free layer
/// appending to `log_path`. `RUST_LOG` overrides the default `info` level.
pub fn init(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

/// Rewrite the log file newest-first.
///
/// Cosmetic reordering for people who tail the file in an editor. Runs as
/// its own pass after a tick completes, never inside the write path.
pub fn reverse_log_file(path: &Path) -> io::Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if text.is_empty() {
        return Ok(());
    }

    let mut lines: Vec<&str> = text.lines().collect();
    lines.reverse();
    fs::write(path, lines.join("\n") + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "first\nsecond\nthird\n").unwrap();

        reverse_log_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "third\nsecond\nfirst\n");

        // Reversing twice restores the original order.
        reverse_log_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\nthird\n");
    }

    #[test]
    fn test_reverse_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert!(reverse_log_file(&dir.path().join("absent.txt")).is_ok());
    }

    #[test]
    fn test_reverse_empty_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "").unwrap();

        reverse_log_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
