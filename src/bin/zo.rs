use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use zucai_odds::config::Config;
use zucai_odds::logging;
use zucai_odds::scrape::{Extractor, RetryController};
use zucai_odds::store::MergeStore;

#[derive(Parser)]
#[command(
    name = "zo",
    about = "Zucai odds tracker -- periodic capture of the listing page into a history workbook"
)]
struct Cli {
    /// Workbook file (created on first successful capture)
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Keep the log file newest-first after each tick
    #[arg(long)]
    newest_first_log: bool,

    /// Run a single tick immediately instead of the hourly schedule
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::default();
    if let Some(path) = cli.workbook {
        config.workbook_path = path;
    }
    if let Some(path) = cli.log {
        config.log_path = path;
    }
    if cli.newest_first_log {
        config.newest_first_log = true;
    }

    logging::init(&config.log_path)?;

    let extractor = Extractor::new(config.url.clone());
    let store = MergeStore::new(&config.workbook_path);
    let controller = RetryController::new(config.retry.clone());

    let run_tick = || {
        controller.run_once(|| extractor.extract(), &store);
        if config.newest_first_log {
            if let Err(e) = logging::reverse_log_file(&config.log_path) {
                warn!("could not reorder log file: {e}");
            }
        }
    };

    if cli.once {
        run_tick();
        return Ok(());
    }

    info!(
        offsets = ?config.schedule.minute_offsets,
        workbook = %config.workbook_path.display(),
        "scheduler started, capturing at fixed minutes past each hour"
    );
    config.schedule.run(run_tick)
}
