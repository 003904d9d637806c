pub mod extract;
pub mod fetch;
pub mod retry;

pub use extract::{parse_listing, Extractor};
pub use fetch::{PageFetcher, ScrapeError, LISTING_URL};
pub use retry::{RetryController, RetryPolicy, TickOutcome};
