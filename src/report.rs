use std::fmt;
use std::path::PathBuf;

use tracing::{error, info, warn};

/// Why a product card was dropped with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The rating wrapper exists but the descriptive span inside it is missing.
    RatingTextMissing,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RatingTextMissing => {
                write!(f, "rating block present but its descriptive text span is missing")
            }
        }
    }
}

/// Everything the pipeline tells the user about a run. Events are observational
/// only; the record sequence is the data contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SourceMissing { path: PathBuf },
    ParseStarted { path: PathBuf },
    CardsFound { count: usize },
    NoCardsFound,
    CardSkipped { index: usize, reason: SkipReason },
    NothingToWrite,
    Saved { rows: usize, path: PathBuf },
    WriteFailed { path: PathBuf, cause: String },
}

/// Sink for pipeline diagnostics. Injected so tests can assert on events
/// instead of scraping captured stdout.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

/// Default reporter: renders each event through `tracing`.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: Event) {
        match &event {
            Event::SourceMissing { path } => {
                error!("File '{}' was not found or could not be read", path.display());
            }
            Event::ParseStarted { path } => {
                info!("Reading and parsing {}...", path.display());
            }
            Event::CardsFound { count } => {
                info!("Found {} products, extracting details...", count);
            }
            Event::NoCardsFound => {
                warn!("No products found; nothing matched the 'product-card' class");
            }
            Event::CardSkipped { index, reason } => {
                warn!("Skipping product {}: {}", index + 1, reason);
            }
            Event::NothingToWrite => {
                info!("No data to save");
            }
            Event::Saved { rows, path } => {
                info!("Saved {} products to {}", rows, path.display());
            }
            Event::WriteFailed { path, cause } => {
                error!("Failed to write {}: {}", path.display(), cause);
            }
        }
    }
}

/// Collects events for assertions in tests.
#[cfg(test)]
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Reporter for Recorder {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
