mod extract;
mod report;
mod writer;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::report::LogReporter;
use crate::writer::WriteOutcome;

#[derive(Parser)]
#[command(
    name = "product_scraper",
    about = "Extract product records from a local HTML listing into a CSV file"
)]
struct Cli {
    /// HTML document to scrape
    #[arg(short, long, default_value = "mock_products.html")]
    input: PathBuf,
    /// Destination CSV file
    #[arg(short, long, default_value = "products_scraped_data.csv")]
    output: PathBuf,
}

// Exit codes: 0 = file written, 1 = nothing to write, 2 = input/output failure.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut reporter = LogReporter;

    let records = match extract::extract_from_file(&cli.input, &mut reporter) {
        Ok(records) => records,
        Err(err) => {
            debug!("extraction failed: {err:#}");
            return ExitCode::from(2);
        }
    };

    match writer::write_csv(&records, &cli.output, &mut reporter) {
        WriteOutcome::Written(_) => ExitCode::SUCCESS,
        WriteOutcome::Empty => ExitCode::from(1),
        WriteOutcome::Failed => ExitCode::from(2),
    }
}
