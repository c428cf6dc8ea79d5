//! feeledger - monthly booking-fee revenue batch.
//!
//! ```bash
//! # Pull new bookings from the upstream API
//! feeledger ingest-bookings --api-url https://bookings.example.com/api/bookings
//!
//! # Load the FX history
//! feeledger load-rates rates.csv
//!
//! # Compute the ledger, or preview it without writing
//! feeledger compute-revenue [--dry-run]
//!
//! # Print the ledger
//! feeledger show-revenue
//! ```

mod config;
mod main_lib;
mod report;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Config;
use feeledger_core::bookings::{
    BookingApiClient, BookingIngestionService, BookingIngestionServiceTrait,
};
use feeledger_core::revenue::RevenueServiceTrait;
use main_lib::{build_state, init_tracing};

/// Booking-fee revenue batch: ingestion, FX history and the monthly ledger
#[derive(Parser)]
#[command(name = "feeledger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monthly booking-fee revenue batch", long_about = None)]
struct Cli {
    /// SQLite database file (overrides FL_DB_PATH)
    #[arg(long, global = true)]
    db_path: Option<String>,

    /// Fee policy JSON file (overrides FL_POLICY_FILE)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bookings from the upstream API and store the new ones
    IngestBookings {
        /// Bookings endpoint (overrides FL_BOOKINGS_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Bookings per page (overrides FL_BOOKINGS_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Load currency rates into the rate history
    LoadRates {
        /// CSV file with from_currency,to_currency,rate,rate_date columns
        #[arg(value_name = "CSV_FILE")]
        file: PathBuf,
    },

    /// Compute the monthly revenue ledger
    ComputeRevenue {
        /// Compute and print without writing the ledger
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the monthly revenue ledger
    ShowRevenue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }
    if let Some(policy) = cli.policy {
        config.policy_file = Some(policy);
    }
    init_tracing(&config.log_format);

    let state = build_state(&config)?;
    let base_currency = state.policy.base_currency.clone();

    match cli.command {
        Commands::IngestBookings { api_url, page_size } => {
            let api_url = api_url.or(config.bookings_api_url).context(
                "no bookings API URL: pass --api-url or set FL_BOOKINGS_API_URL",
            )?;
            let service = BookingIngestionService::new(
                std::sync::Arc::new(BookingApiClient::new(api_url)),
                state.booking_repository.clone(),
                state.policy.country_currencies.clone(),
                page_size.unwrap_or(config.bookings_page_size),
            );
            let summary = service.ingest().await?;
            println!(
                "Pages fetched: {}, bookings received: {}, inserted: {}, skipped (unmapped country): {}",
                summary.pages_fetched,
                summary.bookings_received,
                summary.bookings_inserted,
                summary.bookings_skipped
            );
        }
        Commands::LoadRates { file } => {
            let reader = File::open(&file)
                .with_context(|| format!("cannot open rates file {}", file.display()))?;
            let stored = state.fx_service.import_rates_csv(reader, &base_currency).await?;
            println!("Currency rates stored: {}", stored);
        }
        Commands::ComputeRevenue { dry_run } => {
            if dry_run {
                let (records, run) = state.revenue_service.preview_monthly_revenue()?;
                print!("{}", report::render_revenue_table(&records, &base_currency));
                print!("{}", report::render_run_report(&run));
            } else {
                let run = state.revenue_service.compute_monthly_revenue().await?;
                print!("{}", report::render_run_report(&run));
            }
        }
        Commands::ShowRevenue => {
            let records = state.revenue_service.get_monthly_revenue()?;
            if records.is_empty() {
                println!("No monthly revenue stored in {}", state.db_path);
            } else {
                print!("{}", report::render_revenue_table(&records, &base_currency));
            }
        }
    }

    Ok(())
}
