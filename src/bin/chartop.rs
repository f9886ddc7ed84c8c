//! chartop - terminal browser for the Rick and Morty character API.
//!
//! Fetches every upstream page matching the active filter, re-paginates
//! the set locally at a user-chosen page size, and shows a master-detail
//! table.
//!
//! Usage:
//!   chartop                       # browse the live API
//!   chartop --status alive        # start with a filter applied
//!   chartop --page-size 50        # smaller local pages
//!   chartop --concurrency 1       # strictly sequential upstream fetches
//!   chartop --demo                # built-in data, no network

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chartop::api::{
    CharacterSource, FilterSet, GenderFilter, HttpCharacterSource, MockSource, StatusFilter,
};
use chartop::session::{DEFAULT_CONCURRENCY, PageSize, Session};
use chartop::tui::App;

/// Default upstream endpoint.
const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// UI tick interval (spinner animation, fetch-outcome polling).
const TICK_RATE: Duration = Duration::from_millis(200);

/// Terminal browser for the Rick and Morty character API.
#[derive(Parser)]
#[command(name = "chartop", about = "Character browser for the Rick and Morty API")]
struct Args {
    /// Base URL of the upstream API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Initial name search.
    #[arg(long, default_value = "")]
    name: String,

    /// Initial status filter: alive, dead, unknown or all.
    #[arg(long, default_value = "all")]
    status: StatusFilter,

    /// Initial species filter.
    #[arg(long, default_value = "")]
    species: String,

    /// Initial gender filter: female, male, genderless, unknown or all.
    #[arg(long, default_value = "all")]
    gender: GenderFilter,

    /// Records per local page: 20, 50, 100, 200 or 250.
    #[arg(long, default_value = "250")]
    page_size: PageSize,

    /// Concurrent upstream page fetches (1 = strictly sequential).
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Browse built-in demo data instead of the live API.
    #[arg(long)]
    demo: bool,

    /// Append logs to this file (verbosity via RUST_LOG).
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Validate arguments
    if args.concurrency == 0 {
        eprintln!("Error: --concurrency must be at least 1");
        std::process::exit(1);
    }
    if args.timeout_secs == 0 {
        eprintln!("Error: --timeout-secs must be at least 1");
        std::process::exit(1);
    }

    // The TUI owns the terminal, so logs go to a file or nowhere.
    if let Some(ref path) = args.log_file {
        let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error opening log file '{}': {}", path, e);
                std::process::exit(1);
            }
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }

    // Create the character source based on mode
    let source: Arc<dyn CharacterSource> = if args.demo {
        Arc::new(MockSource::sample())
    } else {
        let timeout = Duration::from_secs(args.timeout_secs);
        match HttpCharacterSource::with_timeout(&args.base_url, timeout) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                eprintln!("Error initializing HTTP client: {}", e);
                std::process::exit(1);
            }
        }
    };

    let filters = FilterSet {
        name: args.name,
        status: args.status,
        species: args.species,
        gender: args.gender,
    };

    let session = Session::with_concurrency(source, filters, args.page_size, args.concurrency);
    let app = App::new(session);

    if let Err(e) = app.run(TICK_RATE) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
