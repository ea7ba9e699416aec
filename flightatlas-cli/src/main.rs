//! FlightAtlas CLI - Command-line interface
//!
//! This binary provides a command-line interface to the FlightAtlas
//! library: it loads (or refreshes) the reference cache, runs a route
//! query for an origin airport, and prints the per-operator aggregation.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use flightatlas::cache::InitOutcome;
use flightatlas::config::Settings;
use flightatlas::logging::init_logging;
use flightatlas::selection::SelectionPhase;
use flightatlas::service::FlightAtlas;

#[derive(Parser)]
#[command(name = "flightatlas")]
#[command(about = "Query direct flight routes for an origin airport", long_about = None)]
#[command(version = flightatlas::VERSION)]
struct Args {
    /// Origin airport code (3 letters, e.g. LAX)
    #[arg(long)]
    airport: String,

    /// Restrict the printed route list to one operator code (e.g. DL)
    #[arg(long)]
    airline: Option<String>,

    /// Path to an INI config file
    #[arg(long, default_value = "flightatlas.ini")]
    config: PathBuf,

    /// Override the cache directory from the config
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let airport = args.airport.trim().to_ascii_uppercase();
    if airport.len() != 3 || !airport.chars().all(|c| c.is_ascii_alphanumeric()) {
        eprintln!("Error: airport must be a 3-letter code (got '{}')", args.airport);
        process::exit(1);
    }

    let mut settings = match Settings::load_or_default(&args.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    if let Some(dir) = args.cache_dir {
        settings.cache.directory = dir;
    }

    let _guard = match init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    let atlas = match FlightAtlas::init(&settings).await {
        Ok(atlas) => atlas,
        Err(e) => {
            eprintln!("Error loading reference data: {}", e);
            process::exit(1);
        }
    };

    match atlas.cache_outcome() {
        InitOutcome::CacheHit => println!("Reference data: cache hit (no network call)"),
        InitOutcome::Refreshed => println!("Reference data: refreshed from network"),
        InitOutcome::AlreadyLoaded => {}
    }
    println!(
        "Loaded {} airports, {} airlines",
        atlas.cache().airports().await.len(),
        atlas.cache().airlines().await.len()
    );
    println!();

    let controller = atlas.controller();
    println!("Querying routes for {}...", airport);
    if let Err(e) = controller.select_origin(airport.as_str()).await.await {
        eprintln!("Error: route query task failed: {}", e);
        process::exit(1);
    }

    let state = controller.state().await;
    if state.phase != SelectionPhase::RoutesLoaded {
        let reason = state
            .last_error
            .unwrap_or_else(|| "data unavailable".to_string());
        eprintln!("Error: {}", reason);
        process::exit(1);
    }

    println!("{} routes loaded for {}", state.routes.len(), airport);
    println!();

    println!("Routes by operator:");
    let summary = controller.operator_summary().await;
    for operator in &summary {
        println!("  {:>4}  {:<30} {:>5}", operator.code, operator.name, operator.count);
    }

    if let Some(airline) = args.airline {
        let airline = airline.trim().to_ascii_uppercase();
        controller.select_operator(airline.as_str()).await;
        let state = controller.state().await;

        println!();
        println!("{} routes operated by {}:", state.filtered.len(), airline);
        for route in &state.filtered {
            println!("  {} -> {}", route.src, route.dst);
        }
    }
}
