use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info, warn};

use citybeat_scraper::config::Config;
use citybeat_scraper::logging;
use citybeat_scraper::pipeline::Pipeline;
use citybeat_scraper::registry;
use citybeat_scraper::storage::{InMemoryStorage, Storage};

#[derive(Parser)]
#[command(name = "citybeat_scraper")]
#[command(about = "Multi-city venue event data scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one city's venues
    Scrape {
        /// City to scrape (e.g. vancouver, dublin)
        #[arg(long)]
        city: String,
        /// Specific source ids to run (comma-separated); defaults to all of
        /// the city's venues
        #[arg(long)]
        venues: Option<String>,
    },
    /// Scrape every registered city sequentially
    Run {
        /// Subset of cities (comma-separated); defaults to all
        #[arg(long)]
        cities: Option<String>,
    },
    /// List registered cities and their source ids
    List,
}

async fn run_sources(source_ids: &[String], config: &Config, storage: Arc<dyn Storage>) {
    for source_id in source_ids {
        let span = tracing::info_span!("Running source", source = %source_id);
        let _enter = span.enter();

        let Some(scraper) = registry::create_scraper(source_id, &config.http) else {
            warn!("Unknown source id");
            println!("⚠️  Unknown source: {source_id}");
            continue;
        };
        match Pipeline::run_for_scraper_with_storage(scraper.as_ref(), config, storage.clone())
            .await
        {
            Ok(result) => {
                println!("\n📊 Results for {source_id}:");
                println!("   Candidates: {}", result.total_candidates);
                println!("   Emitted: {}", result.emitted);
                println!(
                    "   Skipped: {} no-date, {} past, {} duplicates",
                    result.skipped_no_date, result.skipped_past, result.duplicates
                );
                println!(
                    "   Storage: {} created, {} updated, {} unchanged",
                    result.created, result.updated, result.unchanged
                );
                if let Some(file) = &result.output_file {
                    println!("   Output file: {file}");
                }
                if !result.errors.is_empty() {
                    warn!("{} errors encountered during run", result.errors.len());
                    println!("\n⚠️  Errors encountered:");
                    for e in &result.errors {
                        println!("   - {e}");
                    }
                }
            }
            Err(e) => {
                // Per-source failures must not stop a sweep.
                error!("Pipeline failed: {}", e);
                println!("❌ Pipeline failed for {source_id}: {e}");
            }
        }
    }
}

fn parse_list(arg: Option<String>) -> Option<Vec<String>> {
    arg.map(|list| {
        list.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scrape { city, venues } => {
            let registered = registry::sources_for_city(&city);
            if registered.is_empty() {
                println!("⚠️  Unknown city: {city}");
                println!("   Known cities: {}", registry::all_cities().join(", "));
                return Ok(());
            }
            let source_ids: Vec<String> = match parse_list(venues) {
                Some(requested) => requested,
                None => registered.iter().map(|s| s.to_string()).collect(),
            };
            println!("🔄 Scraping {city} ({} sources)...", source_ids.len());
            let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
            run_sources(&source_ids, &config, storage).await;
        }
        Commands::Run { cities } => {
            let cities = match parse_list(cities) {
                Some(list) => list,
                None => registry::all_cities().iter().map(|s| s.to_string()).collect(),
            };
            println!("🚀 Running full sweep across {} cities...", cities.len());
            let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
            for city in &cities {
                let source_ids: Vec<String> = registry::sources_for_city(city)
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                if source_ids.is_empty() {
                    println!("⚠️  Unknown city: {city}");
                    continue;
                }
                println!("\n📍 {city}");
                run_sources(&source_ids, &config, storage.clone()).await;
            }
            let total = storage.list_events(None).await?.len();
            info!("Sweep complete: {} events in storage", total);
            println!("\n✅ Sweep complete: {total} events in storage");
        }
        Commands::List => {
            for city in registry::all_cities() {
                println!("{city}:");
                for source_id in registry::sources_for_city(city) {
                    println!("  {source_id}");
                }
            }
        }
    }
    Ok(())
}
