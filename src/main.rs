// src/main.rs

//! gan-flights: Gan Airport flight board CLI
//!
//! Fetches the airport's flight-informations page through the TTL cache
//! and prints the current arrivals and departures.

use clap::{Parser, Subcommand};

use gan_flights::cache::{Clock, FlightCache, SystemClock};
use gan_flights::error::Result;
use gan_flights::fetch::HttpFetcher;
use gan_flights::models::{Config, FlightRecord};
use gan_flights::storage::{EntryStore, FileStore};

#[derive(Parser, Debug)]
#[command(
    name = "gan-flights",
    version,
    about = "Gan International Airport flight board scraper"
)]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the current flight board (served from cache when fresh)
    Fetch {
        /// Print the board as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the persisted cache entry's age without fetching
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let store = FileStore::new(&config.cache.file);

    match cli.command {
        Command::Fetch { json } => {
            let fetcher = HttpFetcher::new(&config.source)?;
            let cache = FlightCache::open(&config, fetcher, SystemClock, store).await;
            let current = cache.get_current_data().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&current)?);
            } else {
                println!("Flight board captured at {}", current.captured_at);
                print_board("Arrivals", &current.data.arrivals);
                print_board("Departures", &current.data.departures);
            }
        }
        Command::Status => match store.load().await? {
            Some(entry) => {
                let age = SystemClock.now() - entry.captured_at;
                let state = if age.num_seconds() <= config.cache.ttl_secs as i64 {
                    "fresh"
                } else {
                    "stale"
                };
                println!(
                    "Cached entry from {} ({}s old, {state}): {} arrivals, {} departures",
                    entry.captured_at,
                    age.num_seconds(),
                    entry.data.arrivals.len(),
                    entry.data.departures.len()
                );
            }
            None => println!("No cached flight data."),
        },
    }

    Ok(())
}

fn print_board(title: &str, records: &[FlightRecord]) {
    println!();
    println!("{title} ({})", records.len());
    for r in records {
        println!(
            "  {:<20} {:<8} {} {}  {:<15} {:<8} belt {:<3} {}",
            r.airline,
            r.flight_number,
            r.date,
            r.time,
            r.origin_or_destination,
            r.aircraft,
            r.belt,
            r.status
        );
    }
}
