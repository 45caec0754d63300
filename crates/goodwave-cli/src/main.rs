mod map;
mod spots;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "goodwave")]
#[command(about = "Browse surf spots, manage favorites, and map them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List spots, optionally narrowed by type, text, or saved status
    Spots {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Only spots of this break type (e.g. `reef`)
        #[arg(long = "type")]
        spot_type: Option<String>,
        /// Case-insensitive match on name or location
        #[arg(long)]
        search: Option<String>,
        /// Only spots in your favorites
        #[arg(long)]
        saved: bool,
    },
    /// Show one spot in detail
    Spot { id: String },
    /// List your favorite spots
    Favorites,
    /// Add a spot to your favorites
    Save { id: String },
    /// Remove a spot from your favorites
    Unsave { id: String },
    /// Geocode loaded spots and print their coordinates and the fitted region
    Map {
        /// Number of pages to load before geocoding
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = goodwave_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    match cli.command {
        Some(Commands::Spots {
            pages,
            spot_type,
            search,
            saved,
        }) => {
            let filter = goodwave_core::SpotFilter {
                spot_type,
                search,
                saved_only: saved,
            };
            spots::run_spots(&config, pages, &filter).await?;
        }
        Some(Commands::Spot { id }) => spots::run_spot(&config, &id).await?,
        Some(Commands::Favorites) => spots::run_favorites(&config).await?,
        Some(Commands::Save { id }) => spots::run_set_saved(&config, &id, true).await?,
        Some(Commands::Unsave { id }) => spots::run_set_saved(&config, &id, false).await?,
        Some(Commands::Map { pages }) => map::run_map(&config, pages).await?,
        None => println!("goodwave: no command given; try `goodwave --help`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
