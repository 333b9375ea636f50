use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use smart_itinerary::{
    Aggregator, AppConfig, AppState, GeminiGenerator, ItineraryPlanner, SerpApiClient, VERSION,
    logging, web,
};

/// Plan travel itineraries from live flight, hotel and attraction data
#[derive(Debug, Parser)]
#[command(name = "smart-itinerary", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, env = "SMARTITINERARY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configured one
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let logs = logging::init(&config.logging)?;
    info!("Starting SmartItinerary {VERSION}");

    let provider = SerpApiClient::new(&config.search, logs.component("search"))?;
    let generator = GeminiGenerator::new(&config.generator, logs.component("generator"))?;
    let aggregator = Aggregator::new(Arc::new(provider), logs.component("aggregator"));
    let planner = ItineraryPlanner::new(aggregator, Arc::new(generator), logs.component("planner"));

    let state = AppState {
        planner: Arc::new(planner),
    };

    if let Err(e) = web::run(&config.server, state).await {
        error!("Server error: {e:?}");
        return Err(e);
    }

    Ok(())
}
