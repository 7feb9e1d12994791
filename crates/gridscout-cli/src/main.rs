use clap::{Parser, Subcommand};

use gridscout_core::GeoPoint;
use gridscout_detect::{DetectorConfig, SubstationDetector};
use gridscout_places::{PlacesClient, RetryPolicy};
use gridscout_vision::VisionClient;

#[derive(Debug, Parser)]
#[command(name = "gridscout-cli")]
#[command(about = "Substation detection command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the detection pipeline and print the result list as JSON.
    Detect {
        /// Center latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Center longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Free-text location, geocoded when --lat/--lng are absent.
        #[arg(long)]
        location: Option<String>,
        /// Result cap; 0 means unlimited.
        #[arg(long, default_value_t = 0)]
        max_results: usize,
        /// Skip the satellite scan even when a vision key is configured.
        #[arg(long)]
        no_imagery: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect {
            lat,
            lng,
            location,
            max_results,
            no_imagery,
        } => run_detect(lat, lng, location, max_results, !no_imagery).await,
    }
}

async fn run_detect(
    lat: Option<f64>,
    lng: Option<f64>,
    location: Option<String>,
    max_results: usize,
    use_imagery: bool,
) -> anyhow::Result<()> {
    let config = gridscout_core::load_app_config()?;

    let retry = RetryPolicy {
        max_retries: config.max_retries,
        backoff_base_ms: config.retry_backoff_base_ms,
    };
    let places = PlacesClient::new(&config.maps_api_key, config.request_timeout_secs, retry)?;

    let center = match (lat, lng, location) {
        (Some(lat), Some(lng), _) => GeoPoint::new(lat, lng),
        (_, _, Some(location)) => places
            .geocode(&location)
            .await?
            .ok_or_else(|| anyhow::anyhow!("location '{location}' could not be geocoded"))?,
        _ => anyhow::bail!("provide --lat and --lng, or --location"),
    };

    let vision = match &config.vision_api_key {
        Some(key) => Some(VisionClient::new(
            key,
            &config.vision_model,
            config.request_timeout_secs,
        )?),
        None => {
            if use_imagery {
                tracing::warn!("OPENAI_API_KEY not set; satellite analysis disabled");
            }
            None
        }
    };

    let detector =
        SubstationDetector::new(places, vision, DetectorConfig::from_app_config(&config));
    let found = detector.detect(center, max_results, use_imagery).await;

    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}
