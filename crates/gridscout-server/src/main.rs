mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use gridscout_detect::{DetectorConfig, SubstationDetector};
use gridscout_places::{PlacesClient, RetryPolicy};
use gridscout_vision::VisionClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = gridscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let retry = RetryPolicy {
        max_retries: config.max_retries,
        backoff_base_ms: config.retry_backoff_base_ms,
    };
    let places = Arc::new(PlacesClient::new(
        &config.maps_api_key,
        config.request_timeout_secs,
        retry,
    )?);

    let vision = match &config.vision_api_key {
        Some(key) => Some(VisionClient::new(
            key,
            &config.vision_model,
            config.request_timeout_secs,
        )?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; satellite analysis disabled");
            None
        }
    };

    // The detector owns its own places client so request handlers can
    // geocode concurrently with a running pipeline.
    let detector_places = PlacesClient::new(
        &config.maps_api_key,
        config.request_timeout_secs,
        retry,
    )?;
    let detector = Arc::new(SubstationDetector::new(
        detector_places,
        vision,
        DetectorConfig::from_app_config(&config),
    ));

    let app = build_app(AppState { detector, places });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
