use thiserror::Error;

mod app_config;
mod config;
pub mod heuristics;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use heuristics::Heuristics;
pub use types::{
    rounded_coord_key, DetectionMethod, DiscoveredSubstation, GeoPoint, ImageAnalysis,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
