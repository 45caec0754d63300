pub mod app_config;
pub mod config;
pub mod filter;
pub mod spot;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::SpotFilter;
pub use spot::{Coordinate, Level, Spot, SpotId};

use thiserror::Error;

/// Every variable has a default, so only a present-but-unusable value fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
