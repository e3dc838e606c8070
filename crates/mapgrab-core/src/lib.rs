//! Shared types for the mapgrab workspace: rate-limit policy, query
//! expansion, the business record model, and application configuration.

mod app_config;
mod config;
pub mod policy;
pub mod query;
pub mod record;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use policy::{PolicyError, RateLimitPolicy};
pub use query::{expand_queries, ExpandError, Query};
pub use record::{BusinessRecord, SINK_COLUMNS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
