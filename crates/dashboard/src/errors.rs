use thiserror::Error;

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::file_parsers::ParseError;
use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Route parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Health data error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
