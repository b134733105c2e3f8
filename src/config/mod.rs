pub mod explorer;
pub mod graph;
pub mod log;
pub mod trace;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

pub use explorer::ChainConfig;
pub use explorer::ExplorerConfig;
pub use graph::GraphConfig;
pub use log::LoggingConfig;
pub use trace::TraceConfig;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub async fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let config_str = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
