//! Configuration for the staffgraph server.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`STAFFGRAPH__` prefix, `__` separator)
//! 2. Config file (`staffgraph.toml`, or the `--config` prefix)
//! 3. Defaults

use serde::Deserialize;
use staffgraph_graph::GraphConfig;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub neo4j: GraphConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Load configuration from `<file_prefix>.toml` (optional) and the environment.
pub fn load(file_prefix: &str) -> Result<ServiceConfig, ::config::ConfigError> {
    ::config::Config::builder()
        .add_source(::config::File::with_name(file_prefix).required(false))
        .add_source(
            ::config::Environment::with_prefix("STAFFGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
