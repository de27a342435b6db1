use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadsConfig,
    pub static_site: StaticSiteConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct UploadsConfig {
    pub directory: String,
}

#[derive(Debug, Deserialize)]
pub struct StaticSiteConfig {
    pub directory: String,
}

/// File logging settings; console logging is always on
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub path: String,
    /// Maximum size of one log file in MiB before rolling over
    pub size: u64,
    pub max_files: usize,
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))?;
    let config: Config = toml::from_str(&config_text)?;
    Ok(config)
}
