mod file_config;

pub use file_config::{FileConfig, UpstreamConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://imdb-api.com";
pub const DEFAULT_UPSTREAM_LANG: &str = "en";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub cache_ttl_secs: u64,
    pub upstream_base_url: String,
    pub upstream_lang: String,
    pub api_key: Option<String>,
    pub upstream_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::default(),
            cache_ttl_secs: 0,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_lang: DEFAULT_UPSTREAM_LANG.to_string(),
            api_key: None,
            upstream_timeout_sec: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    /// 0 disables expiry: cached records never go stale.
    pub cache_ttl_secs: u64,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub lang: String,
    pub api_key: String,
    pub timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let cache_ttl_secs = file.cache_ttl_secs.unwrap_or(cli.cache_ttl_secs);

        let upstream_file = file.upstream.unwrap_or_default();
        let api_key = upstream_file
            .api_key
            .or_else(|| cli.api_key.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("api_key must be specified via --api-key or in config file")
            })?;

        let upstream = UpstreamSettings {
            base_url: upstream_file
                .base_url
                .unwrap_or_else(|| cli.upstream_base_url.clone()),
            lang: upstream_file
                .lang
                .unwrap_or_else(|| cli.upstream_lang.clone()),
            api_key,
            timeout_sec: upstream_file.timeout_sec.unwrap_or(cli.upstream_timeout_sec),
        };

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            cache_ttl_secs,
            upstream,
        })
    }

    pub fn records_db_path(&self) -> PathBuf {
        self.db_dir.join("movie_records.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
