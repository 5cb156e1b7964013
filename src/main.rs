use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_metadata_server::cache::CacheGateway;
use movie_metadata_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_UPSTREAM_BASE_URL, DEFAULT_UPSTREAM_LANG,
};
use movie_metadata_server::imdb::ImdbClient;
use movie_metadata_server::movies::MovieService;
use movie_metadata_server::record_store::{RecordStore, SqliteRecordStore};
use movie_metadata_server::server::{self, run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory where the SQLite records database lives.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Maximum age of cached records in seconds. 0 means records never expire.
    #[clap(long, default_value_t = 0)]
    pub cache_ttl_secs: u64,

    /// Base URL of the movie database API.
    #[clap(long, default_value = DEFAULT_UPSTREAM_BASE_URL)]
    pub upstream_base_url: String,

    /// Language segment used in upstream request paths.
    #[clap(long, default_value = DEFAULT_UPSTREAM_LANG)]
    pub upstream_lang: String,

    /// API key for the movie database API.
    #[clap(long, env = "IMDB_API_KEY")]
    pub api_key: Option<String>,

    /// Timeout in seconds for upstream requests.
    #[clap(long, default_value_t = 30)]
    pub upstream_timeout_sec: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(
            FileConfig::load(path)
                .with_context(|| format!("Error loading config file: {:?}", path))?,
        ),
        None => None,
    };

    let cli_config = CliConfig {
        db_dir: cli_args.db_dir,
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        logging_level: cli_args.logging_level,
        cache_ttl_secs: cli_args.cache_ttl_secs,
        upstream_base_url: cli_args.upstream_base_url,
        upstream_lang: cli_args.upstream_lang,
        api_key: cli_args.api_key,
        upstream_timeout_sec: cli_args.upstream_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!(
        "Opening SQLite records database at {:?}...",
        config.records_db_path()
    );
    let record_store = Arc::new(SqliteRecordStore::new(&config.records_db_path())?);

    info!("Initializing metrics...");
    server::metrics::init_metrics();
    server::metrics::init_cache_metrics(record_store.count()?);

    let database = Arc::new(ImdbClient::new(
        &config.upstream.base_url,
        &config.upstream.lang,
        &config.upstream.api_key,
        config.upstream.timeout_sec,
    )?);

    let ttl = match config.cache_ttl_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let cache = CacheGateway::new(record_store, ttl);

    let movie_service = Arc::new(MovieService::new(database, cache));

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(
        movie_service,
        config.logging_level,
        config.port,
        config.metrics_port,
    )
    .await
}
