mod config;
mod http_layers;
pub mod metrics;
mod server;
mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
