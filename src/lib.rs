//! Movie Metadata Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod cache;
pub mod config;
pub mod imdb;
pub mod movies;
pub mod query;
pub mod record_store;
pub mod resolve;
pub mod server;

// Re-export commonly used types for convenience
pub use cache::CacheGateway;
pub use movies::{MetadataRecord, MovieService};
pub use query::MovieQuery;
pub use server::{run_server, RequestsLoggingLevel};
