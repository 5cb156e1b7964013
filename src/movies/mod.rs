//! The resolution pipeline: cache check, candidate disambiguation, metadata
//! assembly, cache write.

mod models;

pub use models::MetadataRecord;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::cache::{cache_key, CacheGateway};
use crate::imdb::{Fetched, MovieDatabase};
use crate::query::MovieQuery;
use crate::resolve::{assemble, pick_film_id, AssembleError, ResolveError};

/// Everything that can go wrong resolving one query.
///
/// All resolution-stage failures surface uniformly as 404 at the HTTP
/// layer; only `Store` is an internal error.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Not param title in request")]
    InvalidRequest,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("storage error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Drives one lookup end to end: cache first, upstream on miss.
pub struct MovieService {
    database: Arc<dyn MovieDatabase>,
    cache: CacheGateway,
}

impl MovieService {
    pub fn new(database: Arc<dyn MovieDatabase>, cache: CacheGateway) -> Self {
        Self { database, cache }
    }

    /// Resolve a query to a metadata record.
    ///
    /// On a cache hit the stored record is returned verbatim and no
    /// upstream call is made. On a miss the search/detail/rating pipeline
    /// runs and the result is stored only when it succeeds.
    pub async fn lookup(&self, query: &MovieQuery) -> Result<MetadataRecord, LookupError> {
        let key = cache_key(query);

        if let Some(record) = self.cache.get(&key).map_err(LookupError::Store)? {
            debug!("Cache hit for {:?}", key);
            return Ok(record);
        }

        let candidates = match self.database.search(&query.title, query.year).await {
            Fetched::Payload(search) => search.results.ok_or(ResolveError::MissingResults)?,
            Fetched::Unavailable => return Err(ResolveError::MissingResults.into()),
        };

        let film_id = pick_film_id(&candidates, &query.title, query.year)?;
        debug!("Resolved {:?} ({}) to {}", query.title, query.year, film_id);

        let record = assemble(self.database.as_ref(), &film_id).await?;

        self.cache.put(&key, &record).map_err(LookupError::Store)?;
        info!("Resolved and cached {:?}", key);

        Ok(record)
    }

    /// Number of cached records. A store failure reports 0, loudly.
    pub fn cached_entries(&self) -> usize {
        match self.cache.entries() {
            Ok(count) => count,
            Err(err) => {
                error!("Failed to count cached records: {:#}", err);
                0
            }
        }
    }
}
