//! Metadata assembly: merge the detail and rating calls into one record.

use thiserror::Error;

use crate::imdb::{Fetched, FilmId, MovieDatabase};
use crate::movies::MetadataRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The title detail endpoint came back empty.
    #[error("Film data is empty")]
    EmptyDetail,
}

/// Fetch detail and rating for `film_id` and merge them into one record.
///
/// The two calls are independent of each other and issued concurrently.
/// An empty detail response fails the assembly; the rating is best-effort
/// and defaults to 0.0 when missing or non-numeric. Missing detail
/// sub-fields default to empty so the output shape stays stable.
pub async fn assemble(
    database: &dyn MovieDatabase,
    film_id: &FilmId,
) -> Result<MetadataRecord, AssembleError> {
    let (detail, ratings) = tokio::join!(database.title(film_id), database.ratings(film_id));

    let detail = match detail {
        Fetched::Payload(detail) => detail,
        Fetched::Unavailable => return Err(AssembleError::EmptyDetail),
    };

    let rating = ratings
        .into_option()
        .and_then(|ratings| ratings.im_db)
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(MetadataRecord {
        title: detail.title.unwrap_or_default(),
        year: detail.year.unwrap_or_default(),
        director_list: detail.director_list.unwrap_or_default(),
        genre_list: detail.genre_list.unwrap_or_default(),
        rating,
    })
}
