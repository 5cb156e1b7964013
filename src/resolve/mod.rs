//! Candidate disambiguation: pick exactly one film id out of the search
//! results, or fail.

mod assemble;

pub use assemble::{assemble, AssembleError};

use thiserror::Error;

use crate::imdb::{FilmId, SearchCandidate};

/// Failure modes of the candidate resolver.
///
/// Messages are the exact strings surfaced in the error response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The search response carried no usable results payload.
    #[error("Not found key results in answer")]
    MissingResults,
    /// The search returned no candidates at all.
    #[error("Not found Films or count > 1 and year  is empty")]
    NoMatch,
    /// More than one candidate and no year to disambiguate with.
    #[error("Not found Films or count > 1 and year  is empty")]
    AmbiguousMatch,
    /// The year filter kept zero or more than one candidate.
    #[error("More then one results or null result")]
    YearFilterMismatch,
    /// The selected candidate carried a blank id.
    #[error("Film id is empty")]
    EmptyFilmId,
}

/// Pick exactly one film id from `candidates`.
///
/// With a year, candidates must match the query title exactly (case
/// sensitive, post-sanitization) and carry a description equal to the
/// literal "(YEAR)"; exactly one must survive. Without a year, a single
/// candidate is trusted as-is and multiple candidates cannot be
/// disambiguated.
pub fn pick_film_id(
    candidates: &[SearchCandidate],
    title: &str,
    year: u32,
) -> Result<FilmId, ResolveError> {
    if candidates.is_empty() {
        return Err(ResolveError::NoMatch);
    }
    if candidates.len() > 1 && year == 0 {
        return Err(ResolveError::AmbiguousMatch);
    }

    let id = if year > 0 {
        let year_description = format!("({})", year);
        let matching: Vec<&SearchCandidate> = candidates
            .iter()
            .filter(|candidate| {
                candidate.description.as_deref() == Some(year_description.as_str())
                    && candidate.title.as_deref() == Some(title)
            })
            .collect();

        if matching.len() != 1 {
            return Err(ResolveError::YearFilterMismatch);
        }
        matching[0].id.clone()
    } else {
        // year == 0 with exactly one candidate: a single unambiguous search
        // result is trusted even without a year.
        candidates[0].id.clone()
    };

    match id {
        Some(id) if !id.is_empty() => Ok(FilmId::new(id)),
        _ => Err(ResolveError::EmptyFilmId),
    }
}
