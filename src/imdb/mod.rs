//! Upstream movie database (IMDb-api style) client.
//!
//! Three GET endpoints: search by title, title detail by id, ratings by id.
//! Any non-200 status, transport error or unparsable JSON collapses to
//! [`Fetched::Unavailable`] at this boundary instead of propagating.

mod client;
mod models;

pub use client::{ImdbClient, MovieDatabase};
pub use models::{Fetched, FilmId, RatingsResponse, SearchCandidate, SearchResponse, TitleResponse};
