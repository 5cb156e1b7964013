//! Scripted upstream database for end-to-end tests
//!
//! Each test configures the responses it needs up front; the fixture counts
//! calls so tests can assert the cache actually short-circuits the upstream.

use async_trait::async_trait;
use movie_metadata_server::imdb::{
    Fetched, FilmId, MovieDatabase, RatingsResponse, SearchCandidate, SearchResponse,
    TitleResponse,
};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::constants::*;

/// A movie database whose responses are fixed at construction time.
pub struct ScriptedMovieDatabase {
    search_response: Fetched<SearchResponse>,
    title_response: Fetched<TitleResponse>,
    ratings_response: Fetched<RatingsResponse>,
    search_calls: AtomicUsize,
    title_calls: AtomicUsize,
    ratings_calls: AtomicUsize,
}

impl ScriptedMovieDatabase {
    pub fn new(
        search_response: Fetched<SearchResponse>,
        title_response: Fetched<TitleResponse>,
        ratings_response: Fetched<RatingsResponse>,
    ) -> Self {
        Self {
            search_response,
            title_response,
            ratings_response,
            search_calls: AtomicUsize::new(0),
            title_calls: AtomicUsize::new(0),
            ratings_calls: AtomicUsize::new(0),
        }
    }

    /// Happy-path fixture: one search candidate that resolves to a full record.
    pub fn single_film() -> Self {
        Self::new(
            Fetched::Payload(SearchResponse {
                results: Some(vec![SearchCandidate {
                    id: Some(FILM_ID.to_string()),
                    title: Some(FILM_TITLE.to_string()),
                    description: Some(format!("({})", FILM_YEAR)),
                }]),
            }),
            Fetched::Payload(TitleResponse {
                title: Some(FILM_TITLE.to_string()),
                year: Some(FILM_YEAR.to_string()),
                director_list: Some(vec!["Christopher Nolan".to_string()]),
                genre_list: Some(vec!["Action".to_string(), "Sci-Fi".to_string()]),
            }),
            Fetched::Payload(RatingsResponse {
                im_db: Some(FILM_RATING.to_string()),
            }),
        )
    }

    /// Two candidates sharing the same title and year description.
    pub fn ambiguous_films() -> Self {
        let candidate = |id: &str| SearchCandidate {
            id: Some(id.to_string()),
            title: Some(FILM_TITLE.to_string()),
            description: Some(format!("({})", FILM_YEAR)),
        };
        Self::new(
            Fetched::Payload(SearchResponse {
                results: Some(vec![candidate("tt0000001"), candidate("tt0000002")]),
            }),
            Fetched::Unavailable,
            Fetched::Unavailable,
        )
    }

    /// Upstream that never answers anything.
    pub fn unavailable() -> Self {
        Self::new(Fetched::Unavailable, Fetched::Unavailable, Fetched::Unavailable)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
            + self.title_calls.load(Ordering::SeqCst)
            + self.ratings_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieDatabase for ScriptedMovieDatabase {
    async fn search(&self, _title: &str, _year: u32) -> Fetched<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_response.clone()
    }

    async fn title(&self, _film_id: &FilmId) -> Fetched<TitleResponse> {
        self.title_calls.fetch_add(1, Ordering::SeqCst);
        self.title_response.clone()
    }

    async fn ratings(&self, _film_id: &FilmId) -> Fetched<RatingsResponse> {
        self.ratings_calls.fetch_add(1, Ordering::SeqCst);
        self.ratings_response.clone()
    }
}
