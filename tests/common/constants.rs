//! Shared constants for end-to-end tests

pub const REQUEST_TIMEOUT_SECS: u64 = 5;
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

pub const FILM_ID: &str = "tt1375666";
pub const FILM_TITLE: &str = "Inception";
pub const FILM_YEAR: &str = "2010";
pub const FILM_RATING: &str = "8.8";
