//! HTTP client for end-to-end tests
//!
//! Thin wrapper around reqwest. When routes or request formats change,
//! update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_movie(&self, title: &str, year: Option<&str>) -> Response {
        let mut query: Vec<(&str, &str)> = vec![("title", title)];
        if let Some(year) = year {
            query.push(("year", year));
        }
        self.client
            .get(format!("{}/movies", self.base_url))
            .query(&query)
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /movies without any query parameters at all.
    pub async fn get_movie_without_params(&self) -> Response {
        self.client
            .get(format!("{}/movies", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn request_movies(&self, method: reqwest::Method) -> Response {
        self.client
            .request(method, format!("{}/movies?title=Inception", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn post_movies_with_override(&self, override_value: &str) -> Response {
        self.client
            .post(format!("{}/movies?title=Inception", self.base_url))
            .header("X-HTTP-Method", override_value)
            .send()
            .await
            .expect("Request failed")
    }
}
