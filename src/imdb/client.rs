//! HTTP client for the upstream movie database.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::server::metrics::record_upstream_request;

use super::models::{Fetched, FilmId, RatingsResponse, SearchResponse, TitleResponse};

/// Seam between the resolution pipeline and the upstream provider.
///
/// The production implementation is [`ImdbClient`]; e2e tests substitute a
/// scripted in-memory database.
#[async_trait]
pub trait MovieDatabase: Send + Sync {
    async fn search(&self, title: &str, year: u32) -> Fetched<SearchResponse>;
    async fn title(&self, film_id: &FilmId) -> Fetched<TitleResponse>;
    async fn ratings(&self, film_id: &FilmId) -> Fetched<RatingsResponse>;
}

enum Endpoint<'a> {
    SearchMovie { title: &'a str, year: u32 },
    Title(&'a FilmId),
    Ratings(&'a FilmId),
}

impl Endpoint<'_> {
    fn name(&self) -> &'static str {
        match self {
            Endpoint::SearchMovie { .. } => "SearchMovie",
            Endpoint::Title(_) => "Title",
            Endpoint::Ratings(_) => "Ratings",
        }
    }
}

/// Build the request URL for an endpoint.
///
/// A positive year is appended to the search query string, mirroring the
/// upstream's "title YEAR" search convention.
fn endpoint_url(base_url: &str, lang: &str, api_key: &str, endpoint: &Endpoint) -> String {
    match endpoint {
        Endpoint::SearchMovie { title, year } => {
            let query = if *year > 0 {
                format!("{} {}", title, year)
            } else {
                (*title).to_string()
            };
            format!(
                "{}/{}/API/SearchMovie/{}/{}",
                base_url,
                lang,
                api_key,
                urlencoding::encode(&query)
            )
        }
        Endpoint::Title(film_id) => {
            format!("{}/{}/API/Title/{}/{}", base_url, lang, api_key, film_id)
        }
        Endpoint::Ratings(film_id) => {
            format!("{}/{}/API/Ratings/{}/{}", base_url, lang, api_key, film_id)
        }
    }
}

pub struct ImdbClient {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    api_key: String,
}

impl ImdbClient {
    /// Create a new upstream client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the provider (e.g., "https://imdb-api.com")
    /// * `lang` - Language path segment (e.g., "en")
    /// * `api_key` - Provider API key
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: &str, lang: &str, api_key: &str, timeout_sec: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            lang: lang.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch one endpoint, collapsing every failure mode to `Unavailable`.
    ///
    /// A response counts only if the status is exactly 200 AND the body
    /// parses as the expected JSON shape. Nothing is retried.
    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Fetched<T> {
        let url = endpoint_url(&self.base_url, &self.lang, &self.api_key, &endpoint);
        let start = Instant::now();

        let fetched = match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.json::<T>().await {
                    Ok(payload) => Fetched::Payload(payload),
                    Err(err) => {
                        debug!("{}: unparsable body: {}", endpoint.name(), err);
                        Fetched::Unavailable
                    }
                }
            }
            Ok(response) => {
                debug!("{}: status {}", endpoint.name(), response.status());
                Fetched::Unavailable
            }
            Err(err) => {
                debug!("{}: transport error: {}", endpoint.name(), err);
                Fetched::Unavailable
            }
        };

        let outcome = if fetched.is_unavailable() {
            "unavailable"
        } else {
            "ok"
        };
        record_upstream_request(endpoint.name(), outcome, start.elapsed());

        fetched
    }
}

#[async_trait]
impl MovieDatabase for ImdbClient {
    async fn search(&self, title: &str, year: u32) -> Fetched<SearchResponse> {
        self.fetch(Endpoint::SearchMovie { title, year }).await
    }

    async fn title(&self, film_id: &FilmId) -> Fetched<TitleResponse> {
        self.fetch(Endpoint::Title(film_id)).await
    }

    async fn ratings(&self, film_id: &FilmId) -> Fetched<RatingsResponse> {
        self.fetch(Endpoint::Ratings(film_id)).await
    }
}
