//! Serde models for the upstream API responses.

use serde::Deserialize;

/// Opaque handle to one title on the upstream provider.
///
/// Only lives between the search call and the detail/rating calls; it is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmId(String);

impl FilmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FilmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one upstream fetch.
///
/// `Unavailable` covers transport errors, non-200 statuses and JSON parse
/// failures alike; callers decide what "missing" means for their stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Payload(T),
    Unavailable,
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Payload(payload) => Some(payload),
            Fetched::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Fetched::Unavailable)
    }
}

/// One entry of a search response.
///
/// The upstream encodes the release year inside `description` as "(YYYY)".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchCandidate {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub results: Option<Vec<SearchCandidate>>,
}

/// Detail payload for one title.
///
/// The upstream signals "no such film" with a literally empty object, so
/// deserialization rejects `{}`; any non-empty payload is accepted and
/// missing fields default downstream. A derive could not tell the two
/// apart: both parse to all-`None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleResponse {
    pub title: Option<String>,
    pub year: Option<String>,
    pub director_list: Option<Vec<String>>,
    pub genre_list: Option<Vec<String>>,
}

impl<'de> Deserialize<'de> for TitleResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            title: Option<String>,
            year: Option<String>,
            #[serde(rename = "directorList")]
            director_list: Option<Vec<String>>,
            #[serde(rename = "genreList")]
            genre_list: Option<Vec<String>>,
        }

        let map = serde_json::Map::deserialize(deserializer)?;
        if map.is_empty() {
            return Err(serde::de::Error::custom("empty title payload"));
        }

        let fields = Fields::deserialize(serde_json::Value::Object(map))
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            title: fields.title,
            year: fields.year,
            director_list: fields.director_list,
            genre_list: fields.genre_list,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingsResponse {
    #[serde(rename = "imDb")]
    pub im_db: Option<String>,
}
