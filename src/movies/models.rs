//! Domain models for resolved movie metadata.

use serde::{Deserialize, Serialize};

/// The cacheable unit: one resolved movie.
///
/// Produced once per distinct (title, year) pair and immutable afterwards;
/// a fresh resolution for the same key overwrites it wholesale (no merge
/// semantics). Wire field names match the public response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: String,
    pub year: String,
    #[serde(rename = "directorList")]
    pub director_list: Vec<String>,
    #[serde(rename = "genreList")]
    pub genre_list: Vec<String>,
    pub rating: f64,
}
