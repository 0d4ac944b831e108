//! Search responses and result correlation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Raw search response: parallel arrays per query vector.
///
/// `ids[q][i]` and `distances[q][i]` describe the i-th hit for the q-th
/// query vector; `fields[q][i]` carries the requested field values for that
/// hit, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub ids: Vec<Vec<i64>>,
    pub distances: Vec<Vec<f32>>,
    #[serde(default)]
    pub fields: Vec<Vec<HashMap<String, Value>>>,
}

/// One hit, with the parallel arrays zipped back together.
#[derive(Debug, Clone)]
pub struct Hit<'a> {
    pub id: i64,
    pub distance: f32,
    pub fields: Option<&'a HashMap<String, Value>>,
}

impl SearchResponse {
    /// Zip the parallel arrays for one query vector into hits, ordered by
    /// the server's ranking. Out-of-range `query_idx` yields no hits.
    pub fn hits(&self, query_idx: usize) -> Vec<Hit<'_>> {
        let ids = self.ids.get(query_idx).map(Vec::as_slice).unwrap_or(&[]);
        let distances = self
            .distances
            .get(query_idx)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        ids.iter()
            .zip(distances.iter())
            .enumerate()
            .map(|(i, (&id, &distance))| Hit {
                id,
                distance,
                fields: self.fields.get(query_idx).and_then(|f| f.get(i)),
            })
            .collect()
    }
}

/// Explicit id-to-title mapping for correlating search hits back to data
/// kept client-side only.
///
/// Result ids are resolved through this map, never by treating the id as a
/// position in the original insertion order — the service makes no promise
/// that ids line up with array offsets.
#[derive(Debug, Clone, Default)]
pub struct TitleCatalog {
    titles: HashMap<i64, String>,
}

impl TitleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, title: impl Into<String>) {
        self.titles.insert(id, title.into());
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.titles.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl FromIterator<(i64, String)> for TitleCatalog {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            titles: iter.into_iter().collect(),
        }
    }
}
