//! Index and metric descriptors
//!
//! The client never builds indexes itself; these types only describe what
//! the server should build over a vector field. At most one index exists
//! per field — creating a new one replaces the old.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Index algorithm to build on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    /// Brute-force scan, no index structure.
    #[serde(rename = "FLAT")]
    Flat,
    /// Inverted-file index over flat vectors; build param `nlist`,
    /// search param `nprobe`.
    #[serde(rename = "IVF_FLAT")]
    IvfFlat,
    #[serde(rename = "HNSW")]
    Hnsw,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Flat => "FLAT",
            IndexType::IvfFlat => "IVF_FLAT",
            IndexType::Hnsw => "HNSW",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance metric used to compare vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    /// Euclidean (L2) distance
    #[serde(rename = "L2")]
    L2,
    /// Inner product (larger is closer)
    #[serde(rename = "IP")]
    InnerProduct,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::L2 => "L2",
            MetricType::InnerProduct => "IP",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a server-side index build.
#[derive(Debug, Clone, Serialize)]
pub struct IndexParams {
    pub index_type: IndexType,
    pub metric_type: MetricType,
    /// Type-specific build parameters (e.g. `nlist` for IVF_FLAT).
    pub params: Map<String, Value>,
}

impl IndexParams {
    pub fn new(index_type: IndexType, metric_type: MetricType) -> Self {
        Self {
            index_type,
            metric_type,
            params: Map::new(),
        }
    }

    /// Add a type-specific build parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
