//! HTTP client for the vector-search service
//!
//! Every operation is one blocking round trip from the caller's point of
//! view: calls are awaited sequentially, there are no retries and no
//! client-side concurrency. Failures surface as [`ClientError`]; non-2xx
//! responses decode the service's error body into [`ClientError::Api`].

use crate::error::{ClientError, Result};
use crate::query::Expr;
use crate::results::SearchResponse;
use crate::index::IndexParams;
use crate::schema::{FloatVectorField, Int32Field, Int64Field, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Connection parameters for the service. Defaults target a local instance.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    host: String,
    port: u16,
}

impl ConnectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Options applied when creating a collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionOptions {
    /// When false, every inserted row must carry an explicit id.
    pub auto_id: bool,
    /// Row count at which the server seals a segment; index builds only
    /// materialize for sealed segments.
    pub segment_row_limit: usize,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            auto_id: false,
            segment_row_limit: 4096,
        }
    }
}

/// A columnar batch of rows for bulk insert.
///
/// Columns are added through the typed field handles so that lengths stay
/// aligned with the id column and vector dimensions match the schema.
#[derive(Debug, Clone, Serialize)]
pub struct InsertBatch {
    ids: Vec<i64>,
    fields: BTreeMap<String, ColumnData>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum ColumnData {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    FloatVector(Vec<Vec<f32>>),
}

impl InsertBatch {
    /// Start a batch with explicit row ids.
    pub fn new(ids: Vec<i64>) -> Self {
        Self {
            ids,
            fields: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add an int32 scalar column. Must have one value per id.
    pub fn int32_column(mut self, field: &Int32Field, values: Vec<i32>) -> Result<Self> {
        self.check_len(field.name(), values.len())?;
        self.fields
            .insert(field.name().to_string(), ColumnData::Int32(values));
        Ok(self)
    }

    /// Add an int64 scalar column. Must have one value per id.
    pub fn int64_column(mut self, field: &Int64Field, values: Vec<i64>) -> Result<Self> {
        self.check_len(field.name(), values.len())?;
        self.fields
            .insert(field.name().to_string(), ColumnData::Int64(values));
        Ok(self)
    }

    /// Add a vector column. Must have one vector per id, each matching the
    /// field's dimension.
    pub fn vector_column(
        mut self,
        field: &FloatVectorField,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self> {
        self.check_len(field.name(), vectors.len())?;
        for v in &vectors {
            if v.len() != field.dim() {
                return Err(ClientError::DimensionMismatch {
                    expected: field.dim(),
                    actual: v.len(),
                });
            }
        }
        self.fields
            .insert(field.name().to_string(), ColumnData::FloatVector(vectors));
        Ok(self)
    }

    fn check_len(&self, field: &str, actual: usize) -> Result<()> {
        if actual != self.ids.len() {
            return Err(ClientError::ColumnMismatch {
                field: field.to_string(),
                expected: self.ids.len(),
                actual,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<String>,
}

#[derive(Deserialize)]
struct InsertResponse {
    insert_count: usize,
}

#[derive(Deserialize)]
struct CountResponse {
    count: usize,
}

/// Handle to the remote vector-search service.
///
/// Construction performs no network I/O; the first request does. Dropping
/// the client closes its pooled connections, on success and error paths
/// alike.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Connect using host/port parameters.
    pub fn connect(params: ConnectParams) -> Self {
        Self::with_base_url(params.base_url())
    }

    /// Connect to an explicit base URL (e.g. `http://127.0.0.1:3000`).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Names of all collections on the server.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        let url = self.url("collections");
        log::debug!("GET {}", url);
        let resp = check(self.http.get(&url).send().await?).await?;
        Ok(resp.json::<CollectionList>().await?.collections)
    }

    /// Create a collection with the given schema and options.
    ///
    /// Fails if a collection with the same name already exists; see
    /// [`Collection::create`](crate::collection::Collection::create) for the
    /// idempotent drop-and-recreate variant.
    pub async fn create_collection(
        &self,
        name: &str,
        schema: &Schema,
        options: &CollectionOptions,
    ) -> Result<()> {
        let url = self.url("collections");
        log::debug!("POST {}", url);
        let body = json!({
            "name": name,
            "fields": schema.fields(),
            "auto_id": options.auto_id,
            "segment_row_limit": options.segment_row_limit,
        });
        check(self.http.post(&url).json(&body).send().await?).await?;
        Ok(())
    }

    /// Drop a collection and everything in it.
    pub async fn drop_collection(&self, name: &str) -> Result<()> {
        let url = self.url(&format!("collections/{}", name));
        log::debug!("DELETE {}", url);
        check(self.http.delete(&url).send().await?).await?;
        Ok(())
    }

    /// Bulk-insert a columnar batch. Returns the number of rows inserted.
    pub async fn insert(&self, collection: &str, batch: &InsertBatch) -> Result<usize> {
        let url = self.url(&format!("collections/{}/entities", collection));
        log::debug!("POST {} ({} rows)", url, batch.len());
        let resp = check(self.http.post(&url).json(batch).send().await?).await?;
        Ok(resp.json::<InsertResponse>().await?.insert_count)
    }

    /// Flush pending writes so they are visible to count and search.
    pub async fn flush(&self, collection: &str) -> Result<()> {
        let url = self.url(&format!("collections/{}/flush", collection));
        log::debug!("POST {}", url);
        check(self.http.post(&url).send().await?).await?;
        Ok(())
    }

    /// Number of rows in a collection.
    pub async fn count_entities(&self, collection: &str) -> Result<usize> {
        let url = self.url(&format!("collections/{}/count", collection));
        log::debug!("GET {}", url);
        let resp = check(self.http.get(&url).send().await?).await?;
        Ok(resp.json::<CountResponse>().await?.count)
    }

    /// Collection statistics as opaque JSON, shaped by the server.
    pub async fn collection_stats(&self, collection: &str) -> Result<Value> {
        let url = self.url(&format!("collections/{}/stats", collection));
        log::debug!("GET {}", url);
        let resp = check(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Build an index on a vector field. Replaces any existing index on
    /// that field.
    pub async fn create_index(
        &self,
        collection: &str,
        field: &str,
        params: &IndexParams,
    ) -> Result<()> {
        let url = self.url(&format!("collections/{}/index", collection));
        log::debug!("POST {} (field {})", url, field);
        let body = json!({
            "field": field,
            "index_type": params.index_type,
            "metric_type": params.metric_type,
            "params": params.params,
        });
        check(self.http.post(&url).json(&body).send().await?).await?;
        Ok(())
    }

    /// Drop the index on a vector field.
    pub async fn drop_index(&self, collection: &str, field: &str) -> Result<()> {
        let url = self.url(&format!("collections/{}/index/{}", collection, field));
        log::debug!("DELETE {}", url);
        check(self.http.delete(&url).send().await?).await?;
        Ok(())
    }

    /// Run a query, asking the server to return the named fields with each
    /// hit.
    pub async fn search(
        &self,
        collection: &str,
        query: &Expr,
        fields: &[&str],
    ) -> Result<SearchResponse> {
        let url = self.url(&format!("collections/{}/search", collection));
        log::debug!("POST {}", url);
        let body = json!({
            "query": query.to_value(),
            "fields": fields,
        });
        let resp = check(self.http.post(&url).json(&body).send().await?).await?;
        Ok(resp.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Map non-2xx responses to `ClientError::Api`, decoding the error body
/// when the server sent one.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
