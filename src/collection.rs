//! Per-collection service handle
//!
//! Wraps a [`Client`], a collection name, and its [`Schema`] so the
//! lifecycle of one collection reads as method calls instead of repeated
//! (client, name) pairs. Mirrors the lifecycle the demo walks through:
//! create, insert, flush, index, search, drop.

use crate::client::{Client, CollectionOptions, InsertBatch};
use crate::error::Result;
use crate::index::IndexParams;
use crate::query::Expr;
use crate::results::SearchResponse;
use crate::schema::{FloatVectorField, Schema};
use serde_json::Value;

/// A named collection bound to a client and schema.
#[derive(Debug)]
pub struct Collection<'a> {
    client: &'a Client,
    name: String,
    schema: Schema,
    options: CollectionOptions,
}

impl<'a> Collection<'a> {
    pub fn new(client: &'a Client, name: impl Into<String>, schema: Schema) -> Self {
        Self {
            client,
            name: name.into(),
            schema,
            options: CollectionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create the collection, dropping any same-named collection first.
    ///
    /// Safe to call repeatedly; each call leaves a fresh, empty collection.
    pub async fn create(&self) -> Result<()> {
        let existing = self.client.list_collections().await?;
        if existing.iter().any(|n| n == &self.name) {
            log::debug!("collection '{}' exists, dropping before create", self.name);
            self.client.drop_collection(&self.name).await?;
        }
        self.client
            .create_collection(&self.name, &self.schema, &self.options)
            .await
    }

    pub async fn drop(&self) -> Result<()> {
        self.client.drop_collection(&self.name).await
    }

    pub async fn insert(&self, batch: &InsertBatch) -> Result<usize> {
        self.client.insert(&self.name, batch).await
    }

    pub async fn flush(&self) -> Result<()> {
        self.client.flush(&self.name).await
    }

    pub async fn count(&self) -> Result<usize> {
        self.client.count_entities(&self.name).await
    }

    pub async fn stats(&self) -> Result<Value> {
        self.client.collection_stats(&self.name).await
    }

    pub async fn create_index(
        &self,
        field: &FloatVectorField,
        params: &IndexParams,
    ) -> Result<()> {
        self.client
            .create_index(&self.name, field.name(), params)
            .await
    }

    pub async fn drop_index(&self, field: &FloatVectorField) -> Result<()> {
        self.client.drop_index(&self.name, field.name()).await
    }

    pub async fn search(&self, query: &Expr, fields: &[&str]) -> Result<SearchResponse> {
        self.client.search(&self.name, query, fields).await
    }
}
