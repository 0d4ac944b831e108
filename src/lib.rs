//! # filmvec
//!
//! A typed client for a JSON/HTTP vector-search service, plus the film
//! dataset plumbing used by the end-to-end demo binary.
//!
//! This library provides:
//! - Schema definitions with typed field handles
//! - A boolean/vector query builder that compiles to the wire form
//! - A sequential, no-retry HTTP client for the service
//! - CSV ingestion for the films dataset and id-based result correlation
//!
//! Index construction, distance computation, and query execution all happen
//! on the server; nothing here implements similarity search.
//!
//! ## Example
//!
//! ```rust,no_run
//! use filmvec::{Client, Collection, Expr, FilmSchema, IndexParams, IndexType, MetricType};
//!
//! # async fn demo() -> filmvec::Result<()> {
//! let client = Client::with_base_url("http://127.0.0.1:3000");
//! let film = FilmSchema::new();
//! let films = Collection::new(&client, "demo_index", film.schema());
//!
//! films.create().await?;
//! films
//!     .create_index(
//!         &film.embedding,
//!         &IndexParams::new(IndexType::IvfFlat, MetricType::L2).param("nlist", 100),
//!     )
//!     .await?;
//!
//! let query = Expr::must([
//!     film.release_year.in_([1995, 2002]),
//!     film.embedding.query(vec![vec![0.0; 8]])?.top_k(3).into(),
//! ]);
//! let response = films.search(&query, &["release_year"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collection;
pub mod dataset;
pub mod error;
pub mod index;
pub mod query;
pub mod results;
pub mod schema;

pub use client::{Client, CollectionOptions, ConnectParams, InsertBatch};
pub use collection::Collection;
pub use dataset::{FilmSchema, EMBEDDING_DIM};
pub use error::{ClientError, Result};
pub use index::{IndexParams, IndexType, MetricType};
pub use query::{Expr, VectorQuery};
pub use results::{SearchResponse, TitleCatalog};
pub use schema::{FloatVectorField, Int32Field, Int64Field, Schema};
