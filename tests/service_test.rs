//! Client integration tests against an in-process mock of the service.
//!
//! The mock implements just enough of the wire protocol to exercise every
//! client operation: collection bookkeeping, row counting, index state, and
//! a canned search response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use filmvec::{
    Client, ClientError, Collection, Expr, FilmSchema, IndexParams, IndexType, InsertBatch,
    MetricType, TitleCatalog,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockCollection {
    rows: usize,
    indexed_field: Option<String>,
}

#[derive(Default)]
struct MockState {
    collections: Mutex<HashMap<String, MockCollection>>,
}

type AppState = Arc<MockState>;
type ApiError = (StatusCode, Json<Value>);

fn not_found(name: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("collection not found: {}", name)})),
    )
}

async fn list_collections(State(state): State<AppState>) -> Json<Value> {
    let names: Vec<String> = state.collections.lock().unwrap().keys().cloned().collect();
    Json(json!({ "collections": names }))
}

async fn create_collection(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut collections = state.collections.lock().unwrap();
    if collections.contains_key(&name) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("collection already exists: {}", name)})),
        ));
    }
    collections.insert(name.clone(), MockCollection::default());
    Ok((
        StatusCode::CREATED,
        Json(json!({"name": name, "status": "created"})),
    ))
}

async fn drop_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .collections
        .lock()
        .unwrap()
        .remove(&name)
        .ok_or_else(|| not_found(&name))?;
    Ok(Json(json!({"name": name, "status": "dropped"})))
}

async fn insert_entities(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let count = body["ids"].as_array().map(|a| a.len()).unwrap_or(0);
    let mut collections = state.collections.lock().unwrap();
    let collection = collections.get_mut(&name).ok_or_else(|| not_found(&name))?;
    collection.rows += count;
    Ok((StatusCode::CREATED, Json(json!({ "insert_count": count }))))
}

async fn flush(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .collections
        .lock()
        .unwrap()
        .get(&name)
        .ok_or_else(|| not_found(&name))?;
    Ok(Json(json!({"status": "flushed"})))
}

async fn count(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let collections = state.collections.lock().unwrap();
    let collection = collections.get(&name).ok_or_else(|| not_found(&name))?;
    Ok(Json(json!({"count": collection.rows})))
}

async fn stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let collections = state.collections.lock().unwrap();
    let collection = collections.get(&name).ok_or_else(|| not_found(&name))?;
    Ok(Json(json!({
        "row_count": collection.rows,
        "indexed_field": collection.indexed_field,
    })))
}

async fn create_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut collections = state.collections.lock().unwrap();
    let collection = collections.get_mut(&name).ok_or_else(|| not_found(&name))?;
    collection.indexed_field = body["field"].as_str().map(String::from);
    Ok((StatusCode::CREATED, Json(json!({"status": "created"}))))
}

async fn drop_index(
    State(state): State<AppState>,
    Path((name, field)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut collections = state.collections.lock().unwrap();
    let collection = collections.get_mut(&name).ok_or_else(|| not_found(&name))?;
    if collection.indexed_field.as_deref() != Some(field.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no index on field: {}", field)})),
        ));
    }
    collection.indexed_field = None;
    Ok(Json(json!({"status": "dropped"})))
}

async fn search(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(_body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    state
        .collections
        .lock()
        .unwrap()
        .get(&name)
        .ok_or_else(|| not_found(&name))?;
    Ok(Json(json!({
        "ids": [[2, 1]],
        "distances": [[0.1, 0.4]],
        "fields": [[
            {"release_year": 1995},
            {"release_year": 1995},
        ]],
    })))
}

async fn spawn_mock() -> String {
    let state = AppState::default();
    let app = Router::new()
        .route("/collections", get(list_collections).post(create_collection))
        .route("/collections/{name}", delete(drop_collection))
        .route("/collections/{name}/entities", post(insert_entities))
        .route("/collections/{name}/flush", post(flush))
        .route("/collections/{name}/count", get(count))
        .route("/collections/{name}/stats", get(stats))
        .route("/collections/{name}/index", post(create_index))
        .route("/collections/{name}/index/{field}", delete(drop_index))
        .route("/collections/{name}/search", post(search))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_full_lifecycle() {
    let url = spawn_mock().await;
    let client = Client::with_base_url(url);
    let schema = FilmSchema::new();
    let films = Collection::new(&client, "demo_index", schema.schema());

    films.create().await.unwrap();
    assert_eq!(
        client.list_collections().await.unwrap(),
        vec!["demo_index".to_string()]
    );

    let batch = InsertBatch::new(vec![1, 2])
        .int32_column(&schema.release_year, vec![1995, 1995])
        .unwrap()
        .vector_column(&schema.embedding, vec![vec![0.1; 8], vec![0.9; 8]])
        .unwrap();
    assert_eq!(films.insert(&batch).await.unwrap(), 2);

    films.flush().await.unwrap();
    assert_eq!(films.count().await.unwrap(), 2);

    films
        .create_index(
            &schema.embedding,
            &IndexParams::new(IndexType::IvfFlat, MetricType::L2).param("nlist", 100),
        )
        .await
        .unwrap();

    let stats = films.stats().await.unwrap();
    assert_eq!(stats["row_count"], json!(2));
    assert_eq!(stats["indexed_field"], json!("embedding"));

    let catalog: TitleCatalog = [(1i64, "Toy Story".to_string()), (2i64, "Jumanji".to_string())]
        .into_iter()
        .collect();
    let query = Expr::must([
        schema.release_year.in_([1995, 2002]),
        schema
            .embedding
            .query(vec![vec![0.5; 8]])
            .unwrap()
            .metric(MetricType::L2)
            .top_k(2)
            .param("nprobe", 8)
            .into(),
    ]);
    let response = films
        .search(&query, &["release_year", "embedding"])
        .await
        .unwrap();

    let hits = response.hits(0);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, 2);
    assert_eq!(catalog.get(hits[0].id), Some("Jumanji"));
    assert_eq!(catalog.get(hits[1].id), Some("Toy Story"));
    assert!(hits[0].distance < hits[1].distance);

    films.drop_index(&schema.embedding).await.unwrap();
    films.drop().await.unwrap();
    assert!(client.list_collections().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let url = spawn_mock().await;
    let client = Client::with_base_url(url);
    let schema = FilmSchema::new();
    let films = Collection::new(&client, "demo_index", schema.schema());

    films.create().await.unwrap();
    let batch = InsertBatch::new(vec![1])
        .int32_column(&schema.release_year, vec![1995])
        .unwrap()
        .vector_column(&schema.embedding, vec![vec![0.1; 8]])
        .unwrap();
    films.insert(&batch).await.unwrap();
    assert_eq!(films.count().await.unwrap(), 1);

    // Second create drops the old collection and starts fresh.
    films.create().await.unwrap();
    assert_eq!(films.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_service_errors_surface() {
    let url = spawn_mock().await;
    let client = Client::with_base_url(url);

    let err = client.drop_collection("missing").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("missing"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }

    let err = client.drop_index("missing", "embedding").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
}
