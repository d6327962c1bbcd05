//! Axum route handlers for the cat facts REST API.

use crate::dashboard;
use crate::db::Db;
use crate::error::{FactError, Result};
use crate::upstream::Upstream;
use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use cat_facts_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub db: Arc<Db>,
    pub upstream: Arc<Upstream>,
    pub start_time: Instant,
}

type Rejection<T> = (StatusCode, Json<ApiResponse<T>>);

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type IdParam = std::result::Result<Path<i64>, PathRejection>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/facts", get(list_facts).post(create_fact))
        .route("/facts/random", get(random_fact))
        .route("/facts/stats", get(stats))
        .route(
            "/facts/:id",
            get(get_fact).put(update_fact).delete(delete_fact),
        )
        .route("/facts/:id/favorite", post(toggle_favorite))
        .route("/status", get(status))
        .with_state(state)
}

/// Trims surrounding whitespace; empty results are rejected before any store call.
pub fn validate_fact_text(raw: &str) -> Result<&str> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(FactError::InvalidInput("Fact cannot be empty".to_string()));
    }
    Ok(text)
}

fn reject<T>(e: FactError) -> Rejection<T> {
    match &e {
        FactError::StorageUnavailable(msg) => log::error!("Storage error: {}", msg),
        FactError::UpstreamUnavailable(msg) => log::warn!("Upstream error: {}", msg),
        _ => {}
    }
    (e.status(), Json(ApiResponse::err(e.code(), e.to_string())))
}

/// Extractor failures (missing field, bad JSON, wrong content type, non-numeric
/// id) become `INVALID_FACT` responses instead of axum's plain-text bodies.
fn malformed(body_text: String) -> FactError {
    log::debug!("Rejected malformed request: {}", body_text);
    FactError::InvalidInput(body_text)
}

// GET /facts
pub async fn list_facts(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<Fact>>, Rejection<()>> {
    state.db.list_all().map(Json).map_err(reject)
}

// POST /facts
pub async fn create_fact(
    State(state): State<Arc<AppState>>,
    body: JsonBody<CreateFactRequest>,
) -> (StatusCode, Json<ApiResponse<Fact>>) {
    let Json(req) = match body {
        Ok(b) => b,
        Err(e) => return reject(malformed(e.body_text())),
    };
    let text = match validate_fact_text(&req.fact) {
        Ok(t) => t,
        Err(e) => return reject(e),
    };

    match state.db.insert(text, req.source.unwrap_or_default()) {
        Ok(fact) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Cat fact successfully added", fact)),
        ),
        Err(e) => reject(e),
    }
}

// GET /facts/:id
pub async fn get_fact(
    State(state): State<Arc<AppState>>,
    id: IdParam,
) -> std::result::Result<Json<Fact>, Rejection<()>> {
    let Path(id) = id.map_err(|e| reject(malformed(e.body_text())))?;
    match state.db.get(id) {
        Ok(Some(fact)) => Ok(Json(fact)),
        Ok(None) => Err(reject(FactError::NotFound(id))),
        Err(e) => Err(reject(e)),
    }
}

// PUT /facts/:id
pub async fn update_fact(
    State(state): State<Arc<AppState>>,
    id: IdParam,
    body: JsonBody<UpdateFactRequest>,
) -> (StatusCode, Json<ApiResponse<Fact>>) {
    let (Path(id), Json(req)) = match (id, body) {
        (Ok(id), Ok(body)) => (id, body),
        (Err(e), _) => return reject(malformed(e.body_text())),
        (_, Err(e)) => return reject(malformed(e.body_text())),
    };
    let text = match validate_fact_text(&req.fact) {
        Ok(t) => t,
        Err(e) => return reject(e),
    };

    match state.db.update(id, text) {
        Ok(Some(fact)) => (StatusCode::OK, Json(ApiResponse::ok("Cat fact updated", fact))),
        Ok(None) => reject(FactError::NotFound(id)),
        Err(e) => reject(e),
    }
}

// DELETE /facts/:id
pub async fn delete_fact(
    State(state): State<Arc<AppState>>,
    id: IdParam,
) -> (StatusCode, Json<ApiResponse<DeletedFact>>) {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return reject(malformed(e.body_text())),
    };
    match state.db.delete(id) {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                format!("Fact {} deleted", id),
                DeletedFact { id },
            )),
        ),
        Ok(false) => reject(FactError::NotFound(id)),
        Err(e) => reject(e),
    }
}

// POST /facts/:id/favorite
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    id: IdParam,
) -> (StatusCode, Json<ApiResponse<Fact>>) {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return reject(malformed(e.body_text())),
    };
    match state.db.toggle_favorite(id) {
        Ok(Some(fact)) => {
            let message = if fact.favorite {
                "Added to favorites"
            } else {
                "Removed from favorites"
            };
            (StatusCode::OK, Json(ApiResponse::ok(message, fact)))
        }
        Ok(None) => reject(FactError::NotFound(id)),
        Err(e) => reject(e),
    }
}

// GET /facts/random
pub async fn random_fact(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<RandomFact>, Rejection<()>> {
    state
        .upstream
        .fetch_fact()
        .await
        .map(|fact| Json(RandomFact { fact }))
        .map_err(reject)
}

// GET /facts/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<FactStats>, Rejection<()>> {
    state.db.stats().map(Json).map_err(reject)
}

// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    let total_facts = match state.db.stats() {
        Ok(s) => s.total,
        Err(e) => {
            log::error!("Status check could not read the store: {}", e);
            0
        }
    };
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_facts,
    })
}
