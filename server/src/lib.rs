use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use retriever_core::{persist, tokenizer, Error as CoreError, Hit, Searcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
    #[serde(default = "default_nresults")]
    pub n: usize,
}

fn default_nresults() -> usize {
    20
}

#[derive(serde::Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub took_s: f64,
    pub documents: Vec<Hit>,
    /// Raw text of the best-ranked document; empty when there are no
    /// results or the file cannot be read.
    pub top_match: String,
}

#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<Searcher>,
    pub collection_root: PathBuf,
}

/// Load the snapshot and assemble the router. The index is fully loaded
/// before the router exists, so no request can observe a half-loaded state.
pub fn build_app(index_path: &Path, collection_root: &Path) -> Result<Router> {
    let snapshot = persist::load(index_path)
        .with_context(|| format!("loading index snapshot from {}", index_path.display()))?;
    let searcher = Searcher::from_snapshot(snapshot).context("index snapshot unusable")?;
    tracing::info!(num_docs = searcher.num_docs(), "index loaded");

    let state = AppState {
        searcher: Arc::new(searcher),
        collection_root: collection_root.to_path_buf(),
    };

    // CORS: comma-separated CORS_ALLOW_ORIGIN, or any origin by default.
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Ok(Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/query", get(query_handler))
        .with_state(state)
        .layer(cors))
}

pub async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let tokens = tokenizer::preprocess_query(&params.q);
    let documents = state
        .searcher
        .query(&tokens, params.n)
        .map_err(map_core_error)?;

    let top_match = documents
        .first()
        .map(|hit| read_document(&state.collection_root, &hit.name))
        .unwrap_or_default();

    Ok(Json(QueryResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        documents,
        top_match,
    }))
}

fn map_core_error(err: CoreError) -> (StatusCode, String) {
    let status = match err {
        CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn read_document(root: &Path, name: &str) -> String {
    match std::fs::read_to_string(root.join(name)) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(document = name, %err, "could not read top match");
            String::new()
        }
    }
}
