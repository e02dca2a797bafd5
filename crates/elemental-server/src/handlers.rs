//! JSON request handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use elemental_catalog::{find_similar, suggest_names};

use crate::error::ApiError;
use crate::payload::{ElementSummary, ElementsQuery, SearchRequest, SearchResponse};
use crate::server::AppState;

const SUGGESTION_LIMIT: usize = 5;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "server": "elemental-server",
        "version": env!("CARGO_PKG_VERSION"),
        "elements": state.database().len(),
    }))
}

/// Catalog listing sorted by name, or fuzzy matches when `like` is set
pub async fn list_elements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ElementsQuery>,
) -> Json<Vec<ElementSummary>> {
    let db = state.database();
    let limit = query.limit.unwrap_or(usize::MAX);

    let summaries = match query.like.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(like) => find_similar(db, like, limit)
            .into_iter()
            .map(ElementSummary::from)
            .collect(),
        None => {
            let mut all: Vec<ElementSummary> = db.iter().map(ElementSummary::from).collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            all.truncate(limit);
            all
        }
    };
    Json(summaries)
}

/// Run a single or multi-path search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    tracing::debug!(
        "Search request: target={}, mode={:?}, wanted={}",
        request.target,
        request.mode,
        request.wanted()
    );
    Ok(Json(run_search(&state, &request, None).await?))
}

/// Shared by the JSON and streaming endpoints
pub(crate) async fn run_search(
    state: &AppState,
    request: &SearchRequest,
    progress: Option<elemental_core::ProgressSink>,
) -> Result<SearchResponse, ApiError> {
    let mut finder = state.finder_for(request)?;
    if let Some(progress) = progress {
        finder = finder.with_progress(progress);
    }
    let deadline = state.deadline_for(request);

    let report = if request.wanted() == 1 {
        finder.find_one(&request.target, deadline).await?
    } else {
        finder
            .find_many(&request.target, request.wanted(), deadline)
            .await?
    };

    let suggestions = if state.database().contains(&request.target) {
        Vec::new()
    } else {
        suggest_names(state.database(), &request.target, SUGGESTION_LIMIT)
    };
    Ok(SearchResponse::from_report(report, suggestions))
}
