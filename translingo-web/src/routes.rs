use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use translingo::history::{HistoryStats, HistoryStore};
use translingo::{
    EntryType, HistoryEntry, HistoryPatch, MtError, NewHistoryEntry, TranslationRequest,
    TranslationResolver, TranslationResult,
};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<TranslationResolver>,
    pub history: HistoryStore,
}

/// Body of `POST /api/translate`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBody {
    #[serde(flatten)]
    pub request: TranslationRequest,
    /// Recorded with the history entry
    #[serde(default)]
    pub input_type: EntryType,
}

#[derive(Debug, Deserialize)]
pub struct DetectBody {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub language: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub favorites: Option<bool>,
    pub search: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate))
        .route("/api/detect-language", post(detect_language))
        .route(
            "/api/translations",
            get(list_translations)
                .post(create_translation)
                .delete(clear_translations),
        )
        .route("/api/translations/stats", get(translation_stats))
        .route(
            "/api/translations/{id}",
            patch(update_translation).delete(delete_translation),
        )
        .route("/api/translations/{id}/favorite", post(toggle_favorite))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateBody>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(body) = payload?;
    info!(
        "Translating {} chars to {} (source: {})",
        body.request.text.chars().count(),
        &body.request.target_language,
        body.request.source_language.as_deref().unwrap_or("none")
    );

    let result = state.resolver.resolve(&body.request).await.map_err(|e| {
        if matches!(e, MtError::AllProvidersFailed) {
            warn!("Every translation provider failed");
        }
        ApiError::from(e)
    })?;

    state.history.add(NewHistoryEntry {
        source_text: body.request.text.clone(),
        translated_text: result.translated_text.clone(),
        source_language: result.source_language.clone(),
        target_language: result.target_language.clone(),
        entry_type: body.input_type,
        is_favorite: false,
        metadata: Some(json!({ "confidence": result.confidence })),
    });

    Ok(Json(result))
}

async fn detect_language(
    State(state): State<AppState>,
    payload: Result<Json<DetectBody>, JsonRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let Json(body) = payload?;
    if body.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }
    let detector = state
        .resolver
        .detector()
        .ok_or_else(|| ApiError::from(MtError::DetectionUnavailable))?;

    let detection = detector.detect(&body.text).await.map_err(|e| {
        warn!(error = %e, "Language detection failed");
        ApiError::Internal("Language detection failed".to_string())
    })?;

    Ok(Json(DetectResponse {
        language: detection.language,
        confidence: detection.confidence,
    }))
}

/// Search wins over type, type over favorites, and only the plain listing paginates
async fn list_translations(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntry>> {
    let entries = if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        state.history.search(search)
    } else if let Some(entry_type) = query.entry_type {
        state.history.by_type(entry_type)
    } else if query.favorites == Some(true) {
        state.history.favorites()
    } else {
        state.history.list(query.limit, query.offset)
    };
    Json(entries)
}

async fn create_translation(
    State(state): State<AppState>,
    payload: Result<Json<NewHistoryEntry>, JsonRejection>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let Json(entry) = payload?;
    if !entry.is_valid() {
        return Err(ApiError::BadRequest("Invalid translation data".to_string()));
    }
    Ok(Json(state.history.add(entry)))
}

async fn update_translation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<HistoryPatch>, JsonRejection>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let Json(patch) = payload?;
    state
        .history
        .update(id, patch)
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<HistoryEntry>, ApiError> {
    state
        .history
        .toggle_favorite(id)
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.history.delete(id) {
        Ok(Json(json!({ "message": "Translation deleted successfully" })))
    } else {
        Err(not_found(id))
    }
}

async fn clear_translations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let removed = state.history.clear();
    info!("Cleared {} history entries", removed);
    Json(json!({ "removed": removed }))
}

async fn translation_stats(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(state.history.stats())
}

fn not_found(id: u64) -> ApiError {
    ApiError::NotFound(format!("Translation {} not found", id))
}
