use crate::error::AppError;
use crate::server::page;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use reviewsense_core::InferenceResult;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub review: String,
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn index() -> Result<Html<String>, AppError> {
    page::render("", None).map_err(AppError::Page)
}

pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ReviewForm>,
) -> Result<Html<String>, AppError> {
    tracing::info!("Form submission ({} chars)", form.review.len());

    let result = state
        .orchestrator
        .analyze(&form.review)
        .await
        .map_err(AppError::Page)?;

    page::render(&form.review, result.as_ref()).map_err(AppError::Page)
}

/// JSON body is the result, or `null` for an empty review
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Option<InferenceResult>>, AppError> {
    tracing::info!("API request ({} chars)", req.review.len());

    let result = state
        .orchestrator
        .analyze(&req.review)
        .await
        .map_err(AppError::Api)?;

    Ok(Json(result))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}
