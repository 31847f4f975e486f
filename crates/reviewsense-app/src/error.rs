//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reviewsense_core::Error;

/// Error returned from a handler
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Pipeline failure behind a JSON endpoint
    #[error(transparent)]
    Api(Error),

    /// Pipeline failure behind the HTML page
    #[error(transparent)]
    Page(Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        let (AppError::Api(e) | AppError::Page(e)) = self;
        match e {
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::Generation(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!("Request failed ({}): {}", status, self);

        match self {
            AppError::Api(e) => (
                status,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response(),
            AppError::Page(e) => (status, crate::server::page::render_error(&e.to_string()))
                .into_response(),
        }
    }
}
