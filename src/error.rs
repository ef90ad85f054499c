use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced by the HTTP layer
///
/// Store operations never fail; what can go wrong is producing the page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Writing the panel document failed
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
    /// Metrics recorder not installed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Render(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(error = %self, "Request failed");

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Render(_) => "render_error",
        AppError::Internal(_) => "internal_error",
    }
}
