use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request-shaped failure: reported to the client, never logged as a
    /// service fault.
    #[error("{0}")]
    BadRequest(String),

    /// Anything unexpected. The request fails with 500; the process keeps
    /// serving.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(err) => {
                error!("internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": message, "success": false })),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
