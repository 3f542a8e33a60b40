use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-failure taxonomy. Every handler returns `Result<_, ApiError>`;
/// the `IntoResponse` impl below is the single place status codes and error
/// bodies are produced.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required field.
    #[error("{0}")]
    Validation(String),

    /// No matching row.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate membership. Reported as 400, matching the join endpoint's
    /// contract.
    #[error("{0}")]
    Conflict(String),

    /// Credential mismatch.
    #[error("{0}")]
    Auth(String),

    /// Login-flow rejection; the body carries `{success:false, message}`
    /// instead of the `{error}` shape used everywhere else.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Any store failure. Details are logged, never sent to the client.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    /// Avatar unlink failure surfaced on the delete-group path.
    #[error("avatar cleanup failed")]
    Storage(#[source] std::io::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(m) | ApiError::Conflict(m) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
            }
            ApiError::NotFound(m) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
            }
            ApiError::Auth(m) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": m }))).into_response()
            }
            ApiError::Rejected { status, message } => (
                status,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            ApiError::Store(e) => {
                error!("store failure: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Database error" })),
                )
                    .into_response()
            }
            ApiError::Storage(e) => {
                error!("avatar cleanup failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Error deleting avatar file" })),
                )
                    .into_response()
            }
        }
    }
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn blocking<T>(
    f: impl FnOnce() -> anyhow::Result<T> + Send + 'static,
) -> Result<T, ApiError>
where
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!("blocking task join error: {e}");
            Err(ApiError::Store(anyhow::anyhow!("blocking task failed")))
        }
    }
}
