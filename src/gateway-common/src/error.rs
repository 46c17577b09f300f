use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// The error taxonomy shared by every hop. Each variant carries its own
/// status code so handlers can propagate failures with plain `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No query provided")]
    MissingQuery,
    #[error("{0}")]
    Validation(String),
    #[error("Incorrect action in query")]
    Unclassifiable,
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Driver(String),
    #[error("{0}")]
    Config(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingQuery | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unclassifiable | AppError::Upstream(_) | AppError::Driver(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, %status, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Turns a transport-layer failure (a failed downstream HTTP call) into the
/// uniform `Upstream` kind, preserving the driver/reqwest cause string.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}
