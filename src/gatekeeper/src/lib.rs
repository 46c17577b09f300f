pub mod cli_args;

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use gateway_common::model::{StartRequest, ValidateRequest};
use gateway_common::AppError;
use serde_json::Value;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Held once, cloned per request — the teacher's
/// `MonoProxyRestState`/`State<T>` pattern.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub trusted_host_url: String,
}

impl AppState {
    pub fn new(trusted_host_url: String, upstream_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            trusted_host_url,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/start", post(start))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
}

async fn start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Response, AppError> {
    let query = req.query.filter(|q| !q.is_empty()).ok_or(AppError::MissingQuery)?;
    let strategy = req.strategy.filter(|s| !s.is_empty()).unwrap_or_else(|| "round-robin".to_string());

    let envelope = ValidateRequest {
        query,
        authorization: true,
        strategy,
    };

    let resp = state
        .client
        .post(format!("{}/validate", state.trusted_host_url))
        .json(&envelope)
        .send()
        .await?;

    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    Ok((status, Json(body)).into_response())
}
