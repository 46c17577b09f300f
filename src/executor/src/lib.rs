pub mod cli_args;
pub mod db;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway_common::model::ExecuteRequest;
use gateway_common::AppError;
use mysql_async::Pool;
use serde_json::Value;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
}

impl AppState {
    pub fn new(opts: mysql_async::Opts) -> Self {
        Self {
            pool: Pool::new(opts),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/execute", post(execute))
        .route("/ping", get(ping))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
}

async fn execute(State(state): State<AppState>, Json(req): Json<ExecuteRequest>) -> Result<Json<Value>, AppError> {
    if req.query.trim().is_empty() {
        return Err(AppError::MissingQuery);
    }
    let value = db::execute(&state.pool, &req.kind, &req.query).await?;
    Ok(Json(value))
}

/// Liveness/latency probe used by the Proxy's `customized` routing; no
/// MySQL round-trip is required (spec §4.4).
async fn ping() -> StatusCode {
    StatusCode::OK
}
