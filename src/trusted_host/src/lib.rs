pub mod cli_args;
pub mod rules;

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use gateway_common::model::{QueryRequest, ValidateRequest};
use gateway_common::AppError;
use serde_json::Value;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub proxy_url: String,
}

impl AppState {
    pub fn new(proxy_url: String, upstream_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client, proxy_url }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/validate", post(validate))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
}

async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Response, AppError> {
    rules::validate(&req.query, req.authorization).map_err(AppError::Validation)?;

    let envelope = QueryRequest {
        query: req.query,
        strategy: req.strategy,
    };

    let resp = state
        .client
        .post(format!("{}/query", state.proxy_url))
        .json(&envelope)
        .send()
        .await?;

    let status =
        StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    Ok((status, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    async fn spawn_fake_proxy(status: StatusCode, body: Value) -> String {
        let route_body = body.clone();
        let router = Router::new().route(
            "/query",
            post(move || {
                let body = route_body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn tautology_is_rejected_with_400() {
        let state = AppState::new("http://127.0.0.1:1".to_string(), Duration::from_secs(1));
        let app = app(state);
        let req = Request::post("/validate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({
                    "query": "SELECT * FROM actor WHERE 1=1",
                    "Authorization": true,
                    "strategy": "round-robin"
                }))
                .unwrap(),
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Tautological"));
    }

    #[tokio::test]
    async fn forwards_to_proxy_when_valid() {
        let expected = json!({"source": "manager"});
        let proxy_url = spawn_fake_proxy(StatusCode::OK, expected.clone()).await;
        let state = AppState::new(proxy_url, Duration::from_secs(2));
        let app = app(state);
        let req = Request::post("/validate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({
                    "query": "INSERT INTO actor (first_name) VALUES ('U')",
                    "Authorization": true,
                    "strategy": "round-robin"
                }))
                .unwrap(),
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, expected);
    }
}
