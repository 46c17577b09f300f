pub mod backend;
pub mod cli_args;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use backend::router::{self, RoutingStrategy};
use backend::BackendDirectory;
use gateway_common::model::{ExecuteRequest, QueryKind, QueryRequest};
use gateway_common::AppError;
use serde_json::Value;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub directory: Arc<BackendDirectory>,
    pub ping_timeout: Duration,
}

impl AppState {
    pub fn new(directory: BackendDirectory, upstream_timeout: Duration, ping_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            directory: Arc::new(directory),
            ping_timeout,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/query", post(query))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
}

async fn query(State(state): State<AppState>, Json(req): Json<QueryRequest>) -> Result<Response, AppError> {
    let kind = QueryKind::classify(&req.query);
    let selected = match kind {
        QueryKind::Select => {
            let strategy = RoutingStrategy::normalize(&req.strategy);
            router::select_read(&state.directory, &state.client, strategy, state.ping_timeout).await
        }
        QueryKind::Insert => router::select_write(&state.directory),
        QueryKind::Delete | QueryKind::Other => return Err(AppError::Unclassifiable),
    };

    let envelope = ExecuteRequest {
        kind: kind.as_wire_str().to_string(),
        query: req.query,
    };

    let resp = state
        .client
        .post(format!("{}/execute", selected.url))
        .json(&envelope)
        .send()
        .await?;

    let status =
        StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body: Value = resp.json().await?;
    if status.is_success() {
        if let Value::Object(ref mut map) = body {
            map.insert("source".to_string(), Value::String(selected.source));
        }
    }
    Ok((status, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    async fn spawn_fake_executor(status: StatusCode, body: Value) -> String {
        let route_body = body.clone();
        let router = Router::new().route(
            "/execute",
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

    fn make_state(primary: String, replicas: Vec<String>) -> AppState {
        let dir = BackendDirectory::new(primary, replicas).unwrap();
        AppState::new(dir, Duration::from_secs(2), Duration::from_secs(1))
    }

    async fn post_query(app: Router, query: &str, strategy: &str) -> (StatusCode, Value) {
        let req = Request::post("/query")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({"query": query, "strategy": strategy})).unwrap(),
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn insert_always_routes_to_primary_regardless_of_strategy() {
        let primary = spawn_fake_executor(StatusCode::OK, json!({"message": "ok"})).await;
        let replica = spawn_fake_executor(StatusCode::OK, json!({"message": "ok"})).await;
        let state = make_state(primary, vec![replica]);
        let app = app(state);
        let (status, body) = post_query(app, "INSERT INTO actor VALUES (1)", "customized").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "manager");
    }

    #[tokio::test]
    async fn direct_strategy_never_reaches_a_replica() {
        let primary = spawn_fake_executor(StatusCode::OK, json!({"result": []})).await;
        // deliberately no server bound for the replica; if direct picked it this would 500.
        let unreachable_replica = "http://127.0.0.1:1".to_string();
        let state = make_state(primary, vec![unreachable_replica]);
        let app = app(state);
        let (status, body) =
            post_query(app, "SELECT * FROM actor WHERE id = 1", "direct").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["source"].as_str().unwrap().starts_with("direct worker IP:"));
    }

    #[tokio::test]
    async fn round_robin_alternates_across_two_cold_requests() {
        let primary = spawn_fake_executor(StatusCode::OK, json!({"result": []})).await;
        let r0 = spawn_fake_executor(StatusCode::OK, json!({"result": []})).await;
        let r1 = spawn_fake_executor(StatusCode::OK, json!({"result": []})).await;
        let state = make_state(primary, vec![r0.clone(), r1.clone()]);
        let app = app(state);

        let (status1, body1) =
            post_query(app.clone(), "SELECT * FROM actor WHERE first_name = 'User1'", "").await;
        let (status2, body2) =
            post_query(app, "SELECT * FROM actor WHERE first_name = 'User1'", "").await;

        assert_eq!(status1, StatusCode::OK);
        assert_eq!(status2, StatusCode::OK);
        assert!(body1["source"].as_str().unwrap().contains(backend::host_of(&r0)));
        assert!(body2["source"].as_str().unwrap().contains(backend::host_of(&r1)));
    }

    #[tokio::test]
    async fn unclassifiable_statement_is_a_500() {
        let primary = spawn_fake_executor(StatusCode::OK, json!({})).await;
        let replica = spawn_fake_executor(StatusCode::OK, json!({})).await;
        let state = make_state(primary, vec![replica]);
        let app = app(state);
        let (status, body) = post_query(app, "DROP TABLE actor", "round-robin").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Incorrect action in query");
    }

    #[tokio::test]
    async fn error_response_never_carries_a_source_field() {
        let primary = spawn_fake_executor(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
        let replica = spawn_fake_executor(StatusCode::OK, json!({})).await;
        let state = make_state(primary, vec![replica]);
        let app = app(state);
        let (status, body) = post_query(app, "INSERT INTO actor VALUES (1)", "round-robin").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("source").is_none());
    }
}
