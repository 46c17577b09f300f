use serde::{Deserialize, Serialize};

/// Body accepted by the Gatekeeper's `POST /start`.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

/// Body forwarded by the Gatekeeper to the Trusted Host's `POST /validate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub query: String,
    #[serde(rename = "Authorization")]
    pub authorization: bool,
    pub strategy: String,
}

/// Body forwarded by the Trusted Host to the Proxy's `POST /query`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub strategy: String,
}

/// Body the Proxy sends to an Executor's `POST /execute`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub query: String,
}

/// First SQL keyword, classified case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Insert,
    Delete,
    Other,
}

impl QueryKind {
    pub fn classify(query: &str) -> Self {
        let leading = query.trim_start().split_whitespace().next().unwrap_or("");
        match leading.to_ascii_lowercase().as_str() {
            "select" => QueryKind::Select,
            "insert" => QueryKind::Insert,
            "delete" => QueryKind::Delete,
            _ => QueryKind::Other,
        }
    }

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::Delete => "delete",
            QueryKind::Other => "other",
        }
    }
}
