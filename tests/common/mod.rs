//! Shared helpers for integration tests: an in-process stub of the review
//! backend served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use codesage_dashboard::services::{ReviewsClient, ReviewsClientConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A request seen by the stub backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    /// Path and query, e.g. `/api/reviews?page=0&size=10`.
    pub path_and_query: String,
    pub content_type: Option<String>,
}

/// Log of requests received by a stub backend.
pub type RequestLog = Arc<Mutex<Vec<SeenRequest>>>;

pub fn record(log: &RequestLog, uri: &Uri, headers: &HeaderMap) {
    log.lock().unwrap().push(SeenRequest {
        path_and_query: uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
    });
}

/// Serve `app` on 127.0.0.1 and return the API base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// Base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:9/api".to_string()
}

pub fn client_for(base_url: &str) -> ReviewsClient {
    ReviewsClient::new(ReviewsClientConfig {
        base_url: base_url.to_string(),
        timeout_secs: 2,
    })
    .unwrap()
}

pub fn stats_json() -> Value {
    json!({
        "totalReviews": 247,
        "activePRs": 12,
        "avgQualityScore": 8.4,
        "issuesFound": 89,
        "criticalIssues": 3,
        "highIssues": 10,
        "mediumIssues": 40,
        "lowIssues": 36
    })
}

/// Five reviews with PR numbers 101..=105, newest first.
pub fn recent_json() -> Value {
    let now = Utc::now();
    let reviews: Vec<Value> = (0..5)
        .map(|i: i64| {
            let (score, status) = if i == 4 {
                (Value::Null, "PENDING")
            } else {
                (json!(6.5 + i as f64), "COMPLETED")
            };
            json!({
                "id": 500 + i,
                "repositoryOwner": "acme",
                "repositoryName": "widgets",
                "prNumber": 101 + i,
                "prTitle": format!("Widget change {}", i + 1),
                "prAuthor": "dev",
                "prUrl": format!("https://github.com/acme/widgets/pull/{}", 101 + i),
                "qualityScore": score,
                "status": status,
                "issues": [],
                "createdAt": (now - Duration::hours(i + 1)).to_rfc3339(),
            })
        })
        .collect();
    Value::Array(reviews)
}

/// Backend that answers stats and recent reviews successfully.
pub fn healthy_backend(log: RequestLog) -> Router {
    let stats_log = log.clone();
    let recent_log = log.clone();
    Router::new()
        .route(
            "/api/reviews/stats",
            get(move |uri: Uri, headers: HeaderMap| {
                let log = stats_log.clone();
                async move {
                    record(&log, &uri, &headers);
                    Json(stats_json())
                }
            }),
        )
        .route(
            "/api/reviews/recent",
            get(move |uri: Uri, headers: HeaderMap| {
                let log = recent_log.clone();
                async move {
                    record(&log, &uri, &headers);
                    Json(recent_json())
                }
            }),
        )
}

/// Backend whose stats endpoint fails with 500 while recent reviews succeed.
pub fn broken_stats_backend() -> Router {
    Router::new()
        .route(
            "/api/reviews/stats",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"}))) }),
        )
        .route("/api/reviews/recent", get(|| async { Json(recent_json()) }))
}
