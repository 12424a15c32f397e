//! CodeSage review API client.
//!
//! Provides a typed HTTP client for the `/reviews` endpoints with request
//! logging and centralized error normalization.

use crate::config::{DashboardConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::AppError;
use crate::models::{DashboardStats, HealthStatus, Review, ReviewPage};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Review API client configuration.
#[derive(Debug, Clone)]
pub struct ReviewsClientConfig {
    /// Base URL including the API prefix (e.g., `http://localhost:8080/api`).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReviewsClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl From<&DashboardConfig> for ReviewsClientConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

/// Pagination parameters for the paged review endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,

    /// Page size.
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// Review API client.
#[derive(Debug, Clone)]
pub struct ReviewsClient {
    client: Client,
    config: ReviewsClientConfig,
}

impl ReviewsClient {
    /// Create a new review API client.
    pub fn new(config: ReviewsClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Issue a GET request and decode the JSON body.
    ///
    /// Logs the method and URL before dispatch and normalizes every failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&impl Serialize>,
    ) -> Result<T, AppError> {
        let url = self.api_url(endpoint);
        log::info!("[api] GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(q) = query {
            request = request.query(q);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("[api] Response error: {}", e);
            AppError::from(e)
        })?;

        self.handle_response(response, endpoint).await
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| {
                    log::error!("[api] Failed to read response body: {}", e);
                    AppError::from(e)
                });
        }

        let body = response.text().await.unwrap_or_default();
        log::error!("[api] Response error: {} {}", status.as_u16(), body);

        Err(normalize_error_status(status, &body, endpoint))
    }

    /// Get all reviews, one page at a time.
    pub async fn get_all(&self, page: PageRequest) -> Result<ReviewPage, AppError> {
        self.get_json("/reviews", Some(&page)).await
    }

    /// Get a single review by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Review, AppError> {
        let endpoint = format!("/reviews/{}", id);
        self.get_json(&endpoint, None::<&()>).await
    }

    /// Get reviews for one repository.
    pub async fn get_by_repository(
        &self,
        owner: &str,
        name: &str,
        page: PageRequest,
    ) -> Result<ReviewPage, AppError> {
        let endpoint = format!(
            "/reviews/repo/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );
        self.get_json(&endpoint, Some(&page)).await
    }

    /// Get reviews from the last 7 days, in backend order.
    pub async fn get_recent(&self) -> Result<Vec<Review>, AppError> {
        let reviews: Option<Vec<Review>> = self.get_json("/reviews/recent", None::<&()>).await?;
        Ok(reviews.unwrap_or_default())
    }

    /// Get dashboard statistics.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        self.get_json("/reviews/stats", None::<&()>).await
    }

    /// Backend liveness check.
    pub async fn health_check(&self) -> Result<HealthStatus, AppError> {
        self.get_json("/reviews/health", None::<&()>).await
    }
}

/// Map an error status and body to the normalized error vocabulary.
pub fn normalize_error_status(status: StatusCode, body: &str, endpoint: &str) -> AppError {
    let status_code = status.as_u16();

    match status {
        StatusCode::NOT_FOUND => AppError::not_found(endpoint),
        StatusCode::INTERNAL_SERVER_ERROR => AppError::server_error(endpoint),
        _ => match body_message(body) {
            Some(message) => AppError::validation(message, status_code),
            None => AppError::http_status(
                format!("Request failed with status code {}", status_code),
                status_code,
            ),
        },
    }
}

/// Extract a non-empty `message` field from a JSON error body.
fn body_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        // Sometimes "message" is an object like {"field":["msg"]}
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_construction() {
        let client = ReviewsClient::new(ReviewsClientConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.api_url("/reviews/stats"),
            "http://localhost:8080/api/reviews/stats"
        );
    }

    #[test]
    fn test_default_page_request() {
        let page = PageRequest::default();
        assert_eq!(page.page, 0);
        assert_eq!(page.size, 10);
    }

    #[test]
    fn test_normalize_not_found_and_server_error() {
        let err = normalize_error_status(StatusCode::NOT_FOUND, r#"{"message":"nope"}"#, "/reviews/1");
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Resource not found");

        let err = normalize_error_status(StatusCode::INTERNAL_SERVER_ERROR, "", "/reviews/stats");
        assert_eq!(err.to_string(), "Server error. Please try again later.");
    }

    #[test]
    fn test_normalize_body_message() {
        let err = normalize_error_status(
            StatusCode::BAD_REQUEST,
            r#"{"status":400,"message":"size must be positive"}"#,
            "/reviews",
        );
        assert!(matches!(err, AppError::Validation { status_code: Some(400), .. }));
        assert_eq!(err.to_string(), "size must be positive");
    }

    #[test]
    fn test_normalize_without_message_passes_through() {
        let err = normalize_error_status(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>", "/reviews");
        assert!(matches!(err, AppError::Http { status_code: Some(503), .. }));
        assert_eq!(err.to_string(), "Request failed with status code 503");

        let err = normalize_error_status(StatusCode::BAD_GATEWAY, r#"{"message":""}"#, "/reviews");
        assert!(matches!(err, AppError::Http { .. }));
    }
}
