//! Review model.

use super::null_as_default;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Completed,
    Pending,
    Failed,
    Unknown,
}

impl From<&str> for ReviewStatus {
    fn from(s: &str) -> Self {
        match s {
            "COMPLETED" => Self::Completed,
            "PENDING" => Self::Pending,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "COMPLETED"),
            Self::Pending => write!(f, "PENDING"),
            Self::Failed => write!(f, "FAILED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// An issue found by the reviewer in a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIssue {
    #[serde(default)]
    pub id: Option<i64>,

    /// Issue category, e.g. `BUG`, `SECURITY`, `STYLE`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub issue_type: String,

    /// `CRITICAL`, `HIGH`, `MEDIUM` or `LOW`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub file_path: String,

    #[serde(default)]
    pub line_number: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

/// A pull-request review as served by the backend.
///
/// Strings the backend may send as `null` deserialize to empty strings;
/// `quality_score` stays `None` until the review has been scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Backend review ID.
    pub id: i64,

    /// Pull request number within its repository.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pr_number: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pr_title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub repository_owner: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub repository_name: String,

    /// Raw status string: `COMPLETED`, `PENDING`, `FAILED` or anything else.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Quality score out of 10, `None` when not yet scored.
    #[serde(default)]
    pub quality_score: Option<f64>,

    /// Creation time (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,

    /// Link to the pull request on the forge.
    #[serde(default)]
    pub pr_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ReviewIssue>,
}

impl Review {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> ReviewStatus {
        ReviewStatus::from(self.status.as_str())
    }

    /// `owner/name` of the reviewed repository.
    pub fn repository_full_name(&self) -> String {
        format!("{}/{}", self.repository_owner, self.repository_name)
    }

    /// Parse `created_at` into a UTC timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an ISO 8601 timestamp.
///
/// Offset-less timestamps are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .ok()
        })
}

/// One page of reviews from a paginated endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<Review>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_elements: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,

    /// Zero-based page number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(ReviewStatus::from("COMPLETED"), ReviewStatus::Completed);
        assert_eq!(ReviewStatus::from("PENDING"), ReviewStatus::Pending);
        assert_eq!(ReviewStatus::from("FAILED"), ReviewStatus::Failed);
        assert_eq!(ReviewStatus::from("completed"), ReviewStatus::Unknown);
        assert_eq!(ReviewStatus::from("BOGUS"), ReviewStatus::Unknown);
    }

    #[test]
    fn test_review_from_backend_json() {
        let json = r#"{
            "id": 7,
            "repositoryOwner": "codesage",
            "repositoryName": "backend",
            "prNumber": 42,
            "prTitle": "Fix login",
            "prAuthor": "octocat",
            "prUrl": null,
            "qualityScore": null,
            "status": "PENDING",
            "issues": null,
            "createdAt": "2024-01-15T10:30:00Z"
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.pr_number, 42);
        assert_eq!(review.status_enum(), ReviewStatus::Pending);
        assert_eq!(review.quality_score, None);
        assert_eq!(review.pr_url, None);
        assert!(review.issues.is_empty());
        assert_eq!(review.repository_full_name(), "codesage/backend");
        assert_eq!(review.pr_author.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_null_strings_become_empty() {
        let review: Review = serde_json::from_str(r#"{"id": 1, "prTitle": null, "status": null}"#).unwrap();
        assert_eq!(review.pr_title, "");
        assert_eq!(review.status_enum(), ReviewStatus::Unknown);
    }

    #[test]
    fn test_parse_timestamp() {
        let a = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        let b = parse_timestamp("2024-01-15T10:30:00+00:00").unwrap();
        let c = parse_timestamp("2024-01-15T10:30:00.000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_review_page_defaults() {
        let page: ReviewPage = serde_json::from_str(r#"{"content": [{"id": 3, "prNumber": 5}], "number": 0}"#).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 0);
        assert!(!page.last);
    }
}
