//! Dashboard statistics and liveness models.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Aggregate review statistics.
///
/// Every field falls back to zero when the backend omits it or sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_reviews: u64,

    #[serde(default, rename = "activePRs", deserialize_with = "null_as_default")]
    pub active_prs: u64,

    /// Average quality score, expected between 0 and 10.
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_quality_score: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub issues_found: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub critical_issues: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub high_issues: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub medium_issues: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub low_issues: u64,
}

/// Liveness payload from `/reviews/health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub total_reviews: Option<u64>,
}

impl HealthStatus {
    /// Whether the backend reports itself as up.
    pub fn is_up(&self) -> bool {
        self.status.as_deref() == Some("UP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_field_names() {
        let json = r#"{"totalReviews":247,"activePRs":12,"avgQualityScore":8.4,"issuesFound":89}"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_reviews, 247);
        assert_eq!(stats.active_prs, 12);
        assert_eq!(stats.avg_quality_score, 8.4);
        assert_eq!(stats.issues_found, 89);
        assert_eq!(stats.critical_issues, 0);
    }

    #[test]
    fn test_stats_missing_and_null_default_to_zero() {
        let stats: DashboardStats =
            serde_json::from_str(r#"{"totalReviews":null,"avgQualityScore":null}"#).unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_health_is_up() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"UP","service":"CodeSage Review API","totalReviews":3}"#).unwrap();
        assert!(health.is_up());
        assert_eq!(health.total_reviews, Some(3));
        assert!(!HealthStatus::default().is_up());
    }
}
