//! Dashboard data sources.
//!
//! A [`DashboardSource`] produces one complete snapshot of stats and recent
//! reviews. The engine is handed a primary source (normally [`LiveSource`])
//! and a fallback source (normally [`DemoSource`]) and picks between them.

use crate::error::AppError;
use crate::models::{DashboardStats, Review};
use crate::services::reviews_client::ReviewsClient;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::future::Future;

/// Stats and recent reviews fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_reviews: Vec<Review>,
}

/// Something that can produce a dashboard snapshot.
pub trait DashboardSource: Send + Sync + 'static {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Load a complete snapshot. Partial results are never returned.
    fn load(&self) -> impl Future<Output = Result<DashboardSnapshot, AppError>> + Send;
}

/// Snapshot source backed by the review API.
#[derive(Debug, Clone)]
pub struct LiveSource {
    client: ReviewsClient,
}

impl LiveSource {
    pub fn new(client: ReviewsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ReviewsClient {
        &self.client
    }
}

impl DashboardSource for LiveSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn load(&self) -> Result<DashboardSnapshot, AppError> {
        // Both requests must succeed; the first failure aborts the pair.
        let (stats, recent_reviews) =
            tokio::try_join!(self.client.get_stats(), self.client.get_recent())?;

        Ok(DashboardSnapshot {
            stats,
            recent_reviews,
        })
    }
}

/// Fixed demonstration dataset, used when the backend cannot be reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl DashboardSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn load(&self) -> Result<DashboardSnapshot, AppError> {
        Ok(demo_snapshot(Utc::now()))
    }
}

/// Build the demonstration snapshot with timestamps relative to `now`.
pub fn demo_snapshot(now: DateTime<Utc>) -> DashboardSnapshot {
    let stats = DashboardStats {
        total_reviews: 247,
        active_prs: 12,
        avg_quality_score: 8.4,
        issues_found: 89,
        ..Default::default()
    };

    let recent_reviews = vec![
        demo_review(1, 42, "Fix authentication bug in login flow", "backend", "COMPLETED", Some(8.5), now - Duration::hours(2)),
        demo_review(2, 38, "Add user profile management feature", "frontend", "COMPLETED", Some(9.2), now - Duration::hours(5)),
        demo_review(3, 35, "Optimize database queries for analytics", "backend", "COMPLETED", Some(7.8), now - Duration::days(1)),
        demo_review(4, 31, "Implement real-time notifications", "backend", "PENDING", None, now - Duration::days(2)),
        demo_review(5, 28, "Update dependencies and fix vulnerabilities", "backend", "COMPLETED", Some(9.5), now - Duration::days(3)),
    ];

    DashboardSnapshot {
        stats,
        recent_reviews,
    }
}

fn demo_review(
    id: i64,
    pr_number: i64,
    title: &str,
    repository: &str,
    status: &str,
    quality_score: Option<f64>,
    created_at: DateTime<Utc>,
) -> Review {
    Review {
        id,
        pr_number,
        pr_title: title.to_string(),
        repository_owner: "codesage".to_string(),
        repository_name: repository.to_string(),
        status: status.to_string(),
        quality_score,
        created_at: Some(created_at.to_rfc3339()),
        pr_url: Some(format!(
            "https://github.com/codesage/{}/pull/{}",
            repository, pr_number
        )),
        pr_author: None,
        analysis_summary: None,
        ai_provider: None,
        ai_model: None,
        updated_at: None,
        error_message: None,
        issues: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewStatus;

    #[test]
    fn test_demo_snapshot_contents() {
        let snapshot = demo_snapshot(Utc::now());

        assert_eq!(snapshot.stats.total_reviews, 247);
        assert_eq!(snapshot.stats.active_prs, 12);
        assert_eq!(snapshot.stats.avg_quality_score, 8.4);
        assert_eq!(snapshot.stats.issues_found, 89);

        let numbers: Vec<i64> = snapshot.recent_reviews.iter().map(|r| r.pr_number).collect();
        assert_eq!(numbers, vec![42, 38, 35, 31, 28]);
    }

    #[test]
    fn test_demo_pending_review_is_unscored() {
        let snapshot = demo_snapshot(Utc::now());
        let pending = &snapshot.recent_reviews[3];
        assert_eq!(pending.status_enum(), ReviewStatus::Pending);
        assert_eq!(pending.quality_score, None);
        assert_eq!(
            pending.pr_url.as_deref(),
            Some("https://github.com/codesage/backend/pull/31")
        );
    }

    #[test]
    fn test_demo_timestamps_relative_to_now() {
        let now = Utc::now();
        let snapshot = demo_snapshot(now);
        let first = snapshot.recent_reviews[0].created_at_utc().unwrap();
        assert_eq!((now - first).num_hours(), 2);
    }

    #[tokio::test]
    async fn test_demo_source_never_fails() {
        let snapshot = DemoSource.load().await.unwrap();
        assert_eq!(snapshot.recent_reviews.len(), 5);
    }
}
