//! Formatting helpers for the dashboard page.
//!
//! All functions here are pure; time-dependent helpers take `now` explicitly.

use crate::models::review::parse_timestamp;
use crate::models::ReviewStatus;
use chrono::{DateTime, Utc};

/// Visual style of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl BadgeStyle {
    /// CSS classes for the badge element.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "badge badge-success",
            Self::Warning => "badge badge-warning",
            Self::Danger => "badge badge-danger",
            Self::Neutral => "badge",
        }
    }
}

/// Label and style for a review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub style: BadgeStyle,
}

/// Map a raw review status to its badge.
pub fn status_badge(status: &str) -> StatusBadge {
    match ReviewStatus::from(status) {
        ReviewStatus::Completed => StatusBadge {
            label: "✓ Reviewed",
            style: BadgeStyle::Success,
        },
        ReviewStatus::Pending => StatusBadge {
            label: "⏳ Pending",
            style: BadgeStyle::Warning,
        },
        ReviewStatus::Failed => StatusBadge {
            label: "✗ Failed",
            style: BadgeStyle::Danger,
        },
        ReviewStatus::Unknown => StatusBadge {
            label: "Unknown",
            style: BadgeStyle::Neutral,
        },
    }
}

/// Background color band for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColor {
    Green,
    Amber,
    Red,
}

impl ScoreColor {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Green => "#10b981",
            Self::Amber => "#f59e0b",
            Self::Red => "#ef4444",
        }
    }
}

/// 9 and above is green, 7 up to 9 is amber, anything lower is red.
pub fn score_color(score: f64) -> ScoreColor {
    if score >= 9.0 {
        ScoreColor::Green
    } else if score >= 7.0 {
        ScoreColor::Amber
    } else {
        ScoreColor::Red
    }
}

/// Trend label shown under the average quality score.
pub fn quality_trend(avg_quality_score: f64) -> &'static str {
    if avg_quality_score >= 8.0 {
        "↑ Excellent"
    } else if avg_quality_score >= 6.0 {
        "→ Good"
    } else {
        "↓ Needs improvement"
    }
}

/// One decimal place.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Relative time between `timestamp` and `now`, floored to the largest unit.
///
/// Missing or unparseable timestamps yield "Unknown".
pub fn format_time_ago(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(created) = timestamp.and_then(parse_timestamp) else {
        return "Unknown".to_string();
    };

    let seconds = (now - created).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}
