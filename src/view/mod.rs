//! Dashboard rendering.
//!
//! Pure functions of the engine's state: `format` holds the small display
//! helpers, `page` assembles the HTML document.

pub mod format;
pub mod page;

pub use format::{
    format_score, format_time_ago, quality_trend, score_color, status_badge, BadgeStyle,
    ScoreColor, StatusBadge,
};
pub use page::DashboardPage;
