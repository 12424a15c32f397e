//! Server-rendered dashboard page.
//!
//! Layout, top to bottom:
//! - Header with navigation and connection indicator
//! - Error banner with Retry (only when the snapshot carries an error)
//! - Hero metrics
//! - Stat-card grid
//! - Recent reviews table, or the empty state
//! - Static system status panel

use super::format::{format_score, format_time_ago, quality_trend, score_color, status_badge};
use crate::models::{Review, SystemStatus};
use crate::services::dashboard::{DashboardState, ViewPhase};
use chrono::{DateTime, Utc};

/// Reload interval of the loading screen, in seconds.
const LOADING_RELOAD_SECS: u64 = 1;

const STYLES: &str = r#"
:root { --primary: #6366f1; --bg: #0f172a; --card: #1e293b; --muted: #94a3b8; --text: #e2e8f0; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
a { color: inherit; text-decoration: none; }
.header { border-bottom: 1px solid #334155; }
.header-content, .main, .footer { max-width: 1200px; margin: 0 auto; padding: 1rem 1.5rem; }
.header-content { display: flex; justify-content: space-between; align-items: center; }
.logo { font-size: 1.4rem; font-weight: 700; display: flex; gap: 0.5rem; }
.gradient-text { background: linear-gradient(90deg, #6366f1, #ec4899); -webkit-background-clip: text; color: transparent; }
.nav { display: flex; gap: 1.25rem; align-items: center; }
.nav-link { color: var(--muted); }
.status-indicator { display: flex; gap: 0.5rem; align-items: center; font-size: 0.9rem; }
.status-dot { width: 10px; height: 10px; border-radius: 50%; display: inline-block; }
.status-dot.success { background: #10b981; }
.status-dot.error { background: #ef4444; }
.error-banner { display: flex; justify-content: space-between; align-items: center; background: #7f1d1d; padding: 1rem; border-radius: 8px; margin-bottom: 1.5rem; }
.hero { text-align: center; padding: 2rem 0; }
.hero-subtitle { color: var(--muted); max-width: 640px; margin: 0 auto 1.5rem; }
.hero-stats { display: flex; justify-content: center; gap: 3rem; }
.hero-stat-value { font-size: 2rem; font-weight: 700; }
.hero-stat-label, .stat-label, .pr-repo, .timestamp, .text-muted, .stat-change { color: var(--muted); font-size: 0.9rem; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1rem; margin: 1.5rem 0; }
.stat-card, .system-status, .reviews-table, .empty-state { background: var(--card); border-radius: 12px; padding: 1.25rem; }
.stat-header { display: flex; justify-content: space-between; }
.stat-value { font-size: 1.75rem; font-weight: 700; }
.stat-icon { font-size: 1.5rem; }
.stat-change.positive { color: #10b981; }
.section { margin: 2rem 0; }
.section-header { display: flex; justify-content: space-between; align-items: center; }
.table { width: 100%; border-collapse: collapse; }
.table th, .table td { text-align: left; padding: 0.75rem; border-bottom: 1px solid #334155; }
.badge { padding: 0.25rem 0.6rem; border-radius: 999px; background: #334155; font-size: 0.8rem; }
.badge-success { background: #065f46; }
.badge-warning { background: #78350f; }
.badge-danger { background: #7f1d1d; }
.score { display: inline-block; padding: 0.25rem 0.6rem; border-radius: 6px; color: #fff; font-weight: 600; }
.btn { border: none; border-radius: 8px; padding: 0.6rem 1.2rem; cursor: pointer; font: inherit; }
.btn-primary { background: var(--primary); color: #fff; }
.btn-secondary { background: #334155; color: var(--text); }
.btn-small { padding: 0.5rem 1rem; font-size: 0.85rem; }
.status-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; }
.status-item { display: flex; gap: 0.75rem; align-items: flex-start; }
.status-info h4 { margin: 0; }
.status-info p { margin: 0.25rem 0 0; color: var(--muted); }
.loading-container { display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; }
.loading-spinner { width: 48px; height: 48px; border: 4px solid #334155; border-top-color: var(--primary); border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.footer { text-align: center; color: var(--muted); }
"#;

/// Everything needed to render the page once.
pub struct DashboardPage<'a> {
    pub state: &'a DashboardState,
    pub system_status: &'a SystemStatus,

    /// Wall-clock time used for relative timestamps.
    pub now: DateTime<Utc>,

    /// Browser reload interval in seconds.
    pub refresh_secs: u64,
}

impl DashboardPage<'_> {
    /// Render the full HTML document.
    pub fn render(&self) -> String {
        let phase = self.state.phase();
        let body = match phase {
            ViewPhase::Loading => loading_html(),
            ViewPhase::ErrorWithoutData => format!(
                "{header}\n<main class=\"main\">\n{banner}\n{reviews}\n{system}\n</main>\n{footer}",
                header = self.header_html(),
                banner = self.error_banner_html(),
                reviews = self.reviews_html(),
                system = system_status_html(self.system_status),
                footer = footer_html(),
            ),
            ViewPhase::Ready | ViewPhase::ErrorWithStaleData => format!(
                "{header}\n<main class=\"main\">\n{banner}\n{hero}\n{cards}\n{reviews}\n{system}\n</main>\n{footer}",
                header = self.header_html(),
                banner = self.error_banner_html(),
                hero = self.hero_html(),
                cards = self.stat_cards_html(),
                reviews = self.reviews_html(),
                system = system_status_html(self.system_status),
                footer = footer_html(),
            ),
        };

        html_doc(self.reload_secs(phase), &body)
    }

    /// The spinner page reloads quickly so it disappears once the first cycle lands.
    fn reload_secs(&self, phase: ViewPhase) -> u64 {
        match phase {
            ViewPhase::Loading => LOADING_RELOAD_SECS.min(self.refresh_secs),
            _ => self.refresh_secs,
        }
    }

    fn header_html(&self) -> String {
        let (dot, label) = if self.state.error.is_some() {
            ("error", "Connection Error")
        } else {
            ("success", "System Online")
        };

        let links: String = [
            ("#dashboard", "Dashboard"),
            ("#reviews", "Reviews"),
            ("#analytics", "Analytics"),
            ("#settings", "Settings"),
        ]
        .iter()
        .map(|(href, label)| format!(r#"<a href="{href}" class="nav-link">{label}</a>"#))
        .collect::<Vec<_>>()
        .join("\n            ");

        format!(
            r#"<header class="header">
    <div class="header-content">
        <a href="/" class="logo"><span class="logo-icon">🧙‍♂️</span><span class="gradient-text">CodeSage</span></a>
        <nav class="nav">
            {links}
            <div class="status-indicator"><span class="status-dot {dot}"></span><span>{label}</span></div>
        </nav>
    </div>
</header>"#
        )
    }

    fn error_banner_html(&self) -> String {
        match &self.state.error {
            Some(error) => format!(
                r#"<div class="error-banner">
    <span>⚠️ {}</span>
    <form method="post" action="/refresh"><button type="submit" class="btn btn-secondary">Retry</button></form>
</div>"#,
                escape_html(error)
            ),
            None => String::new(),
        }
    }

    fn hero_html(&self) -> String {
        let stats = &self.state.stats;
        format!(
            r#"<section class="hero">
    <h1>Welcome to <span class="gradient-text">CodeSage</span></h1>
    <p class="hero-subtitle">AI-powered code review assistant that helps you maintain code quality, catch bugs, and follow best practices automatically.</p>
    <div class="hero-stats">
        <div class="hero-stat"><div class="hero-stat-value">{total}</div><div class="hero-stat-label">Total Reviews</div></div>
        <div class="hero-stat"><div class="hero-stat-value">{active}</div><div class="hero-stat-label">Active PRs</div></div>
        <div class="hero-stat"><div class="hero-stat-value">{avg}</div><div class="hero-stat-label">Avg Score</div></div>
    </div>
</section>"#,
            total = stats.total_reviews,
            active = stats.active_prs,
            avg = format_score(stats.avg_quality_score),
        )
    }

    fn stat_cards_html(&self) -> String {
        let stats = &self.state.stats;
        let freshness = if self.state.loading {
            "Updating..."
        } else {
            "Live data"
        };

        let cards = [
            stat_card(&stats.total_reviews.to_string(), "Pull Requests Analyzed", "📊", freshness, true),
            stat_card(
                &format_score(stats.avg_quality_score),
                "Average Code Quality",
                "⭐",
                quality_trend(stats.avg_quality_score),
                true,
            ),
            stat_card(&stats.issues_found.to_string(), "Issues Detected", "🐛", "Total across all reviews", false),
            stat_card(&stats.active_prs.to_string(), "Active Pull Requests", "🔄", "Currently in queue", false),
        ];

        format!("<div class=\"stats-grid\">\n{}\n</div>", cards.join("\n"))
    }

    fn reviews_html(&self) -> String {
        let button = if self.state.loading {
            "Refreshing..."
        } else {
            "Refresh"
        };

        let content = if self.state.recent_reviews.is_empty() {
            let message = if self.state.origin.is_none() {
                "No dashboard data available yet."
            } else {
                "No reviews yet. Create a Pull Request to get started!"
            };
            format!(r#"<div class="empty-state"><p>{message}</p></div>"#)
        } else {
            let rows: String = self
                .state
                .recent_reviews
                .iter()
                .map(|review| review_row(review, self.now))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                r#"<div class="reviews-table">
    <table class="table">
        <thead><tr><th>PR #</th><th>Title &amp; Repository</th><th>Status</th><th>Score</th><th>Time</th><th>Actions</th></tr></thead>
        <tbody>
{rows}
        </tbody>
    </table>
</div>"#
            )
        };

        format!(
            r#"<section class="section" id="reviews">
    <div class="section-header">
        <h2 class="section-title">Recent Reviews</h2>
        <form method="post" action="/refresh"><button type="submit" class="btn btn-primary">{button}</button></form>
    </div>
    {content}
</section>"#
        )
    }
}

fn stat_card(value: &str, label: &str, icon: &str, change: &str, positive: bool) -> String {
    let change_class = if positive {
        "stat-change positive"
    } else {
        "stat-change"
    };
    format!(
        r#"<div class="stat-card">
    <div class="stat-header">
        <div><div class="stat-value">{value}</div><div class="stat-label">{label}</div></div>
        <div class="stat-icon">{icon}</div>
    </div>
    <div class="{change_class}">{change}</div>
</div>"#
    )
}

/// One table row. Unscored reviews show "-".
fn review_row(review: &Review, now: DateTime<Utc>) -> String {
    let badge = status_badge(&review.status);

    let score = match review.quality_score {
        Some(score) => format!(
            r#"<div class="score" style="background: {}">{}</div>"#,
            score_color(score).hex(),
            format_score(score)
        ),
        None => r#"<span class="text-muted">-</span>"#.to_string(),
    };

    let action = match review.pr_url.as_deref().filter(|url| is_web_url(url)) {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="btn btn-secondary btn-small">View PR</a>"#,
            escape_html(url)
        ),
        None => r#"<button type="button" class="btn btn-secondary btn-small">View Details</button>"#.to_string(),
    };

    format!(
        r#"            <tr class="review-row" data-pr="{number}">
                <td><strong>#{number}</strong></td>
                <td><div class="pr-title">{title}</div><div class="pr-repo">{repo}</div></td>
                <td><span class="{badge_class}">{badge_label}</span></td>
                <td>{score}</td>
                <td class="timestamp">{time}</td>
                <td>{action}</td>
            </tr>"#,
        number = review.pr_number,
        title = escape_html(&review.pr_title),
        repo = escape_html(&review.repository_full_name()),
        badge_class = badge.style.css_class(),
        badge_label = badge.label,
        time = format_time_ago(review.created_at.as_deref(), now),
    )
}

fn system_status_html(system: &SystemStatus) -> String {
    let items: String = system
        .services()
        .iter()
        .map(|service| {
            format!(
                r#"        <div class="status-item"><span class="status-dot success"></span><div class="status-info"><h4>{}</h4><p>{}</p></div></div>"#,
                service.label, service.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<section class="section">
    <div class="section-header"><h2 class="section-title">System Status</h2></div>
    <div class="system-status">
    <div class="status-grid">
{items}
    </div>
    </div>
</section>"#
    )
}

fn footer_html() -> &'static str {
    r#"<footer class="footer">
    <p>Made with ❤️ by CodeSage Team • Powered by AI • <a href="https://github.com" style="color: var(--primary); margin-left: 0.5rem;">View on GitHub</a></p>
</footer>"#
}

fn loading_html() -> String {
    r#"<div class="loading-container">
    <div class="loading-spinner"></div>
    <p>Loading CodeSage Dashboard...</p>
</div>"#
        .to_string()
}

/// HTML document wrapper.
fn html_doc(refresh_secs: u64, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="{refresh_secs}">
    <title>CodeSage Dashboard</title>
    <style>{STYLES}</style>
</head>
<body>
<div class="app">
{body}
</div>
</body>
</html>"#
    )
}

/// Only http(s) links are rendered as anchors; other schemes (`javascript:`,
/// `data:`) would run in the dashboard's origin.
fn is_web_url(url: &str) -> bool {
    let url = url.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
