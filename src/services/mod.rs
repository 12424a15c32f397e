//! Business logic services.
//!
//! This module contains the review API client, the dashboard data sources,
//! the polling engine and the HTTP server that renders the dashboard.
//!
//! Services other than `dashboard_server` are independent of axum.

pub mod dashboard;
pub mod dashboard_server;
pub mod data_source;
pub mod reviews_client;

pub use dashboard::{DashboardEngine, DashboardHandle, DashboardState, ViewPhase};
pub use data_source::{DashboardSnapshot, DashboardSource, DemoSource, LiveSource};
pub use reviews_client::{PageRequest, ReviewsClient, ReviewsClientConfig};
