//! Data models for the dashboard.
//!
//! These models mirror the JSON records served by the review backend.
//! They are read-only snapshots: each poll cycle replaces them wholesale.

pub mod review;
pub mod stats;
pub mod system_status;

// Re-exports for convenient access
pub use review::{Review, ReviewIssue, ReviewPage, ReviewStatus};
pub use stats::{DashboardStats, HealthStatus};
pub use system_status::{ServiceHealth, ServiceStatus, SystemStatus};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
