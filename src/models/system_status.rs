//! Static system status panel.

use serde::Serialize;

/// Health of one supporting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    Online,
    Ready,
}

/// A single service descriptor shown in the system status panel.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Panel heading, e.g. "Backend API".
    pub label: &'static str,
    pub status: ServiceHealth,
    pub message: &'static str,
}

/// The four services the dashboard reports on.
///
/// These are fixed at startup and never refreshed.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub backend: ServiceStatus,
    pub database: ServiceStatus,
    pub queue: ServiceStatus,
    pub ai: ServiceStatus,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            backend: ServiceStatus {
                label: "Backend API",
                status: ServiceHealth::Online,
                message: "Running on port 8080",
            },
            database: ServiceStatus {
                label: "PostgreSQL",
                status: ServiceHealth::Online,
                message: "PostgreSQL 15.2",
            },
            queue: ServiceStatus {
                label: "RabbitMQ",
                status: ServiceHealth::Online,
                message: "RabbitMQ 3.13.7",
            },
            ai: ServiceStatus {
                label: "AI Service",
                status: ServiceHealth::Ready,
                message: "GPT-4 / Claude",
            },
        }
    }
}

impl SystemStatus {
    /// Services in panel order.
    pub fn services(&self) -> [&ServiceStatus; 4] {
        [&self.backend, &self.database, &self.queue, &self.ai]
    }
}
