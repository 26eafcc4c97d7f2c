//! Response types (Serialize)

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

impl HealthResponse {
    pub const HEALTHY: Self = Self { status: "healthy", database: "connected" };
    pub const UNHEALTHY: Self = Self { status: "unhealthy", database: "unavailable" };
}
