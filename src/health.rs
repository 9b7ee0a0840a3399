//! The health check route.

use axum::Json;
use serde::{Deserialize, Serialize};

/// The body of the health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "OK" while the server is able to answer.
    pub status: String,
    /// A short human readable description.
    pub message: String,
}

/// Report that the server is running.
pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_owned(),
        message: "Server is running".to_owned(),
    })
}
