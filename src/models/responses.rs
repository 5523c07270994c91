use serde::{Deserialize, Serialize};

use crate::models::domain::StoreCounts;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Application submission response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationResponse {
    pub ok: bool,
    #[serde(rename = "applicationId")]
    pub application_id: String,
}

/// Store connectivity report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbStatusResponse {
    pub connected: bool,
    pub store: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<StoreCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Seed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub ok: bool,
    pub counts: StoreCounts,
}
