//! Response DTOs for the item API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::Item;

/// Pagination block of the list response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Response body for GET /items
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub items: Vec<Item>,
    pub pagination: Pagination,
}

/// Response body for DELETE /items/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Item deleted successfully".to_string(),
        }
    }
}

/// Cache counters reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheReport {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Absent when the cache backend keeps no counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheReport>,
}

impl HealthResponse {
    pub fn healthy(cache: Option<CacheStats>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache: cache.map(CacheReport::from),
        }
    }
}

/// A pre-serialized JSON payload.
///
/// Read handlers answer with this whether the body came from the cache or was
/// just serialized, so a hit is returned byte-for-byte as it was stored.
#[derive(Debug, Clone)]
pub struct JsonPayload(pub String);

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.0,
        )
            .into_response()
    }
}
