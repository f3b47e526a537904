//! Request DTOs for the item API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.
//! Fields are optional, untyped JSON values so that a missing or mistyped
//! field becomes an itemized validation error instead of a body rejection.

use serde::Deserialize;
use serde_json::Value;

/// Request body for POST /items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
}

/// Request body for PUT /items/:id
///
/// Any subset of fields may be sent; absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
}

/// Raw query string for GET /items
///
/// Values stay as strings; [`crate::models::ListParams`] applies defaults and
/// the filter policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItemsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub filters: Option<String>,
}
