//! Domain and transport models for the item API
//!
//! The stored `Item`, the request/response DTOs, and the typed list query.

pub mod item;
pub mod query;
pub mod requests;
pub mod responses;

pub use item::{Item, ItemId};
pub use query::{FieldMatch, ItemFilter, ListParams, SortField};
pub use requests::{CreateItemRequest, ListItemsQuery, UpdateItemRequest};
pub use responses::{
    CacheReport, DeleteResponse, HealthResponse, JsonPayload, ListResponse, Pagination,
};
