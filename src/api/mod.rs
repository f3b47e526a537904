//! API Module
//!
//! HTTP handlers and routing for the item REST API.
//!
//! # Endpoints
//! - `POST /items` - Create an item
//! - `GET /items` - List items with pagination, sorting and filters
//! - `GET /items/:id` - Fetch one item
//! - `PUT /items/:id` - Partially update an item
//! - `DELETE /items/:id` - Delete an item
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
