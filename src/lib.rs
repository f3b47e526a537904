//! Item Service - A cached, transactional REST API for catalog items
//!
//! Provides CRUD over items in a document store, with a read-through
//! response cache in front of the read endpoints.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod tasks;
pub mod validation;

pub use api::{create_router, AppState};
pub use config::{Config, LogFormat};
pub use error::{Result, ServiceError};
pub use tasks::spawn_cleanup_task;
