//! API Handlers
//!
//! One handler per item operation. Each runs
//! validate → store (transactional for writes) → cache → respond.
//! Cache failures are logged and otherwise ignored; a request never fails
//! because of the cache.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, error, info, warn};

use crate::cache::{self, ResponseCache};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{
    CreateItemRequest, DeleteResponse, HealthResponse, Item, ItemId, JsonPayload,
    ListItemsQuery, ListParams, ListResponse, Pagination, UpdateItemRequest,
};
use crate::store::{DocumentStore, ItemRepository};
use crate::validation::{validate_create, validate_update};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub items: ItemRepository,
    pub cache: Arc<dyn ResponseCache>,
    pub cache_ttl: Duration,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Creates state over the given store and cache with default settings.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn ResponseCache>) -> Self {
        Self::from_config(&Config::default(), store, cache)
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn ResponseCache>,
    ) -> Self {
        Self {
            items: ItemRepository::new(store),
            cache,
            cache_ttl: config.cache_ttl(),
            default_page_limit: config.default_page_limit,
            max_page_limit: config.max_page_limit,
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

// == Cache Access ==
async fn cache_lookup(state: &AppState, key: &str) -> Option<String> {
    match state.cache.get(key).await {
        Ok(Some(hit)) => {
            debug!(key, "cache hit");
            Some(hit)
        }
        Ok(None) => {
            debug!(key, "cache miss");
            None
        }
        Err(err) => {
            warn!(key, error = %err, "cache read failed, treating as miss");
            None
        }
    }
}

async fn cache_fill(state: &AppState, key: &str, payload: String) {
    if let Err(err) = state.cache.set(key, payload, state.cache_ttl).await {
        warn!(key, error = %err, "cache write failed");
    }
}

async fn cache_invalidate(state: &AppState, key: &str) {
    if let Err(err) = state.cache.delete(key).await {
        warn!(key, error = %err, "cache invalidation failed");
    }
}

// == Helpers ==
/// Logs server-side failures with their full detail.
fn log_failure(operation: &'static str, item_id: Option<&str>, err: &ServiceError) {
    let item_id = item_id.unwrap_or("-");
    if err.is_server_error() {
        error!(operation, item_id, error = %err, "item operation failed");
    } else {
        debug!(operation, item_id, error = %err, "item operation rejected");
    }
}

/// An id that cannot be parsed cannot exist.
fn parse_id(raw: &str) -> Result<ItemId> {
    raw.parse()
        .map_err(|_| ServiceError::NotFound(raw.to_string()))
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ServiceError::Internal(e.to_string()))
}

// == Handlers ==

/// Handler for POST /items
pub async fn create_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>)> {
    let Json(req) = payload?;
    let new_item = validate_create(req)?;

    let item = state
        .items
        .create(new_item)
        .await
        .inspect_err(|e| log_failure("create", None, e))?;

    info!(item_id = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for GET /items
pub async fn list_items(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<JsonPayload> {
    let Query(query) = query?;
    let params = ListParams::from_query(&query, state.default_page_limit, state.max_page_limit)?;

    let key = params.cache_key();
    if let Some(cached) = cache_lookup(&state, &key).await {
        return Ok(JsonPayload(cached));
    }

    let page = state
        .items
        .list(&params)
        .await
        .inspect_err(|e| log_failure("list", None, e))?;

    let response = ListResponse {
        pagination: Pagination {
            total_items: page.total,
            total_pages: params.total_pages(page.total),
            current_page: params.page,
        },
        items: page.items,
    };
    let body = to_payload(&response)?;
    cache_fill(&state, &key, body.clone()).await;

    Ok(JsonPayload(body))
}

/// Handler for GET /items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<JsonPayload> {
    let id = parse_id(&raw_id)?;

    let key = cache::item_key(&id);
    if let Some(cached) = cache_lookup(&state, &key).await {
        return Ok(JsonPayload(cached));
    }

    let item = state
        .items
        .get_by_id(&id)
        .await
        .inspect_err(|e| log_failure("get", Some(raw_id.as_str()), e))?;

    let body = to_payload(&item)?;
    cache_fill(&state, &key, body.clone()).await;

    Ok(JsonPayload(body))
}

/// Handler for PUT /items/:id
pub async fn update_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<Item>> {
    let Json(req) = payload?;
    let patch = validate_update(req)?;
    let id = parse_id(&raw_id)?;

    let item = state
        .items
        .update_by_id(&id, &patch)
        .await
        .inspect_err(|e| log_failure("update", Some(raw_id.as_str()), e))?;

    cache_invalidate(&state, &cache::item_key(&id)).await;
    info!(item_id = %id, "item updated");
    Ok(Json(item))
}

/// Handler for DELETE /items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&raw_id)?;

    state
        .items
        .delete_by_id(&id)
        .await
        .inspect_err(|e| log_failure("delete", Some(raw_id.as_str()), e))?;

    cache_invalidate(&state, &cache::item_key(&id)).await;
    info!(item_id = %id, "item deleted");
    Ok(Json(DeleteResponse::deleted()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.stats().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheStats, MemoryCache};
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    /// Cache whose every operation fails.
    struct BrokenCache;

    #[async_trait]
    impl ResponseCache for BrokenCache {
        async fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: String,
            _ttl: Duration,
        ) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
    }

    fn test_state() -> (AppState, MemoryCache) {
        let cache = MemoryCache::new(100);
        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(cache.clone()));
        (state, cache)
    }

    fn lamp() -> CreateItemRequest {
        CreateItemRequest {
            name: Some("Desk lamp".into()),
            description: Some("Adjustable LED desk lamp".into()),
            price: Some(45.into()),
        }
    }

    async fn create(state: &AppState) -> Item {
        let (status, Json(item)) = create_item(State(state.clone()), Ok(Json(lamp())))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        item
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let (state, cache) = test_state();
        let item = create(&state).await;
        assert_eq!(cache.len().await, 0, "create must not pre-populate the cache");

        let JsonPayload(body) = get_item(State(state.clone()), Path(item.id.to_string()))
            .await
            .unwrap();
        let fetched: Item = serde_json::from_str(&body).unwrap();
        assert_eq!(fetched, item);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_invalid_request() {
        let (state, _) = test_state();
        let req = CreateItemRequest {
            name: Some("ab".into()),
            ..lamp()
        };
        let result = create_item(State(state), Ok(Json(req))).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_nonexistent_and_malformed_ids() {
        let (state, _) = test_state();

        let result = get_item(State(state.clone()), Path(ItemId::generate().to_string())).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        let result = get_item(State(state), Path("not-an-id".to_string())).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_invalidates_cached_item() {
        let (state, cache) = test_state();
        let item = create(&state).await;
        get_item(State(state.clone()), Path(item.id.to_string()))
            .await
            .unwrap();

        let req = UpdateItemRequest {
            price: Some(99.into()),
            ..UpdateItemRequest::default()
        };
        let Json(updated) = update_item(State(state.clone()), Path(item.id.to_string()), Ok(Json(req)))
            .await
            .unwrap();
        assert_eq!(updated.price, 99);
        assert!(cache
            .get(&cache::item_key(&item.id))
            .await
            .unwrap()
            .is_none());

        let JsonPayload(body) = get_item(State(state), Path(item.id.to_string()))
            .await
            .unwrap();
        let fetched: Item = serde_json::from_str(&body).unwrap();
        assert_eq!(fetched.price, 99);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let (state, _) = test_state();
        let item = create(&state).await;
        get_item(State(state.clone()), Path(item.id.to_string()))
            .await
            .unwrap();

        let Json(resp) = delete_item(State(state.clone()), Path(item.id.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.message, "Item deleted successfully");

        let result = get_item(State(state), Path(item.id.to_string())).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_broken_cache_never_fails_requests() {
        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(BrokenCache));
        let item = create(&state).await;

        assert!(get_item(State(state.clone()), Path(item.id.to_string()))
            .await
            .is_ok());
        assert!(list_items(State(state.clone()), Ok(Query(ListItemsQuery::default())))
            .await
            .is_ok());

        let req = UpdateItemRequest {
            name: Some("Floor lamp".into()),
            ..UpdateItemRequest::default()
        };
        assert!(update_item(State(state.clone()), Path(item.id.to_string()), Ok(Json(req)))
            .await
            .is_ok());
        assert!(delete_item(State(state), Path(item.id.to_string()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_handler_reports_pagination() {
        let (state, _) = test_state();
        for _ in 0..3 {
            create(&state).await;
        }

        let query = ListItemsQuery {
            limit: Some("2".to_string()),
            ..ListItemsQuery::default()
        };
        let JsonPayload(body) = list_items(State(state), Ok(Query(query))).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["pagination"]["totalItems"], 3);
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["currentPage"], 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (state, _) = test_state();
        let Json(response) = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache.unwrap().hits, 0);

        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(BrokenCache));
        let Json(response) = health_handler(State(state)).await;
        assert!(response.cache.is_none());
    }

    #[test]
    fn test_default_stats_for_broken_cache_type() {
        // BrokenCache relies on the trait's default `stats`
        let stats: Option<CacheStats> = tokio_test::block_on(BrokenCache.stats());
        assert!(stats.is_none());
    }
}
