//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use item_service::{
    cache::{CacheError, MemoryCache, ResponseCache},
    create_router,
    models::{Item, ItemId},
    store::{DocumentStore, FindOptions, MemoryStore, Page, StoreError, Transaction},
    validation::NewItem,
    AppState,
};

// == Counting Store ==
/// Forwards to a [`MemoryStore`] and counts listing queries.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    finds: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, StoreError> {
        self.inner.begin().await
    }

    async fn find(&self, options: &FindOptions) -> Result<Page, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(options).await
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.find_by_id(id).await
    }
}

// == Faulty Store ==
/// Forwards to a [`MemoryStore`] but every commit fails after the writes
/// were staged.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, StoreError> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FaultyTransaction { inner }))
    }

    async fn find(&self, options: &FindOptions) -> Result<Page, StoreError> {
        self.inner.find(options).await
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.find_by_id(id).await
    }
}

struct FaultyTransaction {
    inner: Box<dyn Transaction>,
}

#[async_trait]
impl Transaction for FaultyTransaction {
    async fn insert(&mut self, item: NewItem) -> Result<Item, StoreError> {
        self.inner.insert(item).await
    }

    async fn find_by_id(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn replace(&mut self, item: Item) -> Result<Option<Item>, StoreError> {
        self.inner.replace(item).await
    }

    async fn remove(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.remove(id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.abort().await?;
        Err(StoreError::Transaction("connection reset during commit".into()))
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.abort().await
    }
}

// == Failing Cache ==
/// A cache backend that is always down.
pub struct FailingCache;

#[async_trait]
impl ResponseCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

// == App Builders ==
pub fn app_with(store: Arc<dyn DocumentStore>, cache: Arc<dyn ResponseCache>) -> Router {
    create_router(AppState::new(store, cache))
}

/// Router over a fresh memory store, plus a handle to inspect that store.
pub fn memory_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let app = app_with(Arc::new(store.clone()), Arc::new(MemoryCache::new(100)));
    (app, store)
}
