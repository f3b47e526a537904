//! Store Module
//!
//! Document store seam for items. Reads go straight to [`DocumentStore`];
//! every write runs inside a [`Transaction`] that either commits as a whole
//! or leaves no trace.
//!
//! # Backends
//! - `memory://` - in-process store, see [`MemoryStore`]

mod memory;
mod repository;
mod transaction;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::models::{Item, ItemFilter, ItemId, ListParams, SortField};
use crate::validation::NewItem;

pub use memory::MemoryStore;
pub use repository::ItemRepository;
pub use transaction::TransactionScope;

// == Store Error ==
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid store uri: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("unsupported store scheme '{0}'")]
    UnsupportedUri(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document {0} already exists")]
    DuplicateId(ItemId),

    #[error("transaction failed: {0}")]
    Transaction(String),
}

// == Query Types ==
/// Filter, order and window for a listing.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub filter: ItemFilter,
    pub sort: SortField,
    pub skip: u64,
    pub limit: u64,
}

impl From<&ListParams> for FindOptions {
    fn from(params: &ListParams) -> Self {
        Self {
            filter: params.filter.clone(),
            sort: params.sort,
            skip: params.skip(),
            limit: params.limit,
        }
    }
}

/// One window of matching items plus the count of all matches.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub total: u64,
}

// == Store Traits ==
/// A document database holding items.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Starts a transaction. Must not be called while the same task holds
    /// another open transaction on this store.
    async fn begin(&self) -> Result<Box<dyn Transaction>, StoreError>;

    /// Committed items matching `options.filter`, sorted and windowed.
    async fn find(&self, options: &FindOptions) -> Result<Page, StoreError>;

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;
}

/// An all-or-nothing unit of writes.
///
/// Reads inside the transaction see its own uncommitted writes. Dropping a
/// transaction without calling [`Transaction::commit`] discards every write.
#[async_trait]
pub trait Transaction: Send {
    /// Persists a new item; the store assigns its id and both timestamps.
    async fn insert(&mut self, item: NewItem) -> Result<Item, StoreError>;

    async fn find_by_id(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Overwrites an existing item and refreshes `updatedAt`. `None` if absent.
    async fn replace(&mut self, item: Item) -> Result<Option<Item>, StoreError>;

    /// Deletes an item, returning it. `None` if absent.
    async fn remove(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn abort(self: Box<Self>) -> Result<(), StoreError>;
}

/// Opens the store named by a connection string.
pub fn connect(uri: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let parsed = Url::parse(uri)?;
    match parsed.scheme() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(StoreError::UnsupportedUri(other.to_string())),
    }
}
