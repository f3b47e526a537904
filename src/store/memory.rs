//! In-memory document store
//!
//! Keeps committed items in a `HashMap` behind a `tokio` read/write lock.
//! A transaction owns the write lock for its whole life, so transactions are
//! serialized, and stages its writes in an overlay that is applied on commit
//! and simply dropped otherwise.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::models::{Item, ItemId};
use crate::store::{DocumentStore, FindOptions, Page, StoreError, Transaction};
use crate::validation::NewItem;

type Documents = HashMap<ItemId, Item>;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed items.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, StoreError> {
        let guard = Arc::clone(&self.documents).write_owned().await;
        Ok(Box::new(MemoryTransaction {
            committed: guard,
            staged: HashMap::new(),
        }))
    }

    async fn find(&self, options: &FindOptions) -> Result<Page, StoreError> {
        let documents = self.documents.read().await;

        let mut matching: Vec<&Item> = documents
            .values()
            .filter(|item| options.filter.matches(item))
            .collect();
        let total = matching.len() as u64;
        matching.sort_by(|a, b| options.sort.compare(a, b));

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(options.limit).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.documents.read().await.get(id).cloned())
    }
}

// == Memory Transaction ==
/// Staged writes over an exclusively held snapshot.
///
/// `Some` in `staged` is an upsert, `None` a delete.
struct MemoryTransaction {
    committed: OwnedRwLockWriteGuard<Documents>,
    staged: HashMap<ItemId, Option<Item>>,
}

impl MemoryTransaction {
    fn current(&self, id: &ItemId) -> Option<&Item> {
        match self.staged.get(id) {
            Some(staged) => staged.as_ref(),
            None => self.committed.get(id),
        }
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert(&mut self, item: NewItem) -> Result<Item, StoreError> {
        let id = ItemId::generate();
        if self.current(&id).is_some() {
            return Err(StoreError::DuplicateId(id));
        }

        let item = Item::from_new(id, item, Utc::now());
        self.staged.insert(id, Some(item.clone()));
        Ok(item)
    }

    async fn find_by_id(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.current(id).cloned())
    }

    async fn replace(&mut self, mut item: Item) -> Result<Option<Item>, StoreError> {
        let Some(existing) = self.current(&item.id) else {
            return Ok(None);
        };

        item.created_at = existing.created_at;
        item.updated_at = Utc::now().max(existing.created_at);
        self.staged.insert(item.id, Some(item.clone()));
        Ok(Some(item))
    }

    async fn remove(&mut self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let removed = self.current(id).cloned();
        if removed.is_some() {
            self.staged.insert(*id, None);
        }
        Ok(removed)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction {
            mut committed,
            staged,
        } = *self;

        for (id, change) in staged {
            match change {
                Some(item) => committed.insert(id, item),
                None => committed.remove(&id),
            };
        }
        Ok(())
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        // Dropping the overlay and the lock guard is the rollback
        Ok(())
    }
}
