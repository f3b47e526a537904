//! Item repository
//!
//! The store adapter used by the request handlers. Reads go straight to the
//! store; create, update and delete each run in their own transaction.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, ServiceError};
use crate::models::{Item, ItemId, ListParams};
use crate::store::{DocumentStore, FindOptions, Page, Transaction, TransactionScope};
use crate::validation::{ItemPatch, NewItem};

#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn DocumentStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: NewItem) -> Result<Item> {
        let mut scope = TransactionScope::begin(self.store.as_ref(), "create").await?;
        let result = scope.tx().insert(item).await.map_err(ServiceError::from);
        scope.finish(result).await
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page> {
        let page = self.store.find(&FindOptions::from(params)).await?;
        debug!(returned = page.items.len(), total = page.total, "items listed");
        Ok(page)
    }

    pub async fn get_by_id(&self, id: &ItemId) -> Result<Item> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Applies `patch`, re-validates the whole item and writes it back.
    pub async fn update_by_id(&self, id: &ItemId, patch: &ItemPatch) -> Result<Item> {
        let mut scope = TransactionScope::begin(self.store.as_ref(), "update").await?;
        let result = apply_patch(scope.tx(), id, patch).await;
        scope.finish(result).await
    }

    pub async fn delete_by_id(&self, id: &ItemId) -> Result<Item> {
        let mut scope = TransactionScope::begin(self.store.as_ref(), "delete").await?;
        let result = scope
            .tx()
            .remove(id)
            .await
            .map_err(ServiceError::from)
            .and_then(|removed| removed.ok_or_else(|| ServiceError::NotFound(id.to_string())));
        scope.finish(result).await
    }
}

async fn apply_patch(tx: &mut dyn Transaction, id: &ItemId, patch: &ItemPatch) -> Result<Item> {
    let mut item = tx
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

    patch.apply_to(&mut item);
    item.validate()?;

    tx.replace(item)
        .await?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateItemRequest, ListItemsQuery, UpdateItemRequest};
    use crate::store::MemoryStore;
    use crate::validation::{validate_create, validate_update};

    fn repo() -> (ItemRepository, MemoryStore) {
        let store = MemoryStore::new();
        (ItemRepository::new(Arc::new(store.clone())), store)
    }

    fn new_item(name: &str, price: i64) -> NewItem {
        validate_create(CreateItemRequest {
            name: Some(name.into()),
            description: Some("A perfectly ordinary item".into()),
            price: Some(price.into()),
        })
        .unwrap()
    }

    fn patch(name: Option<&str>, price: Option<i64>) -> ItemPatch {
        validate_update(UpdateItemRequest {
            name: name.map(Into::into),
            description: None,
            price: price.map(Into::into),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (repo, _) = repo();
        let created = repo.create(new_item("Lamp", 10)).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (repo, _) = repo();
        let result = repo.get_by_id(&ItemId::generate()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let (repo, _) = repo();
        let created = repo.create(new_item("Lamp", 10)).await.unwrap();

        let updated = repo
            .update_by_id(&created.id, &patch(None, Some(25)))
            .await
            .unwrap();
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.price, 25);
        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_and_releases_lock() {
        let (repo, store) = repo();
        let result = repo
            .update_by_id(&ItemId::generate(), &patch(Some("Chair"), None))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        // The aborted transaction must not block the next writer
        repo.create(new_item("Lamp", 10)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let (repo, store) = repo();
        let created = repo.create(new_item("Lamp", 10)).await.unwrap();

        let deleted = repo.delete_by_id(&created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(store.is_empty().await);

        let again = repo.delete_by_id(&created.id).await;
        assert!(matches!(again, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let (repo, _) = repo();
        for price in 1..=25 {
            repo.create(new_item(&format!("Item {price:02}"), price))
                .await
                .unwrap();
        }

        let query = ListItemsQuery {
            page: Some("3".into()),
            limit: Some("10".into()),
            sort: Some("price".into()),
            filters: None,
        };
        let params = ListParams::from_query(&query, 10, 100).unwrap();
        let page = repo.list(&params).await.unwrap();

        assert_eq!(page.total, 25);
        let prices: Vec<i64> = page.items.iter().map(|i| i.price).collect();
        assert_eq!(prices, (21..=25).collect::<Vec<_>>());
    }
}
