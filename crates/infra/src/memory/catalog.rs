use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use budbar_catalog::{
    CatalogAdmin, CatalogItem, CatalogStore, CatalogStoreError, CategorySet, ItemFilter,
    ItemInput, ReorderEntry, apply_reorder,
};
use budbar_core::MenuItemId;

use super::POISONED;

/// In-memory menu.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    items: RwLock<HashMap<MenuItemId, CatalogItem>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with ready-made items (ids and display order kept as given).
    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|item| (item.id, item)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn unavailable<T>(_: T) -> CatalogStoreError {
    CatalogStoreError::Unavailable(POISONED.to_string())
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<CatalogItem>, CatalogStoreError> {
        let items = self.items.read().map_err(unavailable)?;
        Ok(filter.apply(items.values()))
    }

    async fn list_categories(&self) -> Result<BTreeSet<String>, CatalogStoreError> {
        let items = self.items.read().map_err(unavailable)?;
        Ok(CategorySet::from_items(items.values()).into_inner())
    }

    async fn get_item(&self, id: MenuItemId) -> Result<CatalogItem, CatalogStoreError> {
        let items = self.items.read().map_err(unavailable)?;
        items.get(&id).cloned().ok_or(CatalogStoreError::NotFound)
    }
}

#[async_trait]
impl CatalogAdmin for InMemoryCatalogStore {
    async fn create_item(&self, input: ItemInput) -> Result<CatalogItem, CatalogStoreError> {
        let mut items = self.items.write().map_err(unavailable)?;

        let next_order = items
            .values()
            .map(|item| item.display_order + 1)
            .max()
            .unwrap_or(0);
        let item = input.into_item(MenuItemId::new(), next_order)?;

        tracing::info!(item = %item.id, title = %item.title, "menu item created");
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        id: MenuItemId,
        input: ItemInput,
    ) -> Result<CatalogItem, CatalogStoreError> {
        let mut items = self.items.write().map_err(unavailable)?;
        let slot = items.get_mut(&id).ok_or(CatalogStoreError::NotFound)?;

        let updated = input.into_item(id, slot.display_order)?;
        *slot = updated.clone();

        tracing::info!(item = %id, "menu item updated");
        Ok(updated)
    }

    async fn delete_item(&self, id: MenuItemId) -> Result<(), CatalogStoreError> {
        let mut items = self.items.write().map_err(unavailable)?;
        items.remove(&id).ok_or(CatalogStoreError::NotFound)?;
        tracing::info!(item = %id, "menu item deleted");
        Ok(())
    }

    async fn reorder(&self, batch: &[ReorderEntry]) -> Result<(), CatalogStoreError> {
        let mut items = self.items.write().map_err(unavailable)?;

        // Validate against a copy so an unknown id leaves the order untouched.
        let mut staged: Vec<CatalogItem> = items.values().cloned().collect();
        apply_reorder(staged.iter_mut(), batch).map_err(|_| CatalogStoreError::NotFound)?;
        for item in staged {
            items.insert(item.id, item);
        }

        tracing::info!(entries = batch.len(), "menu reordered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budbar_catalog::{CatalogVariant, ItemType, move_item};
    use budbar_core::{DomainError, Money, Percent};
    use rust_decimal::Decimal;

    fn input(title: &str, categories: &[&str]) -> ItemInput {
        ItemInput {
            title: title.to_string(),
            description: format!("{title} description"),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            item_type: ItemType::Bud,
            discount: Percent::ZERO,
            variants: vec![CatalogVariant::new("1g", Money::new(Decimal::TEN))],
            images: vec![],
        }
    }

    #[tokio::test]
    async fn created_items_are_appended_to_the_order() {
        let store = InMemoryCatalogStore::new();
        let a = store.create_item(input("Alpha", &["Indica"])).await.unwrap();
        let b = store.create_item(input("Beta", &["Sativa"])).await.unwrap();

        assert_eq!(a.display_order, 0);
        assert_eq!(b.display_order, 1);

        let listed = store.list_items(&ItemFilter::all()).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);

        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories.into_iter().collect::<Vec<_>>(), vec!["Indica", "Sativa"]);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_without_storing() {
        let store = InMemoryCatalogStore::new();
        let mut bad = input("Alpha", &[]);
        bad.variants.clear();

        let err = store.create_item(bad).await.unwrap_err();
        assert!(matches!(err, CatalogStoreError::Invalid(DomainError::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn update_keeps_position_and_missing_ids_are_not_found() {
        let store = InMemoryCatalogStore::new();
        store.create_item(input("Alpha", &[])).await.unwrap();
        let b = store.create_item(input("Beta", &[])).await.unwrap();

        let updated = store.update_item(b.id, input("Beta 2", &[])).await.unwrap();
        assert_eq!(updated.display_order, 1);
        assert_eq!(store.get_item(b.id).await.unwrap().title, "Beta 2");

        let missing = MenuItemId::new();
        assert_eq!(
            store.update_item(missing, input("x", &[])).await.unwrap_err(),
            CatalogStoreError::NotFound
        );
        assert_eq!(store.delete_item(missing).await.unwrap_err(), CatalogStoreError::NotFound);
    }

    #[tokio::test]
    async fn reorder_batch_is_applied_atomically() {
        let store = InMemoryCatalogStore::new();
        for title in ["A", "B", "C"] {
            store.create_item(input(title, &[])).await.unwrap();
        }

        let mut items = store.list_items(&ItemFilter::all()).await.unwrap();
        let batch = move_item(&mut items, 2, 0).unwrap();
        store.reorder(&batch).await.unwrap();

        let titles: Vec<_> = store
            .list_items(&ItemFilter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);

        let mut bogus = batch.clone();
        bogus.push(ReorderEntry {
            id: MenuItemId::new(),
            display_order: 0,
        });
        bogus[0].display_order = 99;
        assert_eq!(store.reorder(&bogus).await.unwrap_err(), CatalogStoreError::NotFound);
        assert_eq!(store.get_item(batch[0].id).await.unwrap().display_order, 0);
    }
}
