use std::collections::BTreeSet;

use budbar_catalog::{CatalogItem, CatalogStore, CatalogStoreError, ItemFilter, ItemType};
use budbar_core::MenuItemId;

/// Customer-side view of the menu: the last loaded snapshot plus the
/// selected type, category and search text.
///
/// Changing the type needs a [`refresh`](Self::refresh) (the store filters by
/// type); category and search narrow the loaded snapshot immediately.
#[derive(Debug)]
pub struct CatalogBrowser<C> {
    store: C,
    filter: ItemFilter,
    items: Vec<CatalogItem>,
    categories: BTreeSet<String>,
}

impl<C> CatalogBrowser<C>
where
    C: CatalogStore,
{
    pub fn new(store: C) -> Self {
        Self {
            store,
            filter: ItemFilter::all(),
            items: Vec::new(),
            categories: BTreeSet::new(),
        }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    /// Reload items for the selected type, and the category list.
    pub async fn refresh(&mut self) -> Result<(), CatalogStoreError> {
        self.items = self.store.list_items(&self.filter.store_part()).await?;
        self.categories = self.store.list_categories().await?;
        tracing::debug!(
            items = self.items.len(),
            categories = self.categories.len(),
            "menu refreshed"
        );
        Ok(())
    }

    pub async fn select_type(
        &mut self,
        item_type: Option<ItemType>,
    ) -> Result<(), CatalogStoreError> {
        self.filter.item_type = item_type;
        self.refresh().await
    }

    pub fn select_category(&mut self, category: Option<String>) {
        self.filter.category = category;
    }

    pub fn search(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.filter.search = (!query.trim().is_empty()).then_some(query);
    }

    /// Items shown under the current selection, in display order.
    pub fn visible(&self) -> Vec<CatalogItem> {
        self.filter.apply(self.items.iter())
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn loaded(&self, id: MenuItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// A loaded item, or a fresh read when it is not in the snapshot.
    pub async fn item(&self, id: MenuItemId) -> Result<CatalogItem, CatalogStoreError> {
        match self.loaded(id) {
            Some(item) => Ok(item.clone()),
            None => self.store.get_item(id).await,
        }
    }
}
