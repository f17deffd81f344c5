//! Storefront browsing filters.

use serde::{Deserialize, Serialize};

use crate::item::{CatalogItem, ItemType};

/// Narrowing applied to the catalog listing.
///
/// The item type is applied by the store; category and search are cheap enough
/// to apply to the already loaded snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub item_type: Option<ItemType>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_type(item_type: ItemType) -> Self {
        Self {
            item_type: Some(item_type),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// The part of this filter a store applies server-side.
    pub fn store_part(&self) -> ItemFilter {
        ItemFilter {
            item_type: self.item_type,
            ..ItemFilter::default()
        }
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(item_type) = self.item_type {
            if item.item_type != item_type {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref().map(str::trim) {
            if !category.is_empty() && !item.in_category(category) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                item.title.to_lowercase().contains(&query)
                    || item.description.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }

    /// Matching items, in manual display order (title breaks ties).
    pub fn apply<'a, I>(&self, items: I) -> Vec<CatalogItem>
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let mut out: Vec<CatalogItem> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        sort_for_display(&mut out);
        out
    }
}

pub fn sort_for_display(items: &mut [CatalogItem]) {
    items.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.title.cmp(&b.title))
    });
}
