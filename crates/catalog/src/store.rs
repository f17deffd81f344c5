//! Catalog store ports.
//!
//! The storefront only reads ([`CatalogStore`]); the admin console also writes
//! ([`CatalogAdmin`]). Implementations live in the infrastructure crate.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use budbar_core::{DomainError, MenuItemId};

use crate::filter::ItemFilter;
use crate::item::{CatalogItem, ItemInput};
use crate::reorder::ReorderEntry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogStoreError {
    #[error("menu item not found")]
    NotFound,
    #[error("not authorized for catalog changes")]
    Unauthorized,
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("catalog store unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Items matching `filter`, ordered by `display_order`.
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<CatalogItem>, CatalogStoreError>;

    /// Every category name referenced by an item.
    async fn list_categories(&self) -> Result<BTreeSet<String>, CatalogStoreError>;

    async fn get_item(&self, id: MenuItemId) -> Result<CatalogItem, CatalogStoreError>;
}

/// Write side of the catalog (admin only).
#[async_trait]
pub trait CatalogAdmin: CatalogStore {
    /// New items go to the end of the manual order.
    async fn create_item(&self, input: ItemInput) -> Result<CatalogItem, CatalogStoreError>;

    /// Replace an item's attributes; its position is kept.
    async fn update_item(
        &self,
        id: MenuItemId,
        input: ItemInput,
    ) -> Result<CatalogItem, CatalogStoreError>;

    async fn delete_item(&self, id: MenuItemId) -> Result<(), CatalogStoreError>;

    /// Persist a whole reorder batch at once.
    async fn reorder(&self, batch: &[ReorderEntry]) -> Result<(), CatalogStoreError>;
}

#[async_trait]
impl<T> CatalogStore for Arc<T>
where
    T: CatalogStore + ?Sized,
{
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<CatalogItem>, CatalogStoreError> {
        (**self).list_items(filter).await
    }

    async fn list_categories(&self) -> Result<BTreeSet<String>, CatalogStoreError> {
        (**self).list_categories().await
    }

    async fn get_item(&self, id: MenuItemId) -> Result<CatalogItem, CatalogStoreError> {
        (**self).get_item(id).await
    }
}

#[async_trait]
impl<T> CatalogAdmin for Arc<T>
where
    T: CatalogAdmin + ?Sized,
{
    async fn create_item(&self, input: ItemInput) -> Result<CatalogItem, CatalogStoreError> {
        (**self).create_item(input).await
    }

    async fn update_item(
        &self,
        id: MenuItemId,
        input: ItemInput,
    ) -> Result<CatalogItem, CatalogStoreError> {
        (**self).update_item(id, input).await
    }

    async fn delete_item(&self, id: MenuItemId) -> Result<(), CatalogStoreError> {
        (**self).delete_item(id).await
    }

    async fn reorder(&self, batch: &[ReorderEntry]) -> Result<(), CatalogStoreError> {
        (**self).reorder(batch).await
    }
}
