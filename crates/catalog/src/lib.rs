//! Menu catalog domain module.
//!
//! Catalog items, their priced variants, browsing filters, the category set and
//! manual ordering, implemented purely as deterministic domain logic. Storage
//! lives behind the [`CatalogStore`] / [`CatalogAdmin`] ports.

pub mod category;
pub mod filter;
pub mod item;
pub mod reorder;
pub mod store;

pub use category::CategorySet;
pub use filter::ItemFilter;
pub use item::{CatalogItem, CatalogVariant, ItemInput, ItemType, MAX_VARIANTS};
pub use reorder::{ReorderEntry, apply_reorder, move_item, renumber};
pub use store::{CatalogAdmin, CatalogStore, CatalogStoreError};
