use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use budbar_core::{DomainError, DomainResult, Entity, MenuItemId, Money, Percent};

/// Upper bound on priced variants per item.
pub const MAX_VARIANTS: usize = 5;

/// Item type shown as the storefront's buds/blends toggle.
///
/// Items stored without a type count as blends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ItemType {
    #[serde(rename = "buds", alias = "bud")]
    Bud,
    #[default]
    #[serde(rename = "blends", alias = "blend")]
    Blend,
}

impl ItemType {
    /// Wire value used in query strings and bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Bud => "buds",
            ItemType::Blend => "blends",
        }
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bud" | "buds" => Ok(ItemType::Bud),
            "blend" | "blends" => Ok(ItemType::Blend),
            other => Err(DomainError::validation(format!(
                "item type must be one of: bud, blend (got {other:?})"
            ))),
        }
    }
}

/// A priced option of an item (e.g. a size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub name: String,
    pub price: Money,
}

impl CatalogVariant {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Read model of a menu item as served by the catalog store.
///
/// Carts only ever copy values out of this snapshot; they never hold on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: MenuItemId,
    pub title: String,
    pub description: String,
    #[serde(default, alias = "category", deserialize_with = "crate::category::one_or_many")]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub discount: Percent,
    pub variants: Vec<CatalogVariant>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub display_order: i64,
}

impl CatalogItem {
    pub fn variant(&self, name: &str) -> Option<&CatalogVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories.contains(category.trim())
    }

    pub fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }
}

impl Entity for CatalogItem {
    type Id = MenuItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Admin form for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "category", deserialize_with = "crate::category::one_or_many")]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub discount: Percent,
    pub variants: Vec<CatalogVariant>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ItemInput {
    /// Check the catalog invariants, returning a trimmed copy on success.
    pub fn validated(&self) -> DomainResult<ItemInput> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title is required"));
        }

        if self.variants.is_empty() || self.variants.len() > MAX_VARIANTS {
            return Err(DomainError::validation(format!(
                "an item needs between 1 and {MAX_VARIANTS} variants (got {})",
                self.variants.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut variants = Vec::with_capacity(self.variants.len());
        for variant in &self.variants {
            let name = variant.name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("variant name is required"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(DomainError::conflict(format!("duplicate variant name {name:?}")));
            }
            let price = Money::price(variant.price.amount())?;
            variants.push(CatalogVariant::new(name, price));
        }

        let categories = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        Ok(ItemInput {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            categories,
            item_type: self.item_type,
            discount: self.discount,
            variants,
            images: self.images.clone(),
        })
    }

    /// Validate and materialize into a catalog item.
    pub fn into_item(self, id: MenuItemId, display_order: i64) -> DomainResult<CatalogItem> {
        let input = self.validated()?;
        Ok(CatalogItem {
            id,
            title: input.title,
            description: input.description,
            categories: input.categories,
            item_type: input.item_type,
            discount: input.discount,
            variants: input.variants,
            images: input.images,
            display_order,
        })
    }
}
