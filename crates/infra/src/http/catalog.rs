use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use budbar_catalog::{
    CatalogAdmin, CatalogItem, CatalogStore, CatalogStoreError, ItemFilter, ItemInput,
    ReorderEntry,
};
use budbar_core::MenuItemId;

use super::ApiClient;

#[derive(Debug, Deserialize)]
struct CategoriesBody {
    categories: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
struct ReorderBody<'a> {
    items: &'a [ReorderEntry],
}

/// Create/update body. The backend keeps one `category` per item, so the
/// first category in order is sent there alongside the full list.
#[derive(Debug, Serialize)]
struct ItemBody<'a> {
    #[serde(flatten)]
    input: &'a ItemInput,
    category: &'a str,
}

impl<'a> From<&'a ItemInput> for ItemBody<'a> {
    fn from(input: &'a ItemInput) -> Self {
        Self {
            input,
            category: input.categories.iter().next().map_or("", String::as_str),
        }
    }
}

/// Catalog store backed by the REST menu endpoints.
///
/// Only the item type is filtered server-side; category and search are applied
/// to the response.
#[derive(Debug, Clone)]
pub struct HttpCatalogStore {
    api: ApiClient,
}

impl HttpCatalogStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn item_path(id: MenuItemId) -> String {
        format!("admin/menu/items/{id}")
    }
}

#[async_trait]
impl CatalogStore for HttpCatalogStore {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<CatalogItem>, CatalogStoreError> {
        let mut request = self.api.get("menu/items");
        if let Some(item_type) = filter.item_type {
            request = request.query(&[("item_type", item_type.as_str())]);
        }

        let items: Vec<CatalogItem> = self.api.send_json(request).await?;
        tracing::debug!(count = items.len(), "menu items fetched");
        Ok(filter.apply(items.iter()))
    }

    async fn list_categories(&self) -> Result<BTreeSet<String>, CatalogStoreError> {
        let body: CategoriesBody = self.api.send_json(self.api.get("menu/categories")).await?;
        Ok(body
            .categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect())
    }

    async fn get_item(&self, id: MenuItemId) -> Result<CatalogItem, CatalogStoreError> {
        // The menu API has no single-item read.
        let items: Vec<CatalogItem> = self.api.send_json(self.api.get("menu/items")).await?;
        items
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(CatalogStoreError::NotFound)
    }
}

#[async_trait]
impl CatalogAdmin for HttpCatalogStore {
    async fn create_item(&self, input: ItemInput) -> Result<CatalogItem, CatalogStoreError> {
        let input = input.validated()?;
        let body = ItemBody::from(&input);
        let request = self.api.authorized(self.api.post("admin/menu/items").json(&body));
        let item: CatalogItem = self.api.send_json(request).await?;
        tracing::info!(item = %item.id, "menu item created");
        Ok(item)
    }

    async fn update_item(
        &self,
        id: MenuItemId,
        input: ItemInput,
    ) -> Result<CatalogItem, CatalogStoreError> {
        let input = input.validated()?;
        let body = ItemBody::from(&input);
        let request = self.api.authorized(self.api.put(&Self::item_path(id)).json(&body));
        self.api.send(request).await?;
        tracing::info!(item = %id, "menu item updated");
        self.get_item(id).await
    }

    async fn delete_item(&self, id: MenuItemId) -> Result<(), CatalogStoreError> {
        let request = self.api.authorized(self.api.delete(&Self::item_path(id)));
        self.api.send(request).await?;
        tracing::info!(item = %id, "menu item deleted");
        Ok(())
    }

    async fn reorder(&self, batch: &[ReorderEntry]) -> Result<(), CatalogStoreError> {
        let request = self
            .api
            .authorized(self.api.put("admin/menu/reorder").json(&ReorderBody { items: batch }));
        self.api.send(request).await?;
        tracing::info!(entries = batch.len(), "menu reordered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budbar_catalog::ItemType;

    #[test]
    fn type_filter_goes_on_the_query_string() {
        let api = ApiClient::with_client(reqwest::Client::new(), "http://shop.test");
        let request = api
            .get("menu/items")
            .query(&[("item_type", ItemType::Blend.as_str())])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://shop.test/api/menu/items?item_type=blends"
        );

        let id = MenuItemId::new();
        assert_eq!(HttpCatalogStore::item_path(id), format!("admin/menu/items/{id}"));
    }

    #[test]
    fn item_body_carries_the_backend_category() {
        let input = ItemInput {
            title: "t".to_string(),
            description: String::new(),
            categories: BTreeSet::from(["Indica".to_string(), "Hybrid".to_string()]),
            item_type: ItemType::Bud,
            discount: budbar_core::Percent::ZERO,
            variants: vec![],
            images: vec![],
        };
        let body = serde_json::to_value(ItemBody::from(&input)).unwrap();
        assert_eq!(body["category"], "Hybrid");
        assert_eq!(body["categories"], serde_json::json!(["Hybrid", "Indica"]));
        assert_eq!(body["item_type"], "buds");

        let uncategorized = ItemInput {
            categories: BTreeSet::new(),
            ..input
        };
        let body = serde_json::to_value(ItemBody::from(&uncategorized)).unwrap();
        assert_eq!(body["category"], "");
    }

    #[test]
    fn backend_items_list_parses_single_categories() {
        let body = r#"[{
            "id": "0190f0a4-6c1e-7c3a-8f55-1d2b3c4d5e6f",
            "title": "Item A",
            "description": "",
            "category": "Indica",
            "images": [],
            "variants": [{"name": "1g", "price": 10.0}],
            "discount": 0.0
        }]"#;
        let items: Vec<CatalogItem> = serde_json::from_str(body).unwrap();
        let visible = ItemFilter::all().with_category("Indica").apply(items.iter());
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn categories_body_shape() {
        let body: CategoriesBody =
            serde_json::from_str(r#"{"categories":["Sativa","Indica"]}"#).unwrap();
        assert_eq!(body.categories.len(), 2);
    }
}
