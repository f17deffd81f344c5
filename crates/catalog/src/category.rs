//! The set of category names in use.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use budbar_core::{DomainError, DomainResult};

use crate::item::CatalogItem;

/// Category names, unique case-insensitively, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<String>);

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories referenced by any of `items`; the first spelling seen wins.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let mut set = Self::new();
        for name in items.into_iter().flat_map(|item| item.categories.iter()) {
            let _ = set.insert(name);
        }
        set
    }

    /// Add a category. Blank names are invalid, case-insensitive repeats conflict.
    pub fn insert(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        if self.contains(name) {
            return Err(DomainError::conflict(format!("category {name:?} already exists")));
        }
        self.0.insert(name.to_string());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.0.iter().any(|c| c.to_lowercase() == needle)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeSet<String> {
        self.0
    }
}

impl From<BTreeSet<String>> for CategorySet {
    fn from(names: BTreeSet<String>) -> Self {
        let mut set = Self::new();
        for name in &names {
            let _ = set.insert(name);
        }
        set
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(BTreeSet<String>),
}

/// Item categories as found on the wire: the REST backend sends a single
/// `category` string, stored items carry a `categories` list. Blank names and
/// `null` yield no category.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => BTreeSet::new(),
        Some(OneOrMany::One(name)) => BTreeSet::from([name]),
        Some(OneOrMany::Many(names)) => names,
    };
    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_blank_and_duplicates() {
        let mut set = CategorySet::new();
        set.insert("Sativa").unwrap();

        assert!(matches!(set.insert("  "), Err(DomainError::Validation(_))));
        assert!(matches!(set.insert(" sativa "), Err(DomainError::Conflict(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn from_names_collapses_case_variants() {
        let names: BTreeSet<String> = ["Indica", "indica", "Hybrid"]
            .into_iter()
            .map(String::from)
            .collect();
        let set = CategorySet::from(names);
        assert_eq!(set.len(), 2);
        assert!(set.contains("INDICA"));
    }
}
