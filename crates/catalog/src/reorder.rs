//! Manual ordering of the menu (admin drag-and-drop).
//!
//! A drop is a splice: take the item out of its slot, put it at the target
//! slot, then renumber every item `0..n`. The resulting batch is persisted
//! with a single reorder call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use budbar_core::{DomainError, DomainResult, MenuItemId};

use crate::item::CatalogItem;

/// New position of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: MenuItemId,
    pub display_order: i64,
}

/// Move `items[from]` to position `to` and renumber.
///
/// `items` must already be in display order (as rendered).
pub fn move_item(
    items: &mut Vec<CatalogItem>,
    from: usize,
    to: usize,
) -> DomainResult<Vec<ReorderEntry>> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(DomainError::validation(format!(
            "reorder positions {from} -> {to} out of range for {len} items"
        )));
    }

    if from != to {
        let moved = items.remove(from);
        items.insert(to, moved);
    }

    Ok(renumber(items))
}

/// Assign `display_order = position` to every item.
pub fn renumber(items: &mut [CatalogItem]) -> Vec<ReorderEntry> {
    items
        .iter_mut()
        .enumerate()
        .map(|(position, item)| {
            item.display_order = position as i64;
            ReorderEntry {
                id: item.id,
                display_order: item.display_order,
            }
        })
        .collect()
}

/// Store-side application of a reorder batch. Unknown ids fail the whole batch.
pub fn apply_reorder<'a, I>(items: I, batch: &[ReorderEntry]) -> DomainResult<()>
where
    I: IntoIterator<Item = &'a mut CatalogItem>,
{
    let wanted: HashMap<MenuItemId, i64> =
        batch.iter().map(|e| (e.id, e.display_order)).collect();

    let mut targets: Vec<&mut CatalogItem> = items
        .into_iter()
        .filter(|item| wanted.contains_key(&item.id))
        .collect();

    if targets.len() != wanted.len() {
        return Err(DomainError::not_found());
    }

    for item in targets.iter_mut() {
        if let Some(order) = wanted.get(&item.id) {
            item.display_order = *order;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CatalogVariant, ItemType};
    use budbar_core::{Money, Percent};
    use proptest::prelude::*;

    fn items(n: usize) -> Vec<CatalogItem> {
        (0..n)
            .map(|i| CatalogItem {
                id: MenuItemId::new(),
                title: format!("item-{i}"),
                description: String::new(),
                categories: Default::default(),
                item_type: ItemType::Bud,
                discount: Percent::ZERO,
                variants: vec![CatalogVariant::new("1g", Money::ZERO)],
                images: vec![],
                display_order: (i as i64) * 10,
            })
            .collect()
    }

    fn titles(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn moving_down_shifts_the_rest_up() {
        let mut list = items(4);
        let batch = move_item(&mut list, 0, 2).unwrap();

        assert_eq!(titles(&list), ["item-1", "item-2", "item-0", "item-3"]);
        let orders: Vec<i64> = batch.iter().map(|e| e.display_order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);
        assert_eq!(batch[2].id, list[2].id);
    }

    #[test]
    fn same_position_only_renumbers() {
        let mut list = items(3);
        move_item(&mut list, 1, 1).unwrap();
        assert_eq!(titles(&list), ["item-0", "item-1", "item-2"]);
        assert_eq!(list[2].display_order, 2);
    }

    #[test]
    fn out_of_range_is_rejected_without_changes() {
        let mut list = items(2);
        let before = list.clone();
        assert!(move_item(&mut list, 0, 2).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn apply_reorder_rejects_unknown_ids() {
        let mut list = items(2);
        let batch = vec![ReorderEntry {
            id: MenuItemId::new(),
            display_order: 0,
        }];
        assert_eq!(apply_reorder(list.iter_mut(), &batch), Err(DomainError::NotFound));
    }

    #[test]
    fn apply_reorder_sets_orders() {
        let mut list = items(3);
        let mut rendered = list.clone();
        let batch = move_item(&mut rendered, 2, 0).unwrap();

        apply_reorder(list.iter_mut(), &batch).unwrap();
        crate::filter::sort_for_display(&mut list);
        assert_eq!(titles(&list), ["item-2", "item-0", "item-1"]);
    }

    proptest! {
        #[test]
        fn move_preserves_items_and_numbers_sequentially(
            (n, from, to) in (1usize..12).prop_flat_map(|n| (Just(n), 0..n, 0..n))
        ) {
            let mut list = items(n);
            let mut before: Vec<MenuItemId> = list.iter().map(|i| i.id).collect();

            let batch = move_item(&mut list, from, to).unwrap();

            let mut after: Vec<MenuItemId> = list.iter().map(|i| i.id).collect();
            prop_assert_eq!(after[to], before[from]);
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
            for (pos, entry) in batch.iter().enumerate() {
                prop_assert_eq!(entry.display_order, pos as i64);
            }
        }
    }
}
