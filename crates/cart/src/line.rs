use serde::{Deserialize, Serialize};

use budbar_catalog::{CatalogItem, CatalogVariant};
use budbar_core::{MenuItemId, Money, Percent, ValueObject};
use budbar_inquiries::InquiryItem;

/// Identity of a cart line: one line per (item, variant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub item_id: MenuItemId,
    pub variant_name: String,
}

impl LineKey {
    pub fn new(item_id: MenuItemId, variant_name: impl Into<String>) -> Self {
        Self {
            item_id,
            variant_name: variant_name.into(),
        }
    }
}

impl ValueObject for LineKey {}

/// Cart line: the item/variant picked, the price and discount quoted at the
/// moment it was added, and how many.
///
/// Field names on the wire follow the inquiry body (`menu_item_id`,
/// `variant_price`, `discount`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "menu_item_id")]
    pub item_id: MenuItemId,
    pub title: String,
    pub variant_name: String,
    #[serde(rename = "variant_price")]
    pub unit_price: Money,
    #[serde(rename = "discount")]
    pub discount_percent: Percent,
    pub quantity: u32,
}

impl CartLine {
    /// Quote `variant` of `item` as a single-unit line.
    ///
    /// Price and discount are copied now; later catalog edits do not reach
    /// lines already in a cart.
    pub fn quote(item: &CatalogItem, variant: &CatalogVariant) -> Self {
        Self {
            item_id: item.id,
            title: item.title.clone(),
            variant_name: variant.name.clone(),
            unit_price: variant.price,
            discount_percent: item.discount,
            quantity: 1,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(self.item_id, self.variant_name.clone())
    }

    pub fn has_key(&self, key: &LineKey) -> bool {
        self.item_id == key.item_id && self.variant_name == key.variant_name
    }

    pub fn total(&self) -> Money {
        line_total(self)
    }
}

impl From<&CartLine> for InquiryItem {
    fn from(line: &CartLine) -> Self {
        InquiryItem {
            menu_item_id: line.item_id,
            title: line.title.clone(),
            variant_name: line.variant_name.clone(),
            variant_price: line.unit_price,
            discount: line.discount_percent,
            quantity: line.quantity,
        }
    }
}

/// `unit_price * quantity * (1 - discount/100)`, unrounded.
pub fn line_total(line: &CartLine) -> Money {
    line.unit_price
        .times(line.quantity)
        .discounted(line.discount_percent)
}

/// Sum of unrounded line totals. Round only for display.
pub fn cart_total(lines: &[CartLine]) -> Money {
    lines.iter().map(line_total).sum()
}

/// [`line_total`], or `None` when it does not fit a `Decimal`.
pub fn checked_line_total(line: &CartLine) -> Option<Money> {
    line.unit_price
        .checked_times(line.quantity)
        .map(|gross| gross.discounted(line.discount_percent))
}

/// [`cart_total`], or `None` when any line or the sum does not fit a `Decimal`.
pub fn checked_cart_total<'a, I>(lines: I) -> Option<Money>
where
    I: IntoIterator<Item = &'a CartLine>,
{
    lines
        .into_iter()
        .try_fold(Money::ZERO, |sum, line| sum.checked_add(checked_line_total(line)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use budbar_catalog::ItemType;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item() -> CatalogItem {
        CatalogItem {
            id: MenuItemId::new(),
            title: "Item A".to_string(),
            description: String::new(),
            categories: Default::default(),
            item_type: ItemType::Bud,
            discount: Percent::new(dec("10")).unwrap(),
            variants: vec![CatalogVariant::new("1g", Money::new(dec("10")))],
            images: vec![],
            display_order: 0,
        }
    }

    #[test]
    fn quote_copies_price_and_discount() {
        let item = item();
        let line = CartLine::quote(&item, &item.variants[0]);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Money::new(dec("10")));
        assert_eq!(line.discount_percent.value(), dec("10"));
        assert_eq!(line.key(), LineKey::new(item.id, "1g"));
    }

    #[test]
    fn line_total_applies_discount_after_quantity() {
        let item = item();
        let mut line = CartLine::quote(&item, &item.variants[0]);
        line.quantity = 3;
        assert_eq!(line.total().amount(), dec("27"));
    }

    #[test]
    fn cart_total_rounds_only_at_display() {
        let item = item();
        let mut a = CartLine::quote(&item, &item.variants[0]);
        a.unit_price = Money::new(dec("0.005"));
        a.discount_percent = Percent::ZERO;
        let mut b = a.clone();
        b.variant_name = "2g".to_string();

        // 0.005 + 0.005 = 0.01; rounding each line first would give 0.02.
        let total = cart_total(&[a, b]);
        assert_eq!(total.amount(), dec("0.010"));
        assert_eq!(total.to_string(), "0.01");
    }

    #[test]
    fn checked_total_reports_overflow() {
        let item = item();
        let mut line = CartLine::quote(&item, &item.variants[0]);
        assert_eq!(checked_cart_total(&[line.clone()]), Some(line.total()));

        line.unit_price = Money::new(dec("100000000000000000000"));
        line.quantity = u32::MAX;
        assert_eq!(checked_line_total(&line), None);
        assert_eq!(checked_cart_total(&[line]), None);
    }

    #[test]
    fn inquiry_item_mirrors_line() {
        let item = item();
        let line = CartLine::quote(&item, &item.variants[0]);
        let wire = InquiryItem::from(&line);
        assert_eq!(wire.menu_item_id, item.id);
        assert_eq!(wire.variant_price, line.unit_price);
        assert_eq!(wire.total(), line.total());
    }
}
