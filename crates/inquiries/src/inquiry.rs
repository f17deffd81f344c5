use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use budbar_core::{DomainError, InquiryId, MenuItemId, Money, Percent};

/// How the customer wants to receive the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
}

impl DeliveryMethod {
    pub fn needs_address(&self) -> bool {
        matches!(self, DeliveryMethod::Delivery)
    }
}

/// Inquiry handling status on the admin side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Complete,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Complete => "complete",
        }
    }
}

impl core::str::FromStr for InquiryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InquiryStatus::Pending),
            "complete" | "completed" => Ok(InquiryStatus::Complete),
            other => Err(DomainError::validation(format!(
                "status must be one of: pending, complete (got {other:?})"
            ))),
        }
    }
}

/// One requested line, with the price and discount the customer saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryItem {
    pub menu_item_id: MenuItemId,
    pub title: String,
    pub variant_name: String,
    pub variant_price: Money,
    pub discount: Percent,
    pub quantity: u32,
}

impl InquiryItem {
    pub fn total(&self) -> Money {
        self.variant_price
            .times(self.quantity)
            .discounted(self.discount)
    }
}

/// Request body of `POST /inquiries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryDraft {
    #[serde(rename = "first_name")]
    pub customer_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub referral_name: Option<String>,
    pub items: Vec<InquiryItem>,
    pub total: Money,
}

impl InquiryDraft {
    /// Total recomputed from the items, for cross-checking `total`.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(InquiryItem::total).sum()
    }

    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A stored inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    #[serde(flatten)]
    pub draft: InquiryDraft,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    /// Record a freshly received draft; new inquiries start out pending.
    pub fn received(id: InquiryId, draft: InquiryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            draft,
            status: InquiryStatus::Pending,
            created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InquiryStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft() -> InquiryDraft {
        let items = vec![
            InquiryItem {
                menu_item_id: MenuItemId::new(),
                title: "Gold Leaf".to_string(),
                variant_name: "1g".to_string(),
                variant_price: Money::new(dec("10")),
                discount: Percent::new(dec("10")).unwrap(),
                quantity: 2,
            },
            InquiryItem {
                menu_item_id: MenuItemId::new(),
                title: "Night Owl".to_string(),
                variant_name: "3.5g".to_string(),
                variant_price: Money::new(dec("25.5")),
                discount: Percent::ZERO,
                quantity: 1,
            },
        ];
        InquiryDraft {
            customer_name: "Sam".to_string(),
            phone_number: "555-0100".to_string(),
            delivery_method: DeliveryMethod::Pickup,
            delivery_address: None,
            referral_name: None,
            total: items.iter().map(InquiryItem::total).sum(),
            items,
        }
    }

    #[test]
    fn body_uses_wire_field_names() {
        let body = serde_json::to_value(draft()).unwrap();
        assert_eq!(body["first_name"], json!("Sam"));
        assert_eq!(body["delivery_method"], json!("pickup"));
        assert_eq!(body["referral_name"], json!(null));
        assert_eq!(body["items"][0]["variant_name"], json!("1g"));
        assert_eq!(body["items"][0]["quantity"], json!(2));
        assert!(body["total"].is_number());
    }

    #[test]
    fn items_total_matches_line_formula() {
        let d = draft();
        assert_eq!(d.items_total().to_string(), "43.50");
        assert_eq!(d.unit_count(), 3);
    }

    #[test]
    fn stored_inquiry_flattens_draft() {
        let inquiry = Inquiry::received(InquiryId::new(), draft(), Utc::now());
        let value = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["phone_number"], json!("555-0100"));

        let back: Inquiry = serde_json::from_value(value).unwrap();
        assert_eq!(back.draft.customer_name, "Sam");
        assert!(back.is_pending());
    }

    #[test]
    fn status_parsing() {
        assert_eq!("Complete".parse::<InquiryStatus>().unwrap(), InquiryStatus::Complete);
        assert!("shipped".parse::<InquiryStatus>().is_err());
    }
}
