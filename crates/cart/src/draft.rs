//! The customer's inquiry form and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use budbar_inquiries::{DeliveryMethod, InquiryDraft, InquiryItem};

use crate::line::{CartLine, cart_total};

/// Why a cart cannot be submitted yet. Messages are shown to the customer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter your phone number")]
    MissingPhone,
    #[error("Please enter your delivery address")]
    MissingAddress,
    #[error("Your inquiry cart is empty")]
    EmptyCart,
}

/// Contact and delivery details typed in next to the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftFields {
    pub customer_name: String,
    pub phone_number: String,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: String,
    pub referral_name: String,
}

impl DraftFields {
    /// First failing check, in form order. Blank counts as missing.
    pub fn validate(&self, lines: &[CartLine]) -> Result<(), ValidationError> {
        if is_blank(&self.customer_name) {
            return Err(ValidationError::MissingName);
        }
        if is_blank(&self.phone_number) {
            return Err(ValidationError::MissingPhone);
        }
        if self.delivery_method.needs_address() && is_blank(&self.delivery_address) {
            return Err(ValidationError::MissingAddress);
        }
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        Ok(())
    }

    /// Package the form and `lines` into the body sent to the inquiry store.
    ///
    /// Pickup inquiries carry `pickup_address` (the shop) as their address.
    pub fn to_draft(
        &self,
        lines: &[CartLine],
        pickup_address: Option<&str>,
    ) -> Result<InquiryDraft, ValidationError> {
        self.validate(lines)?;

        let delivery_address = match self.delivery_method {
            DeliveryMethod::Delivery => Some(self.delivery_address.trim().to_string()),
            DeliveryMethod::Pickup => pickup_address.map(str::to_string),
        };

        Ok(InquiryDraft {
            customer_name: self.customer_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            delivery_method: self.delivery_method,
            delivery_address,
            referral_name: non_blank(&self.referral_name),
            items: lines.iter().map(InquiryItem::from).collect(),
            total: cart_total(lines),
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
