//! Customer inquiries: the submitted form of a cart.
//!
//! An [`InquiryDraft`] is the request body a cart produces; an [`Inquiry`] is
//! what the store keeps and the admin dashboard works through.

pub mod inquiry;
pub mod store;

pub use inquiry::{DeliveryMethod, Inquiry, InquiryDraft, InquiryItem, InquiryStatus};
pub use store::{InquiryAdmin, InquiryStore, InquiryStoreError};
