//! Inquiry store ports.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use budbar_core::InquiryId;

use crate::inquiry::{Inquiry, InquiryDraft, InquiryStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InquiryStoreError {
    #[error("inquiry not found")]
    NotFound,
    #[error("not authorized for inquiry administration")]
    Unauthorized,
    /// The store refused the draft (server-side validation).
    #[error("inquiry rejected: {0}")]
    Rejected(String),
    /// Transport or storage failure; the same request may succeed later.
    #[error("inquiry store unavailable: {0}")]
    Unavailable(String),
}

impl InquiryStoreError {
    /// Whether resubmitting the same draft can help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InquiryStoreError::Unavailable(_))
    }
}

/// Where customer carts end up.
#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn create_inquiry(&self, draft: &InquiryDraft) -> Result<Inquiry, InquiryStoreError>;
}

/// Admin dashboard operations on received inquiries.
#[async_trait]
pub trait InquiryAdmin: Send + Sync {
    /// Newest first.
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryStoreError>;

    async fn update_status(
        &self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<(), InquiryStoreError>;

    async fn delete_inquiry(&self, id: InquiryId) -> Result<(), InquiryStoreError>;
}

#[async_trait]
impl<T> InquiryStore for Arc<T>
where
    T: InquiryStore + ?Sized,
{
    async fn create_inquiry(&self, draft: &InquiryDraft) -> Result<Inquiry, InquiryStoreError> {
        (**self).create_inquiry(draft).await
    }
}

#[async_trait]
impl<T> InquiryAdmin for Arc<T>
where
    T: InquiryAdmin + ?Sized,
{
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryStoreError> {
        (**self).list_inquiries().await
    }

    async fn update_status(
        &self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<(), InquiryStoreError> {
        (**self).update_status(id, status).await
    }

    async fn delete_inquiry(&self, id: InquiryId) -> Result<(), InquiryStoreError> {
        (**self).delete_inquiry(id).await
    }
}
