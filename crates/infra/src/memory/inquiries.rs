use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use budbar_core::InquiryId;
use budbar_inquiries::{
    Inquiry, InquiryAdmin, InquiryDraft, InquiryStatus, InquiryStore, InquiryStoreError,
};

use super::POISONED;

/// In-memory inquiry inbox, kept in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryInquiryStore {
    inquiries: RwLock<Vec<Inquiry>>,
}

impl InMemoryInquiryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inquiries.read().map(|list| list.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn unavailable<T>(_: T) -> InquiryStoreError {
    InquiryStoreError::Unavailable(POISONED.to_string())
}

#[async_trait]
impl InquiryStore for InMemoryInquiryStore {
    async fn create_inquiry(&self, draft: &InquiryDraft) -> Result<Inquiry, InquiryStoreError> {
        if draft.items.is_empty() {
            return Err(InquiryStoreError::Rejected("inquiry has no items".to_string()));
        }

        let inquiry = Inquiry::received(InquiryId::new(), draft.clone(), Utc::now());
        self.inquiries
            .write()
            .map_err(unavailable)?
            .push(inquiry.clone());

        tracing::info!(
            inquiry = %inquiry.id,
            items = inquiry.draft.items.len(),
            "inquiry received"
        );
        Ok(inquiry)
    }
}

#[async_trait]
impl InquiryAdmin for InMemoryInquiryStore {
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryStoreError> {
        let list = self.inquiries.read().map_err(unavailable)?;
        let mut out = list.clone();
        // Reversed first so equal timestamps still list the later arrival first.
        out.reverse();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn update_status(
        &self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<(), InquiryStoreError> {
        let mut list = self.inquiries.write().map_err(unavailable)?;
        let inquiry = list
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(InquiryStoreError::NotFound)?;
        inquiry.status = status;
        tracing::info!(inquiry = %id, status = status.as_str(), "inquiry status updated");
        Ok(())
    }

    async fn delete_inquiry(&self, id: InquiryId) -> Result<(), InquiryStoreError> {
        let mut list = self.inquiries.write().map_err(unavailable)?;
        let before = list.len();
        list.retain(|i| i.id != id);
        if list.len() == before {
            return Err(InquiryStoreError::NotFound);
        }
        tracing::info!(inquiry = %id, "inquiry deleted");
        Ok(())
    }
}
