use async_trait::async_trait;

use budbar_core::InquiryId;
use budbar_inquiries::{
    Inquiry, InquiryAdmin, InquiryDraft, InquiryStatus, InquiryStore, InquiryStoreError,
};

use super::ApiClient;

/// Inquiry store backed by the REST inquiry endpoints.
#[derive(Debug, Clone)]
pub struct HttpInquiryStore {
    api: ApiClient,
}

impl HttpInquiryStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn inquiry_path(id: InquiryId) -> String {
        format!("admin/inquiries/{id}")
    }
}

#[async_trait]
impl InquiryStore for HttpInquiryStore {
    async fn create_inquiry(&self, draft: &InquiryDraft) -> Result<Inquiry, InquiryStoreError> {
        let request = self.api.post("inquiries").json(draft);
        let inquiry: Inquiry = self.api.send_json(request).await?;
        tracing::info!(inquiry = %inquiry.id, "inquiry created");
        Ok(inquiry)
    }
}

#[async_trait]
impl InquiryAdmin for HttpInquiryStore {
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryStoreError> {
        let request = self.api.authorized(self.api.get("admin/inquiries"));
        let mut inquiries: Vec<Inquiry> = self.api.send_json(request).await?;
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    async fn update_status(
        &self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<(), InquiryStoreError> {
        let path = format!("{}/status", Self::inquiry_path(id));
        let request = self
            .api
            .authorized(self.api.put(&path).query(&[("status", status.as_str())]));
        self.api.send(request).await?;
        tracing::info!(inquiry = %id, status = status.as_str(), "inquiry status updated");
        Ok(())
    }

    async fn delete_inquiry(&self, id: InquiryId) -> Result<(), InquiryStoreError> {
        let request = self.api.authorized(self.api.delete(&Self::inquiry_path(id)));
        self.api.send(request).await?;
        tracing::info!(inquiry = %id, "inquiry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_uses_query_parameter() {
        let api = ApiClient::with_client(reqwest::Client::new(), "http://shop.test");
        let id = InquiryId::new();
        let path = format!("{}/status", HttpInquiryStore::inquiry_path(id));
        let request = api
            .put(&path)
            .query(&[("status", InquiryStatus::Complete.as_str())])
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            format!("http://shop.test/api/admin/inquiries/{id}/status?status=complete")
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_retryable() {
        // Port 9 (discard) on localhost is closed in test environments.
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        let store = HttpInquiryStore::new(ApiClient::with_client(http, "http://127.0.0.1:9"));

        let err = store.list_inquiries().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
