//! Admin console: catalog maintenance and the inquiry inbox.
//!
//! Every call needs a stored bearer token. When a store answers
//! `Unauthorized` the token is dropped, which sends the admin back to login.

use thiserror::Error;

use budbar_catalog::{
    CatalogAdmin, CatalogItem, CatalogStoreError, ItemFilter, ItemInput, ReorderEntry, move_item,
};
use budbar_core::{DomainError, InquiryId, MenuItemId};
use budbar_infra::session::ADMIN_TOKEN_KEY;
use budbar_infra::{AdminAuth, AuthError, SessionStorage, SessionStorageError};
use budbar_inquiries::{Inquiry, InquiryAdmin, InquiryStatus, InquiryStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("admin login required")]
    NotLoggedIn,
    #[error(transparent)]
    Catalog(#[from] CatalogStoreError),
    #[error(transparent)]
    Inquiry(#[from] InquiryStoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] SessionStorageError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl AdminError {
    fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AdminError::Catalog(CatalogStoreError::Unauthorized)
                | AdminError::Inquiry(InquiryStoreError::Unauthorized)
        )
    }
}

pub struct AdminConsole<C, I, S> {
    catalog: C,
    inquiries: I,
    storage: S,
    /// Menu as last loaded, in display order.
    items: Vec<CatalogItem>,
}

impl<C, I, S> AdminConsole<C, I, S>
where
    C: CatalogAdmin,
    I: InquiryAdmin,
    S: SessionStorage,
{
    pub fn new(catalog: C, inquiries: I, storage: S) -> Self {
        Self {
            catalog,
            inquiries,
            storage,
            items: Vec::new(),
        }
    }

    /// Exchange `email` and `password` for a token and keep it.
    ///
    /// A refused login leaves any previous token in place.
    pub async fn sign_in<A>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> Result<(), AdminError>
    where
        A: AdminAuth + ?Sized,
    {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }
        let token = auth.login(email, password).await?;
        self.login(token)
    }

    /// Keep a token obtained elsewhere.
    pub fn login(&mut self, token: impl Into<String>) -> Result<(), AdminError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AdminError::NotLoggedIn);
        }
        self.storage.set(ADMIN_TOKEN_KEY, token)?;
        tracing::info!("admin logged in");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AdminError> {
        self.storage.remove(ADMIN_TOKEN_KEY)?;
        self.items.clear();
        tracing::info!("admin logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.storage.get(ADMIN_TOKEN_KEY), Ok(Some(ref t)) if !t.trim().is_empty())
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub async fn refresh_items(&mut self) -> Result<&[CatalogItem], AdminError> {
        self.require_login()?;
        let loaded = self.catalog.list_items(&ItemFilter::all()).await;
        self.items = self.settle(loaded)?;
        Ok(&self.items)
    }

    pub async fn create_item(&mut self, input: ItemInput) -> Result<CatalogItem, AdminError> {
        self.require_login()?;
        let input = input.validated()?;
        let created = self.catalog.create_item(input).await;
        let item = self.settle(created)?;
        self.items.push(item.clone());
        Ok(item)
    }

    pub async fn update_item(
        &mut self,
        id: MenuItemId,
        input: ItemInput,
    ) -> Result<CatalogItem, AdminError> {
        self.require_login()?;
        let input = input.validated()?;
        let updated = self.catalog.update_item(id, input).await;
        let item = self.settle(updated)?;
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == id) {
            *slot = item.clone();
        }
        Ok(item)
    }

    pub async fn delete_item(&mut self, id: MenuItemId) -> Result<(), AdminError> {
        self.require_login()?;
        let deleted = self.catalog.delete_item(id).await;
        self.settle(deleted)?;
        self.items.retain(|i| i.id != id);
        Ok(())
    }

    /// Drag-and-drop: move the item shown at `from` to `to` and persist the
    /// whole new order in one call.
    ///
    /// When the store refuses, the menu is reloaded so the list shows what
    /// is actually stored.
    pub async fn move_item(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<Vec<ReorderEntry>, AdminError> {
        self.require_login()?;
        let batch = move_item(&mut self.items, from, to)?;

        let saved = self.catalog.reorder(&batch).await;
        if let Err(err) = self.settle(saved) {
            tracing::warn!(error = %err, "reorder failed; reloading menu");
            if !err.is_unauthorized() {
                if let Ok(items) = self.catalog.list_items(&ItemFilter::all()).await {
                    self.items = items;
                }
            }
            return Err(err);
        }
        Ok(batch)
    }

    /// Inbox, newest first.
    pub async fn inquiries(&mut self) -> Result<Vec<Inquiry>, AdminError> {
        self.require_login()?;
        let listed = self.inquiries.list_inquiries().await;
        self.settle(listed)
    }

    pub async fn set_status(
        &mut self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<(), AdminError> {
        self.require_login()?;
        let updated = self.inquiries.update_status(id, status).await;
        self.settle(updated)
    }

    pub async fn delete_inquiry(&mut self, id: InquiryId) -> Result<(), AdminError> {
        self.require_login()?;
        let deleted = self.inquiries.delete_inquiry(id).await;
        self.settle(deleted)
    }

    fn require_login(&self) -> Result<(), AdminError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(AdminError::NotLoggedIn)
        }
    }

    /// Convert a store result, logging out on `Unauthorized`.
    fn settle<T, E>(&mut self, result: Result<T, E>) -> Result<T, AdminError>
    where
        E: Into<AdminError>,
    {
        result.map_err(|e| {
            let err = e.into();
            if err.is_unauthorized() {
                tracing::warn!("admin token rejected; logging out");
                if let Err(storage) = self.logout() {
                    tracing::warn!(error = %storage, "could not clear admin token");
                }
            }
            err
        })
    }
}
