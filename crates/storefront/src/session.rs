//! One customer's visit: menu browsing, the inquiry cart and its persistence.

use std::sync::Arc;

use thiserror::Error;

use budbar_cart::{
    CartEngine, CartError, CartEvent, CartLine, CartPhase, CartSettings, CartSnapshot,
    DraftFields, SubmitError,
};
use budbar_catalog::{CatalogStore, CatalogStoreError};
use budbar_core::{MenuItemId, Money, SessionId};
use budbar_events::{EventBus, InMemoryEventBus, Subscription};
use budbar_inquiries::{Inquiry, InquiryStore};
use budbar_infra::SessionStorage;
use budbar_infra::session::CART_DRAFT_KEY;

use crate::browse::CatalogBrowser;

pub type CartBus = Arc<InMemoryEventBus<CartEvent>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Catalog(#[from] CatalogStoreError),
}

/// A customer session.
///
/// After every cart or form change the [`CartSnapshot`] is written to session
/// storage, and [`start`](Self::start) picks it up again. Storage failures are
/// logged; the cart itself keeps working.
pub struct StorefrontSession<C, I, S> {
    browser: CatalogBrowser<C>,
    engine: CartEngine<CartBus>,
    inquiries: I,
    storage: S,
}

impl<C, I, S> StorefrontSession<C, I, S>
where
    C: CatalogStore,
    I: InquiryStore,
    S: SessionStorage,
{
    /// Open a session, restoring a saved cart when storage has one.
    pub fn start(settings: CartSettings, catalog: C, inquiries: I, storage: S) -> Self {
        let bus: CartBus = Arc::new(InMemoryEventBus::new());
        let mut engine = CartEngine::new(SessionId::new(), settings, bus);

        match storage.load_json::<CartSnapshot>(CART_DRAFT_KEY) {
            Ok(Some(snapshot)) => {
                if let Err(err) = engine.restore(snapshot) {
                    tracing::warn!(error = %err, "could not restore saved cart");
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable saved cart");
                if let Err(err) = storage.remove(CART_DRAFT_KEY) {
                    tracing::warn!(error = %err, "could not clear saved cart");
                }
            }
        }

        tracing::info!(
            session = %engine.session_id(),
            lines = engine.line_count(),
            "session started"
        );

        Self {
            browser: CatalogBrowser::new(catalog),
            engine,
            inquiries,
            storage,
        }
    }

    pub fn browser(&self) -> &CatalogBrowser<C> {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut CatalogBrowser<C> {
        &mut self.browser
    }

    pub fn engine(&self) -> &CartEngine<CartBus> {
        &self.engine
    }

    /// Confirmation messages and other cart events, from now on.
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.engine.bus().subscribe()
    }

    pub fn lines(&self) -> &[CartLine] {
        self.engine.lines()
    }

    pub fn phase(&self) -> CartPhase {
        self.engine.phase()
    }

    pub fn cart_total(&self) -> Money {
        self.engine.cart_total()
    }

    pub fn display_total(&self) -> String {
        self.engine.display_total()
    }

    /// Add one unit of an item's variant, reading the item's current price.
    pub async fn add_to_cart(
        &mut self,
        item_id: MenuItemId,
        variant_name: &str,
    ) -> Result<&[CartLine], SessionError> {
        let item = self.browser.item(item_id).await?;
        self.engine.add_variant(&item, variant_name)?;
        self.persist();
        Ok(self.engine.lines())
    }

    pub fn remove_line(&mut self, index: usize) -> Result<&[CartLine], SessionError> {
        self.engine.remove_line(index)?;
        self.persist();
        Ok(self.engine.lines())
    }

    pub fn set_quantity(
        &mut self,
        index: usize,
        quantity: i64,
    ) -> Result<&[CartLine], SessionError> {
        self.engine.set_quantity(index, quantity)?;
        self.persist();
        Ok(self.engine.lines())
    }

    pub fn fields(&self) -> &DraftFields {
        self.engine.fields()
    }

    pub fn update_fields(
        &mut self,
        edit: impl FnOnce(&mut DraftFields),
    ) -> Result<(), SessionError> {
        self.engine.update_fields(edit)?;
        self.persist();
        Ok(())
    }

    /// Submit the cart as an inquiry. On success the saved draft is cleared.
    pub async fn submit(&mut self) -> Result<Inquiry, SubmitError> {
        let result = self.engine.submit(&self.inquiries).await;
        self.persist();
        result
    }

    fn persist(&self) {
        let snapshot = self.engine.snapshot();
        let result = if snapshot == CartSnapshot::default() {
            self.storage.remove(CART_DRAFT_KEY)
        } else {
            self.storage.save_json(CART_DRAFT_KEY, &snapshot)
        };

        if let Err(err) = result {
            tracing::warn!(
                session = %self.engine.session_id(),
                error = %err,
                "could not save cart"
            );
        }
    }
}
