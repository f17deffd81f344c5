//! Cart engine: the per-session service around the [`Cart`] aggregate.
//!
//! ```text
//!            add                 begin_submit            store ok
//!   Empty ─────────▶ Building ───────────────▶ Submitting ────────▶ Empty
//!     ▲                │  ▲                        │
//!     └─ last removed ─┘  └──────── store error ───┘
//! ```
//!
//! Every mutation is a command handled by the aggregate; the resulting events
//! are applied and then published on the engine's bus, where the UI picks up
//! confirmations. While a submission is in flight the cart and the form are
//! frozen, so what gets cleared on success is exactly what was sent.
//!
//! The engine is `Submitting` only while its [`PendingSubmission`] is alive.
//! Dropping it unsettled (a cancelled `submit` future, a timeout) puts the
//! engine back in `Building` with the cart untouched.

use std::sync::{Arc, Weak};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use budbar_catalog::{CatalogItem, CatalogVariant};
use budbar_core::{Aggregate, AggregateRoot, DomainError, Money, SessionId};
use budbar_events::{Event, EventBus};
use budbar_inquiries::{Inquiry, InquiryDraft, InquiryStore, InquiryStoreError};

use crate::cart::{
    AddLine, Cart, CartCommand, CartEvent, ClearCart, ClearReason, RemoveLine, SetQuantity,
};
use crate::draft::{DraftFields, ValidationError};
use crate::line::{CartLine, cart_total, line_total};

/// Observable state of a session's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartPhase {
    Empty,
    Building,
    Submitting,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("an inquiry is being submitted; wait for it to finish")]
    SubmissionInFlight,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Form or cart incomplete; nothing changed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("an inquiry is already being submitted")]
    SubmissionInFlight,
    /// The pending submission was not issued by this engine's current attempt.
    #[error("submission does not belong to this cart")]
    UnknownSubmission,
    /// The store failed; the cart is kept for a retry.
    #[error("Failed to submit inquiry. Please try again. ({0})")]
    Store(#[from] InquiryStoreError),
}

/// Per-deployment cart settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSettings {
    /// Sent as the address of pickup inquiries.
    pub pickup_address: Option<String>,
}

/// Serializable state of an unfinished cart ("remember this draft").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub fields: DraftFields,
}

/// A validated draft handed out by [`CartEngine::begin_submit`].
///
/// Give it back through [`CartEngine::finish_submit`] with the store's answer.
/// The engine stays in `Submitting` for as long as this value lives.
#[derive(Debug)]
#[must_use = "finish_submit settles the submission; dropping it abandons the attempt"]
pub struct PendingSubmission {
    ticket: Arc<SessionId>,
    draft: InquiryDraft,
}

impl PendingSubmission {
    pub fn draft(&self) -> &InquiryDraft {
        &self.draft
    }
}

pub struct CartEngine<B> {
    cart: Cart,
    fields: DraftFields,
    settings: CartSettings,
    /// Ticket of the attempt in flight; dead once its `PendingSubmission` is gone.
    in_flight: Weak<SessionId>,
    bus: B,
}

impl<B> core::fmt::Debug for CartEngine<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartEngine")
            .field("cart", &self.cart)
            .field("fields", &self.fields)
            .field("submitting", &(self.in_flight.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

impl<B> CartEngine<B>
where
    B: EventBus<CartEvent>,
{
    pub fn new(session_id: SessionId, settings: CartSettings, bus: B) -> Self {
        Self {
            cart: Cart::empty(session_id),
            fields: DraftFields::default(),
            settings,
            in_flight: Weak::new(),
            bus,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.cart.id_typed()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn line_count(&self) -> usize {
        self.cart.lines().len()
    }

    /// Events applied so far (adds, edits, clears).
    pub fn version(&self) -> u64 {
        self.cart.version()
    }

    pub fn phase(&self) -> CartPhase {
        if self.is_submitting() {
            CartPhase::Submitting
        } else if self.cart.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::Building
        }
    }

    pub fn fields(&self) -> &DraftFields {
        &self.fields
    }

    /// Add one unit of `variant`, quoting its current price and the item's discount.
    pub fn add_line(
        &mut self,
        item: &CatalogItem,
        variant: &CatalogVariant,
    ) -> Result<&[CartLine], CartError> {
        let command = CartCommand::AddLine(AddLine {
            session_id: self.session_id(),
            line: CartLine::quote(item, variant),
            occurred_at: Utc::now(),
        });
        self.execute(command)?;
        Ok(self.lines())
    }

    /// Like [`add_line`](Self::add_line), looking the variant up by name.
    pub fn add_variant(
        &mut self,
        item: &CatalogItem,
        variant_name: &str,
    ) -> Result<&[CartLine], CartError> {
        let variant = item
            .variant(variant_name)
            .ok_or_else(DomainError::not_found)?
            .clone();
        self.add_line(item, &variant)
    }

    /// Remove the line at `index`; out of range does nothing.
    pub fn remove_line(&mut self, index: usize) -> Result<&[CartLine], CartError> {
        let command = CartCommand::RemoveLine(RemoveLine {
            session_id: self.session_id(),
            index,
            occurred_at: Utc::now(),
        });
        self.execute(command)?;
        Ok(self.lines())
    }

    /// Replace the quantity at `index`; zero or less removes the line.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<&[CartLine], CartError> {
        let command = CartCommand::SetQuantity(SetQuantity {
            session_id: self.session_id(),
            index,
            quantity,
            occurred_at: Utc::now(),
        });
        self.execute(command)?;
        Ok(self.lines())
    }

    /// Drop every line without submitting.
    pub fn discard(&mut self) -> Result<(), CartError> {
        self.clear(ClearReason::Discarded)
    }

    pub fn line_total(&self, index: usize) -> Option<Money> {
        self.lines().get(index).map(line_total)
    }

    /// Unrounded sum of all line totals.
    pub fn cart_total(&self) -> Money {
        cart_total(self.lines())
    }

    /// Total as shown to the customer (`"18.00"`).
    pub fn display_total(&self) -> String {
        self.cart_total().to_string()
    }

    pub fn set_fields(&mut self, fields: DraftFields) -> Result<(), CartError> {
        self.ensure_idle()?;
        self.fields = fields;
        Ok(())
    }

    pub fn update_fields(&mut self, edit: impl FnOnce(&mut DraftFields)) -> Result<(), CartError> {
        self.ensure_idle()?;
        edit(&mut self.fields);
        Ok(())
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines().to_vec(),
            fields: self.fields.clone(),
        }
    }

    /// Replace the cart and form with a saved snapshot.
    pub fn restore(&mut self, snapshot: CartSnapshot) -> Result<(), CartError> {
        self.ensure_idle()?;
        self.cart = Cart::rehydrate(self.session_id(), &snapshot.lines, Utc::now());
        self.fields = snapshot.fields;
        tracing::debug!(
            session = %self.session_id(),
            lines = self.line_count(),
            "cart restored from snapshot"
        );
        Ok(())
    }

    /// Validate the form and cart and enter `Submitting`.
    ///
    /// On a validation error nothing changes.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::SubmissionInFlight);
        }

        let draft = self
            .fields
            .to_draft(self.lines(), self.settings.pickup_address.as_deref())?;

        let ticket = Arc::new(self.session_id());
        self.in_flight = Arc::downgrade(&ticket);
        tracing::info!(
            session = %self.session_id(),
            lines = draft.items.len(),
            total = %draft.total,
            "submitting inquiry"
        );

        Ok(PendingSubmission { ticket, draft })
    }

    /// Leave `Submitting` with the store's answer.
    ///
    /// Success clears the cart and resets the form; failure keeps both. A
    /// submission begun by another engine is refused without touching the cart.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<Inquiry, InquiryStoreError>,
    ) -> Result<Inquiry, SubmitError> {
        if !Weak::ptr_eq(&self.in_flight, &Arc::downgrade(&pending.ticket)) {
            tracing::warn!(
                session = %self.session_id(),
                submitted_by = %pending.ticket,
                "ignoring a submission this cart is not waiting for"
            );
            return Err(SubmitError::UnknownSubmission);
        }
        self.in_flight = Weak::new();
        drop(pending);

        match outcome {
            Ok(inquiry) => {
                if let Err(err) = self.clear(ClearReason::Submitted(inquiry.id)) {
                    tracing::error!(error = %err, "failed to clear cart after submission");
                }
                self.fields = DraftFields::default();
                tracing::info!(
                    session = %self.session_id(),
                    inquiry = %inquiry.id,
                    "inquiry submitted"
                );
                Ok(inquiry)
            }
            Err(err) => {
                tracing::warn!(
                    session = %self.session_id(),
                    error = %err,
                    retryable = err.is_retryable(),
                    "inquiry submission failed; cart kept"
                );
                Err(SubmitError::Store(err))
            }
        }
    }

    /// Validate, send to `store`, and settle the outcome.
    ///
    /// Cancelling the returned future before it resolves leaves the cart in
    /// `Building`, ready for another attempt.
    pub async fn submit<S>(&mut self, store: &S) -> Result<Inquiry, SubmitError>
    where
        S: InquiryStore + ?Sized,
    {
        let pending = self.begin_submit()?;
        let outcome = store.create_inquiry(pending.draft()).await;
        self.finish_submit(pending, outcome)
    }

    fn is_submitting(&self) -> bool {
        self.in_flight.strong_count() > 0
    }

    fn ensure_idle(&self) -> Result<(), CartError> {
        if self.is_submitting() {
            return Err(CartError::SubmissionInFlight);
        }
        Ok(())
    }

    fn clear(&mut self, reason: ClearReason) -> Result<(), CartError> {
        let command = CartCommand::ClearCart(ClearCart {
            session_id: self.session_id(),
            reason,
            occurred_at: Utc::now(),
        });
        self.execute(command)
    }

    fn execute(&mut self, command: CartCommand) -> Result<(), CartError> {
        self.ensure_idle()?;

        let events = self.cart.handle(&command)?;
        for event in events {
            self.cart.apply(&event);
            tracing::debug!(
                session = %self.session_id(),
                event = event.event_type(),
                lines = self.line_count(),
                "cart updated"
            );
            if let Err(err) = self.bus.publish(event) {
                tracing::warn!(error = %err, "failed to publish cart event");
            }
        }
        Ok(())
    }
}
