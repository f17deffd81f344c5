//! Inquiry cart domain module.
//!
//! [`Cart`] is the pure aggregate (commands in, events out, no IO);
//! [`CartEngine`] wraps it with the customer's draft form, the submission state
//! machine and the confirmation signal published on an event bus.

pub mod cart;
pub mod draft;
pub mod engine;
pub mod line;

pub use cart::{
    AddLine, Cart, CartCleared, CartCommand, CartEvent, ClearCart, ClearReason, LineAdded,
    LineRemoved, QuantityChanged, QuantityIncremented, RemoveLine, SetQuantity,
};
pub use draft::{DraftFields, ValidationError};
pub use engine::{
    CartEngine, CartError, CartPhase, CartSettings, CartSnapshot, PendingSubmission, SubmitError,
};
pub use line::{CartLine, LineKey, cart_total, line_total};
