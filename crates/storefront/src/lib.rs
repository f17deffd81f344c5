//! Composition of the customer storefront and the admin console.
//!
//! Nothing here holds business rules; it wires the cart engine, the catalog
//! and inquiry stores, and per-session storage together.

pub mod admin;
pub mod bootstrap;
pub mod browse;
pub mod session;

pub use admin::{AdminConsole, AdminError};
pub use bootstrap::Services;
pub use browse::CatalogBrowser;
pub use session::{SessionError, StorefrontSession};
