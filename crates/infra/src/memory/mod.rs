//! In-memory store adapters for tests and local development.
//!
//! The catalog and inquiry stores guard their state with a `RwLock`; a poisoned lock surfaces as
//! `Unavailable` rather than a panic.

pub mod auth;
pub mod catalog;
pub mod inquiries;

pub use auth::InMemoryAdminAuth;
pub use catalog::InMemoryCatalogStore;
pub use inquiries::InMemoryInquiryStore;

pub(crate) const POISONED: &str = "store lock poisoned";
