//! Infrastructure layer: configuration, store adapters, session storage.

pub mod auth;
pub mod config;
pub mod http;
pub mod memory;
pub mod session;

pub use auth::{AdminAuth, AuthError};
pub use config::{AppConfig, ConfigError, LogConfig, LogFormat};
pub use http::{ApiClient, HttpAdminAuth, HttpCatalogStore, HttpInquiryStore};
pub use memory::{InMemoryAdminAuth, InMemoryCatalogStore, InMemoryInquiryStore};
pub use session::{InMemorySessionStorage, SessionStorage, SessionStorageError};
