//! Process wiring: configuration, logging and the REST-backed stores.

use std::sync::Arc;

use anyhow::Context;

use budbar_cart::CartSettings;
use budbar_infra::{
    ApiClient, AppConfig, HttpAdminAuth, HttpCatalogStore, HttpInquiryStore,
    InMemorySessionStorage, SessionStorage,
};

use crate::admin::AdminConsole;
use crate::session::StorefrontSession;

pub type SharedStorage = Arc<dyn SessionStorage>;

/// Long-lived services shared by every session of the process.
#[derive(Debug, Clone)]
pub struct Services {
    pub config: AppConfig,
    pub api: ApiClient,
}

impl Services {
    /// Load configuration from the environment and install logging.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env().context("invalid BUDBAR_* configuration")?;
        Self::new(config)
    }

    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        budbar_observability::init_with(&config.log);

        let api = ApiClient::new(&config)
            .with_context(|| format!("failed to build HTTP client for {}", config.api_url))?;

        tracing::info!(
            api = api.base_url(),
            pickup_address = config.pickup_address.is_some(),
            "storefront services ready"
        );
        Ok(Self { config, api })
    }

    pub fn cart_settings(&self) -> CartSettings {
        CartSettings {
            pickup_address: self.config.pickup_address.clone(),
        }
    }

    /// Fresh storage for a new visitor.
    pub fn new_storage(&self) -> SharedStorage {
        Arc::new(InMemorySessionStorage::new())
    }

    pub fn customer_session(
        &self,
        storage: SharedStorage,
    ) -> StorefrontSession<HttpCatalogStore, HttpInquiryStore, SharedStorage> {
        StorefrontSession::start(
            self.cart_settings(),
            HttpCatalogStore::new(self.api.clone()),
            HttpInquiryStore::new(self.api.clone()),
            storage,
        )
    }

    /// Credential login for [`AdminConsole::sign_in`].
    pub fn admin_auth(&self) -> HttpAdminAuth {
        HttpAdminAuth::new(self.api.clone())
    }

    /// Admin console whose REST calls read the token from `storage`.
    pub fn admin_console(
        &self,
        storage: SharedStorage,
    ) -> AdminConsole<HttpCatalogStore, HttpInquiryStore, SharedStorage> {
        let api = self.api.clone().with_session(storage.clone());
        AdminConsole::new(
            HttpCatalogStore::new(api.clone()),
            HttpInquiryStore::new(api),
            storage,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wires_pickup_address_and_api_url() {
        let config = AppConfig {
            api_url: "http://shop.test".to_string(),
            pickup_address: Some("5624 Grand River Road".to_string()),
            ..AppConfig::default()
        };
        let services = Services::new(config).unwrap();

        assert_eq!(services.api.base_url(), "http://shop.test/api");
        assert_eq!(
            services.cart_settings().pickup_address.as_deref(),
            Some("5624 Grand River Road")
        );
    }

    #[test]
    fn admin_token_lives_in_the_visitor_storage() {
        let services = Services::new(AppConfig::default()).unwrap();
        let storage = services.new_storage();
        let mut admin = services.admin_console(storage.clone());

        assert!(!admin.is_logged_in());
        admin.login("abc").unwrap();
        assert!(admin.is_logged_in());

        let other = services.admin_console(services.new_storage());
        assert!(!other.is_logged_in());
    }
}
