//! Per-session key/value storage (what a browser keeps in local storage).
//!
//! Components receive a `SessionStorage` instead of reaching for a global, so
//! two sessions never see each other's cart or admin token.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Bearer token of a logged-in admin.
pub const ADMIN_TOKEN_KEY: &str = "admin_token";

/// Unfinished customer cart and form.
pub const CART_DRAFT_KEY: &str = "inquiry_cart";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionStorageError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored value under {key:?} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },
}

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError>;

    fn set(&self, key: &str, value: String) -> Result<(), SessionStorageError>;

    fn remove(&self, key: &str) -> Result<(), SessionStorageError>;

    /// Read and decode a JSON value.
    fn load_json<T>(&self, key: &str) -> Result<Option<T>, SessionStorageError>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionStorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn save_json<T>(&self, key: &str, value: &T) -> Result<(), SessionStorageError>
    where
        T: Serialize,
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|e| SessionStorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.set(key, raw)
    }
}

impl<S> SessionStorage for Arc<S>
where
    S: SessionStorage + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionStorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SessionStorageError {
    SessionStorageError::Unavailable("lock poisoned".to_string())
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionStorageError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStorageError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Draft {
        name: String,
        lines: u32,
    }

    #[test]
    fn set_get_remove() {
        let storage = InMemorySessionStorage::new();
        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "abc".to_string()).unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

        storage.remove("token").unwrap();
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn json_helpers_round_through_strings() {
        let storage = Arc::new(InMemorySessionStorage::new());
        let draft = Draft {
            name: "Sam".to_string(),
            lines: 2,
        };
        storage.save_json("cart", &draft).unwrap();
        assert_eq!(storage.load_json::<Draft>("cart").unwrap(), Some(draft));
        assert_eq!(storage.load_json::<Draft>("missing").unwrap(), None);
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let storage = InMemorySessionStorage::new();
        storage.set("cart", "{not json".to_string()).unwrap();
        let err = storage.load_json::<Draft>("cart").unwrap_err();
        assert!(matches!(err, SessionStorageError::Corrupt { ref key, .. } if key == "cart"));
    }
}
