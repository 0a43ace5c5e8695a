//! In-memory credential store.
//!
//! Backs unit tests and demo deployments; data is lost on process exit.
//! Production deployments implement [`CredentialStore`] over a real
//! database outside this crate.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::store::{CredentialStore, StoreError, StoreErrorKind, generate_key, generate_secret};
use crate::token::{AccessToken, Consumer, RequestToken};

const BACKEND: &str = "Memory";

/// In-memory [`CredentialStore`].
///
/// Use the builder methods to seed test data:
///
/// ```
/// use signet_core::{Consumer, MemoryStore};
///
/// let store = MemoryStore::new()
///     .with_consumer(Consumer::new("ck", "cs").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    consumers: RwLock<HashMap<String, Consumer>>,
    request_tokens: RwLock<HashMap<String, RequestToken>>,
    access_tokens: RwLock<HashMap<String, AccessToken>>,
}

/// Generate a key that is not already present in the map.
fn fresh_key<V>(existing: &HashMap<String, V>) -> String {
    loop {
        let key = generate_key();
        if !existing.contains_key(&key) {
            return key;
        }
    }
}

/// Credential construction can only fail on empty inputs, which generated
/// credentials never are; surface the impossible case as a backend error
/// instead of panicking.
fn construction(err: AuthError) -> StoreError {
    StoreError::new(StoreErrorKind::Other)
        .with_backend(BACKEND)
        .with_source(err)
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a consumer.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_consumer(self, consumer: Consumer) -> Self {
        self.consumers
            .write()
            .unwrap()
            .insert(consumer.key.clone(), consumer);
        self
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_consumer(&self, key: &str) -> Result<Option<Consumer>, StoreError> {
        Ok(self.consumers.read().unwrap().get(key).cloned())
    }

    async fn add_consumer(
        &self,
        key: Option<String>,
        secret: Option<String>,
    ) -> Result<Consumer, StoreError> {
        let mut consumers = self.consumers.write().unwrap();
        let key = key.unwrap_or_else(|| fresh_key(&consumers));
        let secret = secret.unwrap_or_else(generate_secret);
        let consumer = Consumer::new(key, secret).map_err(construction)?;
        consumers.insert(consumer.key.clone(), consumer.clone());
        Ok(consumer)
    }

    async fn save_consumer(&self, consumer: Consumer) -> Result<Consumer, StoreError> {
        self.consumers
            .write()
            .unwrap()
            .insert(consumer.key.clone(), consumer.clone());
        Ok(consumer)
    }

    async fn remove_consumer(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.consumers.write().unwrap().remove(key).is_some())
    }

    async fn get_request_token(&self, key: &str) -> Result<Option<RequestToken>, StoreError> {
        Ok(self.request_tokens.read().unwrap().get(key).cloned())
    }

    async fn add_request_token(
        &self,
        consumer_key: &str,
        callback: Option<String>,
    ) -> Result<RequestToken, StoreError> {
        let mut tokens = self.request_tokens.write().unwrap();
        let key = fresh_key(&tokens);
        let mut token =
            RequestToken::new(key, generate_secret(), consumer_key).map_err(construction)?;
        if let Some(callback) = callback {
            token.set_callback(callback);
        }
        tokens.insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn save_request_token(&self, token: RequestToken) -> Result<RequestToken, StoreError> {
        self.request_tokens
            .write()
            .unwrap()
            .insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn remove_request_token(&self, key: &str) -> Result<bool, StoreError> {
        // One write lock covers lookup and removal, so concurrent exchanges
        // cannot both observe the token as present.
        Ok(self.request_tokens.write().unwrap().remove(key).is_some())
    }

    async fn get_access_token(&self, key: &str) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.access_tokens.read().unwrap().get(key).cloned())
    }

    async fn add_access_token(&self, consumer_key: &str) -> Result<AccessToken, StoreError> {
        let mut tokens = self.access_tokens.write().unwrap();
        let key = fresh_key(&tokens);
        let token =
            AccessToken::new(key, generate_secret(), consumer_key).map_err(construction)?;
        tokens.insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn save_access_token(&self, token: AccessToken) -> Result<AccessToken, StoreError> {
        self.access_tokens
            .write()
            .unwrap()
            .insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn remove_access_token(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.access_tokens.write().unwrap().remove(key).is_some())
    }
}
