//! Credential store contract.
//!
//! The core calls the store through this trait and never assumes a backend.
//! Implementations may be network-backed: every method is async and the core
//! tolerates suspension at each call (the replay guard lock is never held
//! across one). Select a concrete implementation by constructing it and
//! passing it in; there is no name-based dynamic loading.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::token::{AccessToken, Consumer, RequestToken, generate_string};

/// Generated key length. Implementations re-check generated keys for
/// uniqueness against the store before use.
pub const KEY_LEN: usize = 32;

/// Generated secret length.
pub const SECRET_LEN: usize = 128;

/// Random key for a new consumer or token.
pub fn generate_key() -> String {
    generate_string(KEY_LEN)
}

/// Random secret for a new consumer or token.
pub fn generate_secret() -> String {
    generate_string(SECRET_LEN)
}

/// Semantic category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Backend unreachable or refusing work.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Anything else.
    Other,
}

/// Store failure.
///
/// Always distinct from an authentication failure: callers treat it as
/// retryable and must never report it as a verification verdict.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic category.
    pub kind: StoreErrorKind,
    /// Backend identifier (e.g. "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl StoreError {
    /// Create a store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            backend: None,
            source: None,
        }
    }

    /// Attach a backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        let kind = match self.kind {
            StoreErrorKind::Unavailable => "store unavailable",
            StoreErrorKind::Timeout => "store timeout",
            StoreErrorKind::Other => "store error",
        };
        write!(f, "{kind}")?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn Error + 'static))
    }
}

/// Persistence for consumers, request tokens and access tokens.
///
/// `add_*` methods generate credentials when unspecified. `remove_*` methods
/// return whether the entity was present; `remove_request_token` is the
/// atomic invalidate-on-exchange step, so two exchanges racing on the same
/// request token must not both observe `true`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a consumer by key.
    async fn get_consumer(&self, key: &str) -> Result<Option<Consumer>, StoreError>;

    /// Create a consumer, generating key/secret when unspecified.
    async fn add_consumer(
        &self,
        key: Option<String>,
        secret: Option<String>,
    ) -> Result<Consumer, StoreError>;

    /// Persist a consumer.
    async fn save_consumer(&self, consumer: Consumer) -> Result<Consumer, StoreError>;

    /// Remove a consumer. Returns whether it existed.
    async fn remove_consumer(&self, key: &str) -> Result<bool, StoreError>;

    /// Fetch a request token by key.
    async fn get_request_token(&self, key: &str) -> Result<Option<RequestToken>, StoreError>;

    /// Mint a request token for a consumer with generated credentials.
    async fn add_request_token(
        &self,
        consumer_key: &str,
        callback: Option<String>,
    ) -> Result<RequestToken, StoreError>;

    /// Persist a request token.
    async fn save_request_token(&self, token: RequestToken) -> Result<RequestToken, StoreError>;

    /// Remove a request token. Returns whether it was still present; used as
    /// the compare-and-delete enforcing single-use exchange.
    async fn remove_request_token(&self, key: &str) -> Result<bool, StoreError>;

    /// Fetch an access token by key.
    async fn get_access_token(&self, key: &str) -> Result<Option<AccessToken>, StoreError>;

    /// Mint an access token for a consumer with generated credentials.
    async fn add_access_token(&self, consumer_key: &str) -> Result<AccessToken, StoreError>;

    /// Persist an access token.
    async fn save_access_token(&self, token: AccessToken) -> Result<AccessToken, StoreError>;

    /// Remove an access token. Returns whether it existed.
    async fn remove_access_token(&self, key: &str) -> Result<bool, StoreError>;
}
