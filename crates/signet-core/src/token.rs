//! Consumer and token credential model.

use std::fmt;
use std::sync::Arc;

use rand::RngExt;

use crate::error::AuthError;
use crate::signature::oauth_encode;

/// Verifier length in characters.
pub const VERIFIER_LEN: usize = 32;

/// Random string over the lowercase hex alphabet.
pub fn generate_string(len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rand::rng().fill(&mut bytes[..]);
    let mut out = hex::encode(bytes);
    out.truncate(len);
    out
}

/// Verifier source, swappable per token instance.
pub type VerifierGenerator = Arc<dyn Fn() -> String + Send + Sync>;

fn default_verifier_generator() -> VerifierGenerator {
    Arc::new(|| generate_string(VERIFIER_LEN))
}

fn require_credentials(key: &str, secret: &str) -> Result<(), AuthError> {
    if key.is_empty() || secret.is_empty() {
        return Err(AuthError::Configuration {
            detail: "key and secret must be non-empty",
        });
    }
    Ok(())
}

/// Registered client application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    /// Opaque unique identifier.
    pub key: String,
    /// Shared secret; never transmitted over the wire.
    pub secret: String,
    /// Default callback, used when the client omits one (pre-1.0a clients)
    /// or requests out-of-band delivery.
    pub callback: Option<String>,
}

impl Consumer {
    /// Create a consumer.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if `key` or `secret` is empty.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, AuthError> {
        let key = key.into();
        let secret = secret.into();
        require_credentials(&key, &secret)?;
        Ok(Self {
            key,
            secret,
            callback: None,
        })
    }

    /// Set the registered default callback.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }
}

/// Short-lived credential used only to complete the authorization handshake.
#[derive(Clone)]
pub struct RequestToken {
    /// Provider-generated identifier.
    pub key: String,
    /// Provider-generated secret; enters the signing key during exchange.
    pub secret: String,
    /// Owning consumer. A token belongs to exactly one consumer.
    pub consumer_key: String,
    /// Where to send the user after authorization. `None` means out-of-band:
    /// the verifier is displayed to the user instead of redirected.
    pub callback: Option<String>,
    /// Set once the user authorizes. Re-authorization replaces it, which
    /// invalidates any verifier a client is already holding.
    pub verifier: Option<String>,
    verifier_generator: VerifierGenerator,
}

impl RequestToken {
    /// Create an unauthorized request token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if `key` or `secret` is empty.
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let key = key.into();
        let secret = secret.into();
        require_credentials(&key, &secret)?;
        Ok(Self {
            key,
            secret,
            consumer_key: consumer_key.into(),
            callback: None,
            verifier: None,
            verifier_generator: default_verifier_generator(),
        })
    }

    /// Set the callback.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.set_callback(callback);
        self
    }

    /// Replace the verifier source.
    #[must_use]
    pub fn with_verifier_generator(mut self, generator: VerifierGenerator) -> Self {
        self.verifier_generator = generator;
        self
    }

    /// Set the callback.
    pub fn set_callback(&mut self, callback: impl Into<String>) {
        self.callback = Some(callback.into());
    }

    /// Bind the verifier: the supplied value, or a freshly generated one.
    ///
    /// Calling this again replaces the verifier. Any verifier issued earlier
    /// for this token stops matching and can no longer complete an exchange.
    pub fn set_verifier(&mut self, verifier: Option<&str>) {
        self.verifier = Some(match verifier {
            Some(v) => v.to_owned(),
            None => (self.verifier_generator)(),
        });
    }

    /// Redirect target for the authorized token.
    ///
    /// With both a callback and a verifier present, appends
    /// `oauth_token=<key>&oauth_verifier=<verifier>` to the callback,
    /// preserving any existing query string and fragment. Otherwise returns
    /// the bare callback, or `None` when there is none.
    pub fn callback_url(&self) -> Option<String> {
        let callback = self.callback.as_deref()?;
        let Some(verifier) = self.verifier.as_deref() else {
            return Some(callback.to_owned());
        };
        let (base, fragment) = match callback.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (callback, None),
        };
        let separator = if base.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{base}{separator}oauth_token={}&oauth_verifier={}",
            oauth_encode(&self.key),
            oauth_encode(verifier)
        );
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        Some(url)
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestToken")
            .field("key", &self.key)
            .field("secret", &self.secret)
            .field("consumer_key", &self.consumer_key)
            .field("callback", &self.callback)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

/// Long-lived credential for signing protected-resource requests.
///
/// Carries no callback or verifier; those are request-token-only concepts
/// and omitting the fields keeps the two lifecycles from being confused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Provider-generated identifier.
    pub key: String,
    /// Provider-generated secret.
    pub secret: String,
    /// Owning consumer.
    pub consumer_key: String,
}

impl AccessToken {
    /// Create an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if `key` or `secret` is empty.
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let key = key.into();
        let secret = secret.into();
        require_credentials(&key, &secret)?;
        Ok(Self {
            key,
            secret,
            consumer_key: consumer_key.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request_token() -> RequestToken {
        RequestToken::new("tkey", "tsecret", "ckey").unwrap()
    }

    #[test]
    fn test_generate_string_length_and_alphabet() {
        let s = generate_string(32);

        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_string_odd_length() {
        assert_eq!(generate_string(15).len(), 15);
    }

    #[test]
    fn test_consumer_requires_credentials() {
        assert!(matches!(
            Consumer::new("", "secret"),
            Err(AuthError::Configuration { .. })
        ));
        assert!(matches!(
            Consumer::new("key", ""),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_request_token_requires_credentials() {
        assert!(matches!(
            RequestToken::new("", "", "ckey"),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_set_verifier_generates_when_unspecified() {
        let mut token = request_token();
        token.set_verifier(None);

        let verifier = token.verifier.clone().unwrap();
        assert_eq!(verifier.len(), VERIFIER_LEN);
        assert!(verifier.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_set_verifier_explicit_value() {
        let mut token = request_token();
        token.set_verifier(Some("abc123"));

        assert_eq!(token.verifier.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_set_verifier_replaces_previous() {
        let mut token = request_token();
        token.set_verifier(Some("first"));
        token.set_verifier(Some("second"));

        assert_eq!(token.verifier.as_deref(), Some("second"));
    }

    #[test]
    fn test_custom_verifier_generator() {
        let mut token =
            request_token().with_verifier_generator(Arc::new(|| "fixed".to_owned()));
        token.set_verifier(None);

        assert_eq!(token.verifier.as_deref(), Some("fixed"));
    }

    #[test]
    fn test_callback_url_appends_to_existing_query() {
        let mut token = RequestToken::new("T", "s", "c")
            .unwrap()
            .with_callback("https://x/cb?a=1");
        token.set_verifier(Some("V"));

        assert_eq!(
            token.callback_url().as_deref(),
            Some("https://x/cb?a=1&oauth_token=T&oauth_verifier=V")
        );
    }

    #[test]
    fn test_callback_url_without_existing_query() {
        let mut token = RequestToken::new("T", "s", "c")
            .unwrap()
            .with_callback("https://x/cb");
        token.set_verifier(Some("V"));

        assert_eq!(
            token.callback_url().as_deref(),
            Some("https://x/cb?oauth_token=T&oauth_verifier=V")
        );
    }

    #[test]
    fn test_callback_url_preserves_fragment() {
        let mut token = RequestToken::new("T", "s", "c")
            .unwrap()
            .with_callback("https://x/cb#done");
        token.set_verifier(Some("V"));

        assert_eq!(
            token.callback_url().as_deref(),
            Some("https://x/cb?oauth_token=T&oauth_verifier=V#done")
        );
    }

    #[test]
    fn test_callback_url_bare_before_authorization() {
        let token = request_token().with_callback("https://x/cb");

        assert_eq!(token.callback_url().as_deref(), Some("https://x/cb"));
    }

    #[test]
    fn test_callback_url_none_without_callback() {
        let mut token = request_token();
        token.set_verifier(Some("V"));

        assert_eq!(token.callback_url(), None);
    }

    #[test]
    fn test_request_token_debug_redacts_generator() {
        let rendered = format!("{:?}", request_token());

        assert!(rendered.contains("tkey"));
        assert!(!rendered.contains("generator"));
    }
}
