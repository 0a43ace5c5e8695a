//! OAuth endpoint handlers.

pub(crate) mod access_token;
pub(crate) mod authorize;
pub(crate) mod echo;
pub(crate) mod register;
pub(crate) mod request_token;

use signet_core::oauth_encode;

/// Content type for token responses.
pub(crate) const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Success body for credential-issuing endpoints: `key=<k>&secret=<s>`.
pub(crate) fn credentials_body(key: &str, secret: &str) -> String {
    format!("key={}&secret={}", oauth_encode(key), oauth_encode(secret))
}
