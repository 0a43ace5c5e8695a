//! Conversion from HTTP requests to the core request descriptor.

use axum::body::Body;
use axum::http::{Request, header};
use signet_core::SignedRequest;

use crate::error::ServerError;

/// Upper bound on form bodies read for signing.
const MAX_FORM_BODY_BYTES: usize = 64 * 1024;

/// Reduce an HTTP request to a [`SignedRequest`].
///
/// The signed URL is rebuilt as scheme+host+path with no query string; the
/// scheme comes from `X-Forwarded-Proto` when a fronting proxy sets it,
/// otherwise from configuration. Parameters come from the query string and,
/// for form posts, the body; the `Authorization` header is attached when
/// present.
pub(crate) async fn signed_request(
    scheme: &str,
    request: Request<Body>,
) -> Result<SignedRequest, ServerError> {
    let (parts, body) = request.into_parts();

    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(scheme);
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| parts.uri.host().map(str::to_owned))
        .unwrap_or_else(|| "localhost".to_owned());
    let url = format!("{scheme}://{host}{}", parts.uri.path());

    let mut params: Vec<(String, String)> = match parts.uri.query() {
        Some(query) => serde_urlencoded::from_str(query)
            .map_err(|_| ServerError::MalformedRequest("query string"))?,
        None => Vec::new(),
    };

    let is_form = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        let bytes = axum::body::to_bytes(body, MAX_FORM_BODY_BYTES)
            .await
            .map_err(|_| ServerError::MalformedRequest("request body"))?;
        let form: Vec<(String, String)> = serde_urlencoded::from_bytes(&bytes)
            .map_err(|_| ServerError::MalformedRequest("form body"))?;
        params.extend(form);
    }

    let mut signed = SignedRequest::new(parts.method.as_str(), url, params);
    if let Some(authorization) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        signed = signed.with_authorization(authorization);
    }
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::HOST, "provider.test")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_url_rebuilt_without_query() {
        let signed = signed_request("http", get("/oauth/request_token?a=1"))
            .await
            .unwrap();

        assert_eq!(signed.url(), "http://provider.test/oauth/request_token");
        assert_eq!(signed.method(), "GET");
    }

    #[tokio::test]
    async fn test_query_parameters_extracted() {
        let signed = signed_request("http", get("/r?oauth_nonce=n&plain=p"))
            .await
            .unwrap();

        assert_eq!(signed.oauth_param("oauth_nonce"), Some("n"));
        assert!(signed.signing_params().contains(&("plain".to_owned(), "p".to_owned())));
    }

    #[tokio::test]
    async fn test_forwarded_proto_overrides_scheme() {
        let request = Request::builder()
            .method("GET")
            .uri("/r")
            .header(header::HOST, "provider.test")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        let signed = signed_request("http", request).await.unwrap();

        assert_eq!(signed.url(), "https://provider.test/r");
    }

    #[tokio::test]
    async fn test_form_body_parameters_extracted() {
        let request = Request::builder()
            .method("POST")
            .uri("/r")
            .header(header::HOST, "provider.test")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("oauth_token=t&size=original"))
            .unwrap();
        let signed = signed_request("http", request).await.unwrap();

        assert_eq!(signed.oauth_param("oauth_token"), Some("t"));
        assert!(
            signed
                .signing_params()
                .contains(&("size".to_owned(), "original".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_authorization_header_attached() {
        let request = Request::builder()
            .method("GET")
            .uri("/r")
            .header(header::HOST, "provider.test")
            .header(
                header::AUTHORIZATION,
                r#"OAuth realm="x", oauth_consumer_key="ck""#,
            )
            .body(Body::empty())
            .unwrap();
        let signed = signed_request("http", request).await.unwrap();

        assert_eq!(signed.oauth_param("oauth_consumer_key"), Some("ck"));
    }
}
