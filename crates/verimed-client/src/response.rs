//! Request shaping and response mapping shared by the async and blocking clients

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Result, VerimedError};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Parse a base URL, dropping trailing slashes
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim_end_matches('/');

    let url = Url::parse(trimmed)
        .map_err(|e| VerimedError::Config(format!("invalid base URL `{base_url}`: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(VerimedError::Config(format!(
            "base URL `{base_url}` cannot carry a path"
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(VerimedError::Config(format!(
            "base URL `{base_url}` must not contain a query or fragment"
        )));
    }

    Ok(url)
}

/// Append path segments to the base URL
///
/// Each segment is percent-encoded on its own, so caller-supplied ids
/// cannot escape their segment.
pub fn endpoint(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Headers sent on every request
pub fn default_headers(api_key: &SecretString) -> Result<HeaderMap> {
    let mut key = HeaderValue::from_str(api_key.expose_secret())
        .map_err(|e| VerimedError::Config(format!("invalid API key header value: {e}")))?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(API_KEY_HEADER, key);

    Ok(headers)
}

/// Turn a status and body into the typed result for the call
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    if !status.is_success() {
        return Err(api_error(status, body));
    }

    serde_json::from_str(&body).map_err(|e| VerimedError::Decode {
        message: e.to_string(),
        body,
    })
}

/// Build the error for a non-success response
pub fn api_error(status: StatusCode, body: String) -> VerimedError {
    let status = status.as_u16();
    let message = error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));

    tracing::warn!(status, %message, "verification API returned an error");

    VerimedError::Api {
        status,
        message,
        body,
    }
}

/// Extract the `message` field of a JSON error body
///
/// Validation failures carry a list of messages, which are joined.
fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;

    match json.get("message")? {
        serde_json::Value::String(message) if !message.is_empty() => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base(url: &str) -> Url {
        parse_base_url(url).unwrap()
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let url = endpoint(&base("http://x/"), &["v1", "verify"]);
        assert_eq!(url.as_str(), "http://x/v1/verify");

        let url = endpoint(&base("http://x///"), &["health"]);
        assert_eq!(url.as_str(), "http://x/health");
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let url = endpoint(&base("https://api.example.com/verimed/"), &["v1", "verify", "batch"]);

        assert_eq!(url.as_str(), "https://api.example.com/verimed/v1/verify/batch");
    }

    #[test]
    fn transaction_id_stays_in_one_segment() {
        let url = endpoint(&base("http://x"), &["v1", "verify", "a/b c"]);

        assert_eq!(url.as_str(), "http://x/v1/verify/a%2Fb%20c");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, VerimedError::Config(_)));

        let err = parse_base_url("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, VerimedError::Config(_)));
    }

    #[test]
    fn query_or_fragment_in_base_url_is_rejected() {
        for url in ["http://x/?v=1", "http://x/api?v=1", "http://x/#top", "http://x?"] {
            let err = parse_base_url(url).unwrap_err();
            assert!(matches!(err, VerimedError::Config(_)), "{url} accepted");
            assert!(err.to_string().contains("query or fragment"));
        }
    }

    #[test]
    fn default_headers_carry_api_key() {
        let headers = default_headers(&SecretString::from("secret-key")).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[API_KEY_HEADER], "secret-key");
        assert!(headers[API_KEY_HEADER].is_sensitive());
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let err = default_headers(&SecretString::from("bad\nkey")).unwrap_err();

        assert!(matches!(err, VerimedError::Config(_)));
    }

    #[test]
    fn error_message_from_json_body() {
        let err = api_error(StatusCode::NOT_FOUND, r#"{"message":"Not found"}"#.to_owned());

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Not found");
        assert_eq!(err.body(), Some(r#"{"message":"Not found"}"#));
    }

    #[test]
    fn validation_messages_are_joined() {
        let body = json!({
            "statusCode": 400,
            "message": ["firstName should not be empty", "countryCode must be 2 characters"],
            "error": "Bad Request"
        })
        .to_string();

        let err = api_error(StatusCode::BAD_REQUEST, body);

        assert_eq!(
            err.message(),
            "firstName should not be empty; countryCode must be 2 characters"
        );
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".to_owned());

        assert_eq!(err.message(), "HTTP 502");
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.body(), Some("<html>bad gateway</html>"));
    }

    #[test]
    fn json_without_message_falls_back_to_status() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#.to_owned());

        assert_eq!(err.message(), "HTTP 500");
    }

    #[test]
    fn decode_success_body() {
        let value: serde_json::Map<String, serde_json::Value> =
            decode(StatusCode::OK, r#"{"status":"ok"}"#.to_owned()).unwrap();

        assert_eq!(value["status"], "ok");
    }

    #[test]
    fn decode_mismatched_body_is_decode_error() {
        let err = decode::<Vec<String>>(StatusCode::OK, "{}".to_owned()).unwrap_err();

        assert!(matches!(err, VerimedError::Decode { .. }));
        assert_eq!(err.body(), Some("{}"));
    }
}
