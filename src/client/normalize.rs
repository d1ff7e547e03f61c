//! Conversion of failed attempts into [`ApiError`].
//!
//! Three kinds of failure reach the normalizer:
//!
//! - a response with a non-`2xx` status: the error payload is extracted by content type
//!   and its `error`/`message` field (or the raw text) becomes the message when present
//! - a transport failure: status `0`, unless the HTTP stack itself reported a timeout
//! - an attempt cut off by the per-attempt timeout: status `408`

use crate::error::{ApiError, ErrorCause, ErrorKind};
use crate::protocol::{friendly_message, is_json_media_type, Locale};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const TIMEOUT_STATUS: u16 = 408;

/// Extract an error payload: JSON when declared as such, raw text otherwise.
///
/// A body declared as JSON that does not parse yields `None`.
pub fn extract_error_payload(content_type: Option<&str>, body: &[u8]) -> Option<Value> {
    if content_type.is_some_and(is_json_media_type) {
        serde_json::from_slice(body).ok()
    } else {
        Some(Value::String(String::from_utf8_lossy(body).into_owned()))
    }
}

/// Server-supplied detail text from an error payload.
fn detail_text(payload: Option<&Value>) -> Option<&str> {
    match payload? {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => ["error", "message"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|text| !text.is_empty()),
        _ => None,
    }
}

/// Normalize a response with a non-success status.
pub fn from_status(
    locale: Locale,
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
    url: &Url,
) -> ApiError {
    let payload = extract_error_payload(content_type, body);
    let message = friendly_message(locale, Some(status), detail_text(payload.as_ref()), false);

    ApiError::new(ErrorKind::from_status(status), status, message)
        .with_payload(payload)
        .with_url(url.as_str())
}

/// Normalize a failure below HTTP.
pub fn from_transport(locale: Locale, cause: ErrorCause, url: &Url) -> ApiError {
    let timed_out = matches!(&cause, ErrorCause::Http(e) if e.is_timeout());
    let error = if timed_out {
        ApiError::new(
            ErrorKind::Timeout,
            TIMEOUT_STATUS,
            friendly_message(locale, Some(TIMEOUT_STATUS), None, true),
        )
    } else {
        ApiError::new(ErrorKind::Network, 0, friendly_message(locale, Some(0), None, false))
    };
    error.with_url(url.as_str()).with_cause(cause)
}

/// Normalize an attempt cancelled by its timeout.
pub fn from_timeout(locale: Locale, after: Duration, url: &Url) -> ApiError {
    ApiError::new(
        ErrorKind::Timeout,
        TIMEOUT_STATUS,
        friendly_message(locale, Some(TIMEOUT_STATUS), None, true),
    )
    .with_url(url.as_str())
    .with_cause(ErrorCause::TimedOut(after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("http://host/api/invoices/1").unwrap()
    }

    #[test]
    fn test_json_error_field_wins() {
        let err = from_status(
            Locale::Lithuanian,
            422,
            Some("application/json"),
            br#"{"error": "Neteisingi duomenys"}"#,
            &url(),
        );
        assert_eq!(err.message(), "Neteisingi duomenys");
        assert_eq!(err.status(), 422);
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.payload(), Some(&json!({"error": "Neteisingi duomenys"})));
        assert_eq!(err.url(), Some("http://host/api/invoices/1"));
    }

    #[test]
    fn test_json_message_field_used_when_no_error_field() {
        let err = from_status(
            Locale::Lithuanian,
            409,
            Some("application/json"),
            r#"{"message": "Sąskaita jau apmokėta"}"#.as_bytes(),
            &url(),
        );
        assert_eq!(err.message(), "Sąskaita jau apmokėta");
    }

    #[test]
    fn test_table_message_without_detail() {
        let err = from_status(Locale::Lithuanian, 404, Some("application/json"), b"{}", &url());
        assert_eq!(err.message(), "Prašomas įrašas nerastas.");
    }

    #[test]
    fn test_text_payload_is_detail() {
        let err = from_status(Locale::English, 502, Some("text/plain"), b"upstream down", &url());
        assert_eq!(err.message(), "upstream down");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.payload(), Some(&json!("upstream down")));
    }

    #[test]
    fn test_empty_5xx_collapses() {
        let err = from_status(Locale::Lithuanian, 503, None, b"", &url());
        assert_eq!(err.message(), "Serveris laikinai nepasiekiamas. Bandykite dar kartą.");
    }

    #[test]
    fn test_unparsable_json_payload_is_none() {
        assert!(extract_error_payload(Some("application/json"), b"<html>").is_none());
        let err = from_status(Locale::Lithuanian, 400, Some("application/json"), b"<html>", &url());
        assert_eq!(err.message(), "Neteisinga užklausa. Patikrinkite duomenis.");
    }

    #[test]
    fn test_transport_failure_is_network() {
        let err = from_transport(Locale::Lithuanian, ErrorCause::Other("refused".into()), &url());
        assert_eq!(err.status(), 0);
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(
            err.message(),
            "Nepavyko prisijungti prie serverio. Patikrinkite interneto ryšį."
        );
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_timeout() {
        let err = from_timeout(Locale::Lithuanian, Duration::from_millis(50), &url());
        assert_eq!(err.status(), 408);
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.message(), "Užklausa užtruko per ilgai. Bandykite dar kartą.");
        assert!(matches!(err.cause(), Some(ErrorCause::TimedOut(_))));
    }
}
