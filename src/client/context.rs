//! Request context construction.
//!
//! Turns an endpoint plus [`RequestOptions`] into a [`RequestContext`]:
//!
//! 1. Resolve the endpoint against the base URL and append query parameters
//! 2. Start from `Accept: application/json, text/plain, */*` and merge caller headers
//! 3. Attach the body; JSON bodies get `Content-Type: application/json`
//! 4. Add `Authorization: Bearer <token>` unless the call skips auth

use crate::error::{ApiError, ErrorCause, Result};
use crate::protocol::constants::{headers, media_types};
use crate::protocol::{format_bearer, messages, Locale};
use crate::types::{QueryParams, RequestContext, RequestOptions};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Call-independent inputs for building a context.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ContextDefaults<'a> {
    pub base: &'a Url,
    pub token: Option<&'a str>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub locale: Locale,
}

/// Parse and normalize a base URL.
///
/// Trailing slashes are trimmed and exactly one is added back, so relative endpoints join
/// below the base path instead of replacing its last segment.
pub(crate) fn parse_base_url(base: &str, locale: Locale) -> Result<Url> {
    let trimmed = base.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}/", trimmed)).map_err(|e| {
        ApiError::configuration(messages::invalid_request(locale, base), ErrorCause::Url(e))
            .with_url(base)
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::configuration(
            messages::invalid_request(locale, base),
            ErrorCause::Other(format!("unsupported scheme '{}'", url.scheme())),
        )
        .with_url(base));
    }
    Ok(url)
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

/// Resolve `endpoint` against `base` and append `params`.
///
/// `base` must come from [`parse_base_url`]. Absolute `http`/`https` endpoints ignore it.
pub(crate) fn build_target_url(
    base: &Url,
    endpoint: &str,
    params: &QueryParams,
    locale: Locale,
) -> Result<Url> {
    let resolved = if is_absolute(endpoint) {
        Url::parse(endpoint)
    } else {
        let normalized = endpoint.strip_prefix('/').unwrap_or(endpoint);
        base.join(normalized)
    };

    let mut url = resolved.map_err(|e| {
        ApiError::configuration(messages::invalid_request(locale, endpoint), ErrorCause::Url(e))
            .with_url(endpoint)
    })?;

    params.append_to(&mut url);
    Ok(url)
}

/// Build the context for one call.
pub(crate) fn build_context(
    endpoint: &str,
    options: RequestOptions,
    defaults: ContextDefaults<'_>,
) -> Result<RequestContext> {
    let target_url = build_target_url(defaults.base, endpoint, &options.params, defaults.locale)?;

    let mut context = RequestContext {
        target_url,
        method: options.method,
        headers: BTreeMap::new(),
        body: None,
        timeout: options.timeout.unwrap_or(defaults.timeout),
        max_retries: options.retry.unwrap_or(defaults.max_retries),
        parse_mode: options.parse_as,
        skip_auth: options.skip_auth,
    };

    context.set_header(headers::ACCEPT, media_types::ACCEPT_DEFAULT);
    for (name, value) in options.headers {
        context.set_header(&name, value);
    }

    context.set_body(options.body);

    if let Some(token) = defaults.token {
        if !context.skip_auth {
            context.set_header(headers::AUTHORIZATION, format_bearer(token));
        }
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MultipartForm, ParamValue, RequestBody};
    use crate::ErrorKind;
    use serde_json::json;

    fn base() -> Url {
        parse_base_url("http://host/api", Locale::Lithuanian).unwrap()
    }

    fn defaults<'a>(base: &'a Url, token: Option<&'a str>) -> ContextDefaults<'a> {
        ContextDefaults {
            base,
            token,
            timeout: Duration::from_millis(15_000),
            max_retries: 2,
            locale: Locale::Lithuanian,
        }
    }

    #[test]
    fn test_relative_endpoint_keeps_base_path() {
        let base = base();
        let params = QueryParams::from([("search", "acme")]);
        let url = build_target_url(&base, "/clients/", &params, Locale::Lithuanian).unwrap();
        assert_eq!(url.as_str(), "http://host/api/clients/?search=acme");
    }

    #[test]
    fn test_endpoint_without_leading_slash() {
        let base = base();
        let url = build_target_url(&base, "invoices/3", &QueryParams::new(), Locale::Lithuanian)
            .unwrap();
        assert_eq!(url.as_str(), "http://host/api/invoices/3");
    }

    #[test]
    fn test_trailing_slashes_on_base_are_trimmed() {
        let base = parse_base_url("http://host/api///", Locale::Lithuanian).unwrap();
        assert_eq!(base.as_str(), "http://host/api/");
    }

    #[test]
    fn test_absolute_endpoint_ignores_base() {
        let base = base();
        let url = build_target_url(
            &base,
            "https://files.example.com/x?y=1",
            &QueryParams::from([("z", 2)]),
            Locale::Lithuanian,
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://files.example.com/x?y=1&z=2");
    }

    #[test]
    fn test_null_empty_and_list_params() {
        let base = base();
        let params = QueryParams::new()
            .with("a", ParamValue::Null)
            .with("b", vec!["x", "y"])
            .with("c", "");
        let url = build_target_url(&base, "/items", &params, Locale::Lithuanian).unwrap();
        assert_eq!(url.as_str(), "http://host/api/items?b=x&b=y");
    }

    #[test]
    fn test_malformed_endpoint_is_configuration_error() {
        let base = base();
        let err = build_target_url(&base, "http://bad host/x", &QueryParams::new(), Locale::Lithuanian)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn test_malformed_base_is_configuration_error() {
        assert!(parse_base_url("not a url", Locale::Lithuanian).is_err());
        let err = parse_base_url("ftp://host/api", Locale::English).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_default_accept_and_overrides() {
        let base = base();
        let ctx = build_context("/x", RequestOptions::new(), defaults(&base, None)).unwrap();
        assert_eq!(ctx.header("accept"), Some("application/json, text/plain, */*"));
        assert!(ctx.header("authorization").is_none());

        let ctx = build_context(
            "/x",
            RequestOptions::new().header("Accept", "application/pdf").header("X-Extra", "1"),
            defaults(&base, None),
        )
        .unwrap();
        assert_eq!(ctx.header("accept"), Some("application/pdf"));
        assert_eq!(ctx.header("x-extra"), Some("1"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let base = base();
        let ctx = build_context(
            "/clients/",
            RequestOptions::new().body(json!({"name": "UAB Medis"})),
            defaults(&base, None),
        )
        .unwrap();
        assert_eq!(ctx.header("content-type"), Some("application/json"));
        assert_eq!(ctx.body, Some(RequestBody::Json(json!({"name": "UAB Medis"}))));
    }

    #[test]
    fn test_multipart_body_has_no_content_type() {
        let base = base();
        let form = MultipartForm::new().text("a", "b");
        let ctx = build_context("/upload", RequestOptions::new().body(form), defaults(&base, None))
            .unwrap();
        assert!(ctx.header("content-type").is_none());
        assert!(matches!(ctx.body, Some(RequestBody::Multipart(_))));
    }

    #[test]
    fn test_auth_injection_and_skip() {
        let base = base();
        let ctx = build_context("/x", RequestOptions::new(), defaults(&base, Some("t0k"))).unwrap();
        assert_eq!(ctx.header("authorization"), Some("Bearer t0k"));

        let ctx = build_context("/x", RequestOptions::new().skip_auth(), defaults(&base, Some("t0k")))
            .unwrap();
        assert!(ctx.header("authorization").is_none());
    }

    #[test]
    fn test_option_defaults_and_overrides() {
        let base = base();
        let ctx = build_context("/x", RequestOptions::new(), defaults(&base, None)).unwrap();
        assert_eq!(ctx.timeout, Duration::from_millis(15_000));
        assert_eq!(ctx.max_retries, 2);
        assert_eq!(ctx.method, http::Method::GET);

        let ctx = build_context(
            "/x",
            RequestOptions::new().retry(0).timeout(Duration::from_secs(1)),
            defaults(&base, None),
        )
        .unwrap();
        assert_eq!(ctx.max_retries, 0);
        assert_eq!(ctx.timeout, Duration::from_secs(1));
    }
}
