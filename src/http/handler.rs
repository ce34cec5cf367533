//! The error page dispatcher.
//!
//! # Data Flow
//! ```text
//! request
//!     → request.rs (status code + format)
//!     → RenderProperties (code overrides, request details)
//!     → template resolution (rotation for HTML)
//!     → RenderedCache hit ──────────────┐
//!     → miss: render → minify → put ────┤
//!     → response.rs (headers) ◀─────────┘
//! ```

use std::time::Instant;

use axum::extract::State;
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::config::ErrorPagesConfig;
use crate::http::request::{extract_signals, generate_request_id, RequestSignals};
use crate::http::response::{
    apply_headers, render_failure_body, template_not_found_body, UNSUPPORTED_FORMAT_BODY,
};
use crate::http::server::AppState;
use crate::http::Format;
use crate::observability::metrics;
use crate::render::RenderProperties;

/// Message for codes with neither an override nor a standard reason phrase.
pub const UNKNOWN_STATUS_MESSAGE: &str = "Unknown Status Code";

/// Serve an error page for any request.
pub async fn error_page(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let config = state.config.load_full();

    let RequestSignals { code, format } =
        extract_signals(uri.path(), &headers, config.default_code, config.default_format);

    let status = response_status(code, config.respond_with_same_http_code);

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())
        .unwrap_or_default();
    let props = build_properties(&config, code, host, &headers, &state.site_code);

    let body = render_body(&state, &config, format, &props);

    let mut response = (status, body).into_response();
    apply_headers(response.headers_mut(), &headers, format, code, &config.proxy_headers);

    tracing::debug!(code, format = format.as_str(), status = status.as_u16(), "Served error page");
    metrics::record_request(format.as_str(), code, start);

    response
}

/// Status line for a page rendered for `code`.
///
/// 1xx codes cannot end an HTTP exchange, so they are served as `200 OK`.
pub fn response_status(code: u16, same_code: bool) -> StatusCode {
    match StatusCode::from_u16(code) {
        Ok(status) if same_code && !status.is_informational() => status,
        _ => StatusCode::OK,
    }
}

/// Assemble the template properties for `code`.
///
/// Host and request ID are only filled in when the configuration asks for
/// request details.
pub fn build_properties(
    config: &ErrorPagesConfig,
    code: u16,
    host: &str,
    headers: &HeaderMap,
    site_code: &str,
) -> RenderProperties {
    let mut props = match config.codes.find(code) {
        Some(desc) => RenderProperties::new(code, &desc.message, &desc.description),
        None => {
            let reason = StatusCode::from_u16(code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or(UNKNOWN_STATUS_MESSAGE);
            RenderProperties::new(code, reason, "")
        }
    };

    props.show_request_details = config.show_details;
    props.l10n_disabled = config.l10n.disable;

    if config.show_details {
        props.host = Some(host.to_string());
        props.request_id = Some(generate_request_id(headers, site_code));
    }

    props
}

fn render_body(
    state: &AppState,
    config: &ErrorPagesConfig,
    format: Format,
    props: &RenderProperties,
) -> Bytes {
    match format {
        Format::Json | Format::Xml => {
            let source = match format {
                Format::Json => configured(&config.formats.json),
                _ => configured(&config.formats.xml),
            };
            match source {
                Some(source) => render_cached(state, format, "", source, props, false),
                None => plain_text_body(state, config, props),
            }
        }
        Format::Html => {
            let name = state
                .rotator
                .pick(config.rotation_mode, &config.template_name, &config.templates);

            match config.templates.get(&name) {
                Some(source) => {
                    render_cached(state, Format::Html, &name, source, props, !config.disable_minification)
                }
                None => {
                    tracing::warn!(template = %name, "HTML template not found");
                    Bytes::from(template_not_found_body(&name))
                }
            }
        }
        Format::PlainText => plain_text_body(state, config, props),
    }
}

fn plain_text_body(state: &AppState, config: &ErrorPagesConfig, props: &RenderProperties) -> Bytes {
    match configured(&config.formats.plain_text) {
        Some(source) => render_cached(state, Format::PlainText, "", source, props, false),
        None => Bytes::from_static(UNSUPPORTED_FORMAT_BODY.as_bytes()),
    }
}

/// Empty templates count as unset.
fn configured(template: &Option<String>) -> Option<&str> {
    template.as_deref().filter(|t| !t.is_empty())
}

fn render_cached(
    state: &AppState,
    format: Format,
    name: &str,
    source: &str,
    props: &RenderProperties,
    minify: bool,
) -> Bytes {
    if let Some(cached) = state.cache.get(source, props) {
        metrics::record_cache_lookup(true);
        return cached;
    }
    metrics::record_cache_lookup(false);

    let mut content = match state.renderer.render(source, props) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(format = format.as_str(), template = name, error = %e, "Failed to render error page");
            metrics::record_render_failure(format.as_str());
            return Bytes::from(render_failure_body(format, name, &e.to_string()));
        }
    };

    if minify {
        match state.renderer.minify_html(&content) {
            Ok(minified) => content = minified,
            Err(e) => tracing::warn!(template = name, error = %e, "HTML minification failed"),
        }
    }

    let content = Bytes::from(content);
    state.cache.put(source, props, content.clone());
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_response_status() {
        assert_eq!(response_status(404, true), StatusCode::NOT_FOUND);
        assert_eq!(response_status(404, false), StatusCode::OK);
        assert_eq!(response_status(999, true).as_u16(), 999);
        assert_eq!(response_status(100, true), StatusCode::OK);
        assert_eq!(response_status(199, true), StatusCode::OK);
    }

    #[test]
    fn test_properties_from_override() {
        let config = ErrorPagesConfig::default();
        let props = build_properties(&config, 404, "example.com", &HeaderMap::new(), "CYK2");

        assert_eq!(props.code, 404);
        assert_eq!(props.message, "Not Found");
        assert_eq!(props.description, "The server can not find the requested page");
        assert!(props.host.is_none());
        assert!(props.request_id.is_none());
    }

    #[test]
    fn test_properties_fall_back_to_reason_phrase() {
        let config = ErrorPagesConfig::default();

        let props = build_properties(&config, 451, "", &HeaderMap::new(), "CYK2");
        assert_eq!(props.message, "Unavailable For Legal Reasons");
        assert_eq!(props.description, "");

        let props = build_properties(&config, 599, "", &HeaderMap::new(), "CYK2");
        assert_eq!(props.message, UNKNOWN_STATUS_MESSAGE);
    }

    #[test]
    fn test_properties_with_details() {
        let mut config = ErrorPagesConfig::default();
        config.show_details = true;
        config.l10n.disable = true;

        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc123"));

        let props = build_properties(&config, 500, "example.com", &headers, "CYK2");
        assert!(props.show_request_details);
        assert!(props.l10n_disabled);
        assert_eq!(props.host.as_deref(), Some("example.com"));
        assert_eq!(props.request_id.as_deref(), Some("CYK2-abc123"));
    }

    #[test]
    fn test_empty_template_is_unset() {
        assert_eq!(configured(&None), None);
        assert_eq!(configured(&Some(String::new())), None);
        assert_eq!(configured(&Some("x".into())), Some("x"));
    }
}
