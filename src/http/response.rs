//! Response headers and fallback bodies.
//!
//! # Responsibilities
//! - Set the per-format `Content-Type`
//! - Keep error pages out of search indexes (`X-Robots-Tag`)
//! - Ask crawlers to come back later for transient codes (`Retry-After`)
//! - Copy configured headers from the request onto the response
//! - Build the bodies served when a template is missing or fails to render

use axum::http::header::{CONTENT_TYPE, RETRY_AFTER};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::http::Format;

pub const X_ROBOTS_TAG: &str = "x-robots-tag";

/// Seconds announced in `Retry-After`.
pub const RETRY_AFTER_SECS: u32 = 120;

/// Body served when no template exists for the wanted format.
pub const UNSUPPORTED_FORMAT_BODY: &str = "The requested content format is not supported.
Please create an issue on the project's GitHub page to request support for this format.

Supported formats: JSON, XML, HTML, Plain Text
";

/// Codes after which a client may usefully retry.
pub fn is_retryable(code: u16) -> bool {
    matches!(code, 408 | 425 | 429 | 500 | 502 | 503 | 504)
}

/// Fill in the response headers of an error page.
pub fn apply_headers(
    response: &mut HeaderMap,
    request: &HeaderMap,
    format: Format,
    code: u16,
    proxy_headers: &[String],
) {
    response.insert(CONTENT_TYPE, HeaderValue::from_static(format.content_type()));
    response.insert(X_ROBOTS_TAG, HeaderValue::from_static("noindex"));

    if is_retryable(code) {
        response.insert(RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
    }

    for name in proxy_headers {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            continue;
        };
        if let Some(value) = request.get(&name).filter(|v| !v.is_empty()) {
            response.insert(name, value.clone());
        }
    }
}

/// Diagnostic body for a template that failed to render.
///
/// `template_name` names the HTML template in use and is ignored for the
/// other formats.
pub fn render_failure_body(format: Format, template_name: &str, error: &str) -> String {
    match format {
        Format::Json => {
            let message = format!("Failed to render the JSON template: {}", error);
            serde_json::to_string(&message).unwrap_or_else(|_| String::from("\"\""))
        }
        Format::Xml => format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<error>Failed to render the XML template: {}</error>\n",
            error
        ),
        Format::Html => format!(
            "<!DOCTYPE html>\n<html><body>Failed to render the HTML template {}: {}</body></html>\n",
            template_name, error
        ),
        Format::PlainText => format!("Failed to render the PlainText template: {}", error),
    }
}

/// HTML body for a template name missing from the template set.
pub fn template_not_found_body(template_name: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><body>Template {} not found and cannot be used</body></html>\n",
        template_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_headers() {
        let mut response = HeaderMap::new();
        apply_headers(&mut response, &HeaderMap::new(), Format::Json, 404, &[]);

        assert_eq!(response[CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(response[X_ROBOTS_TAG], "noindex");
        assert!(response.get(RETRY_AFTER).is_none());
    }

    #[test]
    fn test_retry_after() {
        for code in [408, 425, 429, 500, 502, 503, 504] {
            let mut response = HeaderMap::new();
            apply_headers(&mut response, &HeaderMap::new(), Format::Html, code, &[]);
            assert_eq!(response[RETRY_AFTER], "120", "code {}", code);
        }
        assert!(!is_retryable(404));
        assert!(!is_retryable(501));
    }

    #[test]
    fn test_proxy_headers() {
        let mut request = HeaderMap::new();
        request.insert("x-request-id", HeaderValue::from_static("abc123"));
        request.insert("x-empty", HeaderValue::from_static(""));

        let proxied = vec![
            "X-Request-Id".to_string(),
            "X-Empty".to_string(),
            "X-Absent".to_string(),
        ];
        let mut response = HeaderMap::new();
        apply_headers(&mut response, &request, Format::PlainText, 404, &proxied);

        assert_eq!(response["x-request-id"], "abc123");
        assert!(response.get("x-empty").is_none());
        assert!(response.get("x-absent").is_none());
    }

    #[test]
    fn test_render_failure_bodies() {
        let json = render_failure_body(Format::Json, "ghost", "bad \"token\"");
        assert_eq!(json, r#""Failed to render the JSON template: bad \"token\"""#);

        let xml = render_failure_body(Format::Xml, "ghost", "boom");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<error>"));
        assert!(xml.contains("Failed to render the XML template: boom"));

        let html = render_failure_body(Format::Html, "ghost", "boom");
        assert!(html.contains("Failed to render the HTML template ghost: boom"));

        assert_eq!(
            render_failure_body(Format::PlainText, "ghost", "boom"),
            "Failed to render the PlainText template: boom"
        );
    }

    #[test]
    fn test_template_not_found_body() {
        assert!(template_not_found_body("nope").contains("Template nope not found and cannot be used"));
    }
}
