//! Request signal extraction and request IDs.
//!
//! # Responsibilities
//! - Derive the status code to render (URL → `X-Code` header → default)
//! - Derive the response format (URL extension → `X-Format` → `Accept` →
//!   `Content-Type` → default)
//! - Build the request identifier shown on detailed error pages
//!
//! # Design Decisions
//! - Pure functions over the path and header map, no request body access
//! - Malformed input falls back to the configured defaults, never an error

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::{Builder, Uuid};

use crate::http::Format;

/// Header carrying the status code (set by ingress controllers).
pub const X_CODE: &str = "x-code";

/// Header carrying the wanted response format.
pub const X_FORMAT: &str = "x-format";

/// Upstream request ID headers, in lookup order.
pub const UPSTREAM_REQUEST_ID: [&str; 2] = ["x-request-id", "x-requestid"];

/// Environment variable holding the site code prefixed to request IDs.
pub const SITE_CODE_ENV: &str = "DATA_CENTRE_CODE";

/// Site code used when the environment does not provide one.
pub const DEFAULT_SITE_CODE: &str = "CYK2";

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSignals {
    pub code: u16,
    pub format: Format,
}

/// Derive the status code and format for a request.
pub fn extract_signals(
    path: &str,
    headers: &HeaderMap,
    default_code: u16,
    default_format: Format,
) -> RequestSignals {
    let code = code_from_path(path)
        .or_else(|| code_from_headers(headers))
        .unwrap_or(default_code);

    let format = format_from_path(path)
        .or_else(|| format_from_headers(headers))
        .unwrap_or(default_format);

    RequestSignals { code, format }
}

/// Status code embedded in the first path segment (`/404`, `/503.html`).
pub fn code_from_path(path: &str) -> Option<u16> {
    let (stem, _) = first_segment(path);
    parse_code(stem)
}

/// Status code from the `X-Code` header.
pub fn code_from_headers(headers: &HeaderMap) -> Option<u16> {
    headers
        .get(X_CODE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_code(v.trim()))
}

/// Format hinted by the extension of the first path segment.
pub fn format_from_path(path: &str) -> Option<Format> {
    first_segment(path).1.and_then(Format::from_extension)
}

/// Format preferred by the client headers.
pub fn format_from_headers(headers: &HeaderMap) -> Option<Format> {
    [X_FORMAT, "accept", "content-type"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .find_map(preferred_format)
}

/// Highest-weighted recognized format in a media range list such as
/// `text/html;q=0.9, application/json`. Ties keep list order.
pub fn preferred_format(value: &str) -> Option<Format> {
    let mut candidates: Vec<(f32, usize, Format)> = value
        .split(',')
        .enumerate()
        .filter_map(|(position, part)| {
            let mut params = part.split(';');
            let format = Format::from_media_type(params.next()?)?;
            let weight = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            (weight > 0.0).then_some((weight, position, format))
        })
        .collect();

    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    candidates.first().map(|(_, _, format)| *format)
}

fn first_segment(path: &str) -> (&str, Option<&str>) {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or_default();

    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (segment, None),
    }
}

fn parse_code(value: &str) -> Option<u16> {
    value
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=999).contains(code))
}

/// Site code from the environment, or the default.
pub fn site_code_from_env() -> String {
    std::env::var(SITE_CODE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SITE_CODE.to_string())
}

/// Build the request ID for an error page.
///
/// An upstream ID is kept as `{site}-{upstream}`. Otherwise the ID is
/// `{site}-{5 random bytes as hex}-{UUIDv7 without dashes}`.
pub fn generate_request_id(headers: &HeaderMap, site_code: &str) -> String {
    let upstream = UPSTREAM_REQUEST_ID
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .find(|v| !v.is_empty());

    if let Some(id) = upstream {
        return format!("{}-{}", site_code, id);
    }

    let mut random = [0u8; 5];
    if OsRng.try_fill_bytes(&mut random).is_err() {
        random = [0u8; 5];
    }
    let random_hex: String = random.iter().map(|b| format!("{:02x}", b)).collect();

    format!("{}-{}-{}", site_code, random_hex, time_ordered_uuid().simple())
}

/// UUIDv7, or a v4 when the clock sits before the UNIX epoch.
fn time_ordered_uuid() -> Uuid {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => {
            let mut tail = [0u8; 10];
            rand::thread_rng().fill_bytes(&mut tail);
            Builder::from_unix_timestamp_millis(elapsed.as_millis() as u64, &tail).into_uuid()
        }
        Err(_) => Uuid::new_v4(),
    }
}
