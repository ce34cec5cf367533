//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the error
//! pages server. All types derive Serde traits for deserialization from TOML,
//! and every field has a default so an empty document is a valid config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::http::Format;
use crate::observability::logging::LogFormat;
use crate::rotation::RotationMode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorPagesConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Code rendered when neither the URL nor the headers carry one.
    pub default_code: u16,

    /// Format used when the request does not ask for a known one.
    pub default_format: Format,

    /// Respond with the rendered code instead of `200 OK`.
    pub respond_with_same_http_code: bool,

    /// Templates for the non-HTML formats.
    pub formats: FormatsConfig,

    /// Named HTML templates.
    pub templates: Templates,

    /// HTML template used when rotation is disabled.
    pub template_name: String,

    /// How the HTML template changes over time.
    pub rotation_mode: RotationMode,

    /// Serve HTML exactly as rendered.
    pub disable_minification: bool,

    /// Per-code message and description overrides.
    pub codes: Codes,

    /// Request headers copied onto the response when present.
    pub proxy_headers: Vec<String>,

    /// Localization settings.
    pub l10n: L10nConfig,

    /// Expose host and request ID on error pages.
    pub show_details: bool,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ErrorPagesConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            default_code: 404,
            default_format: Format::PlainText,
            respond_with_same_http_code: false,
            formats: FormatsConfig::default(),
            templates: Templates::default(),
            template_name: defaults::DEFAULT_TEMPLATE_NAME.to_string(),
            rotation_mode: RotationMode::Disabled,
            disable_minification: false,
            codes: Codes::default(),
            proxy_headers: vec!["X-Request-Id".to_string()],
            l10n: L10nConfig::default(),
            show_details: false,
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Templates for JSON, XML and plain text responses. An unset format falls
/// through to plain text.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatsConfig {
    pub json: Option<String>,
    pub xml: Option<String>,
    pub plain_text: Option<String>,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            json: Some(defaults::JSON_FORMAT.to_string()),
            xml: Some(defaults::XML_FORMAT.to_string()),
            plain_text: Some(defaults::PLAIN_TEXT_FORMAT.to_string()),
        }
    }
}

/// Named HTML templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Templates(BTreeMap<String, String>);

impl Templates {
    /// Template source by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// A uniformly random template name, `None` for an empty set.
    pub fn random_name(&self) -> Option<&str> {
        if self.0.is_empty() {
            return None;
        }
        self.names().nth(fastrand::usize(..self.0.len()))
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.0.insert(name.into(), source.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Templates {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert("ghost".to_string(), defaults::GHOST_TEMPLATE.to_string());
        templates.insert("terminal".to_string(), defaults::TERMINAL_TEMPLATE.to_string());
        Self(templates)
    }
}

impl From<BTreeMap<String, String>> for Templates {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Message and description for a status code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodeDescription {
    pub message: String,
    #[serde(default)]
    pub description: String,
}

/// Code overrides keyed by code (`"404"`) or pattern (`"4**"`, `"50*"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Codes(BTreeMap<String, CodeDescription>);

impl Codes {
    /// Description for `code`. An exact key wins; among patterns the one
    /// with the fewest wildcards wins.
    pub fn find(&self, code: u16) -> Option<&CodeDescription> {
        let code = code.to_string();

        if let Some(exact) = self.0.get(&code) {
            return Some(exact);
        }

        self.0
            .iter()
            .filter(|(pattern, _)| pattern_matches(pattern, &code))
            .min_by_key(|(pattern, _)| pattern.matches('*').count())
            .map(|(_, desc)| desc)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, desc: CodeDescription) {
        self.0.insert(key.into(), desc);
    }
}

fn pattern_matches(pattern: &str, code: &str) -> bool {
    pattern.len() == code.len()
        && pattern
            .chars()
            .zip(code.chars())
            .all(|(p, c)| p == '*' || p == c)
}

impl Default for Codes {
    fn default() -> Self {
        Self(
            defaults::CODES
                .iter()
                .map(|(code, message, description)| {
                    (
                        code.to_string(),
                        CodeDescription {
                            message: message.to_string(),
                            description: description.to_string(),
                        },
                    )
                })
                .collect(),
        )
    }
}

/// Localization settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct L10nConfig {
    /// Tell templates not to localize their text.
    pub disable: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ErrorPagesConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_code, 404);
        assert_eq!(config.default_format, Format::PlainText);
        assert_eq!(config.rotation_mode, RotationMode::Disabled);
        assert!(config.templates.get(&config.template_name).is_some());
        assert!(config.formats.json.is_some());
        assert_eq!(config.proxy_headers, vec!["X-Request-Id".to_string()]);
    }

    #[test]
    fn test_parse_full_document() {
        let config: ErrorPagesConfig = toml::from_str(
            r#"
            default_code = 500
            default_format = "html"
            respond_with_same_http_code = true
            template_name = "plain"
            rotation_mode = "random-hourly"
            show_details = true
            proxy_headers = ["X-Trace-Id"]

            [listener]
            bind_address = "127.0.0.1:9000"

            [formats]
            json = '{"code": {{ code }}}'

            [templates]
            plain = "<p>{{ message }}</p>"

            [codes.404]
            message = "Not Found Here"
            description = "oops"

            [codes."5**"]
            message = "Server trouble"

            [l10n]
            disable = true
            "#,
        )
        .unwrap();

        assert_eq!(config.default_code, 500);
        assert_eq!(config.default_format, Format::Html);
        assert!(config.respond_with_same_http_code);
        assert_eq!(config.rotation_mode, RotationMode::RandomHourly);
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.templates.get("plain"), Some("<p>{{ message }}</p>"));
        assert_eq!(config.formats.json.as_deref(), Some(r#"{"code": {{ code }}}"#));
        // Fields missing from a table keep their defaults
        assert!(config.formats.xml.is_some());
        assert_eq!(config.codes.find(404).unwrap().message, "Not Found Here");
        assert_eq!(config.codes.find(503).unwrap().message, "Server trouble");
        assert!(config.codes.find(418).is_none());
        assert!(config.l10n.disable);
    }

    #[test]
    fn test_code_patterns() {
        let mut codes = Codes(BTreeMap::new());
        let desc = |m: &str| CodeDescription {
            message: m.to_string(),
            description: String::new(),
        };
        codes.insert("4**", desc("client"));
        codes.insert("40*", desc("forty"));
        codes.insert("404", desc("exact"));

        assert_eq!(codes.find(404).unwrap().message, "exact");
        assert_eq!(codes.find(401).unwrap().message, "forty");
        assert_eq!(codes.find(451).unwrap().message, "client");
        assert!(codes.find(500).is_none());
    }

    #[test]
    fn test_random_name_covers_set() {
        let templates = Templates::default();
        for _ in 0..100 {
            let name = templates.random_name().unwrap();
            assert!(templates.get(name).is_some());
        }
        assert!(Templates::from(BTreeMap::new()).random_name().is_none());
    }
}
