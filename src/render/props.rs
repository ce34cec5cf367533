//! Template properties.

use serde::{Serialize, Serializer};

/// Everything that affects the rendered output of one error page.
///
/// Doubles as part of the rendered-output cache key, so every field takes part
/// in equality and hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RenderProperties {
    /// HTTP status code.
    pub code: u16,
    /// Status message.
    pub message: String,
    /// Status description.
    pub description: String,
    /// Unique request ID, only set when request details are shown.
    #[serde(serialize_with = "empty_if_none")]
    pub request_id: Option<String>,
    /// Value of the `Host` header, only set when request details are shown.
    #[serde(serialize_with = "empty_if_none")]
    pub host: Option<String>,
    /// Show request details?
    #[serde(rename = "show_details")]
    pub show_request_details: bool,
    /// Localization disabled?
    pub l10n_disabled: bool,
}

impl RenderProperties {
    /// Properties for a status code with no request details attached.
    pub fn new(code: u16, message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

// Templates see a missing value as an empty string rather than `none`.
fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(p: &RenderProperties) -> u64 {
        let mut h = DefaultHasher::new();
        p.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_serialized_tokens() {
        let props = RenderProperties {
            code: 1,
            message: "b".into(),
            description: "c".into(),
            request_id: Some("d".into()),
            host: Some("e".into()),
            show_request_details: false,
            l10n_disabled: true,
        };

        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            serde_json::json!({
                "code": 1,
                "message": "b",
                "description": "c",
                "request_id": "d",
                "host": "e",
                "show_details": false,
                "l10n_disabled": true,
            })
        );
    }

    #[test]
    fn test_missing_details_serialize_as_empty() {
        let value = serde_json::to_value(RenderProperties::new(500, "m", "d")).unwrap();
        assert_eq!(value["request_id"], "");
        assert_eq!(value["host"], "");
    }

    #[test]
    fn test_equality_covers_every_field() {
        let base = RenderProperties::new(404, "Not Found", "gone");
        assert_eq!(base, base.clone());
        assert_eq!(hash_of(&base), hash_of(&base.clone()));

        let mut other = base.clone();
        other.l10n_disabled = true;
        assert_ne!(base, other);

        let mut other = base.clone();
        other.request_id = Some("x".into());
        assert_ne!(base, other);
    }
}
