//! Response content formats.

use serde::{Deserialize, Serialize};

/// Output format of an error page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Json,
    Xml,
    Html,
    #[default]
    PlainText,
}

impl Format {
    /// `Content-Type` header value for this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json; charset=utf-8",
            Format::Xml => "application/xml; charset=utf-8",
            Format::Html => "text/html; charset=utf-8",
            Format::PlainText => "text/plain; charset=utf-8",
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Html => "html",
            Format::PlainText => "plain-text",
        }
    }

    /// Format hinted by a file extension such as `json` in `/404.json`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            "html" | "htm" => Some(Format::Html),
            "txt" | "text" => Some(Format::PlainText),
            _ => None,
        }
    }

    /// Format matching a media type such as `application/json` or a bare
    /// `json` as sent in `X-Format`. Wildcards match nothing.
    pub fn from_media_type(media: &str) -> Option<Self> {
        let media = media.trim().to_ascii_lowercase();
        let subtype = media.rsplit('/').next().unwrap_or(&media);
        // `application/problem+json`, `application/xhtml+xml` and friends
        let suffix = subtype.rsplit('+').next().unwrap_or(subtype);

        match (media.as_str(), suffix) {
            (_, "json") => Some(Format::Json),
            ("application/xhtml+xml", _) => Some(Format::Html),
            (_, "xml") => Some(Format::Xml),
            (_, "html") => Some(Format::Html),
            ("text/plain", _) | (_, "plain") => Some(Format::PlainText),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
