//! Network-verified facts supplied by the caller
//!
//! The core never performs I/O. Whoever fetches the og:image, robots.txt,
//! llms.txt or the Last-Modified header hands the outcome over as one of these
//! plain values. A failed fetch is an explicit "inaccessible" fact with an
//! error string, never an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What the og:image URL actually serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFormatFact {
    #[serde(rename = "isWebP")]
    pub is_webp: bool,
    pub is_valid_format: bool,
    pub format: String,
    pub accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageFormatFact {
    /// Classify from a Content-Type header, falling back to magic bytes
    pub fn classify(content_type: Option<&str>, head_bytes: &[u8]) -> Self {
        let format = content_type
            .and_then(format_from_content_type)
            .or_else(|| format_from_magic(head_bytes))
            .unwrap_or("unknown");

        Self {
            is_webp: format == "webp",
            // Link-preview crawlers reliably render these
            is_valid_format: matches!(format, "jpeg" | "png" | "gif"),
            format: format.to_string(),
            accessible: true,
            error: None,
        }
    }

    pub fn inaccessible(error: impl Into<String>) -> Self {
        Self {
            is_webp: false,
            is_valid_format: false,
            format: "unknown".to_string(),
            accessible: false,
            error: Some(error.into()),
        }
    }
}

fn format_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpeg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

fn format_from_magic(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'a', b'v', b'i', b'f', ..] => Some("avif"),
        _ => None,
    }
}

fn default_true() -> bool {
    true
}

/// Result of fetching and parsing robots.txt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsFact {
    /// False when the fetch failed (network error, CORS, timeout)
    pub accessible: bool,
    /// False when the server answered but there is no robots.txt
    #[serde(default = "default_true")]
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub blocked_crawlers: Vec<String>,
    #[serde(default)]
    pub allowed_crawlers: Vec<String>,
}

impl RobotsFact {
    pub fn inaccessible(error: impl Into<String>) -> Self {
        Self {
            accessible: false,
            exists: false,
            error: Some(error.into()),
            blocked_crawlers: Vec::new(),
            allowed_crawlers: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            accessible: true,
            exists: false,
            error: None,
            blocked_crawlers: Vec::new(),
            allowed_crawlers: Vec::new(),
        }
    }
}

/// Presence of one llms file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmsFileFact {
    pub found: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmsTxtFact {
    pub found: bool,
    #[serde(default)]
    pub llms_txt: LlmsFileFact,
    #[serde(default)]
    pub llms_full_txt: LlmsFileFact,
}

impl LlmsTxtFact {
    pub fn new(llms_txt: LlmsFileFact, llms_full_txt: LlmsFileFact) -> Self {
        Self {
            found: llms_txt.found || llms_full_txt.found,
            llms_txt,
            llms_full_txt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastModifiedFact {
    pub accessible: bool,
    /// ISO 8601 or HTTP-date as received
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything fetched outside the core for one page; `None` means unverified
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFacts {
    #[serde(default)]
    pub image_format: Option<ImageFormatFact>,
    #[serde(default)]
    pub robots: Option<RobotsFact>,
    #[serde(default)]
    pub llms_txt: Option<LlmsTxtFact>,
    #[serde(default)]
    pub last_modified: Option<LastModifiedFact>,
}

impl NetworkFacts {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(CoreError::from)
            .context("failed to parse network facts JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_content_type() {
        let fact = ImageFormatFact::classify(Some("image/webp"), &[]);
        assert!(fact.is_webp);
        assert!(!fact.is_valid_format);

        let fact = ImageFormatFact::classify(Some("image/jpeg; charset=binary"), &[]);
        assert_eq!(fact.format, "jpeg");
        assert!(fact.is_valid_format);
    }

    #[test]
    fn test_classify_by_magic_bytes() {
        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        let fact = ImageFormatFact::classify(Some("application/octet-stream"), webp);
        assert!(fact.is_webp);

        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A];
        assert_eq!(ImageFormatFact::classify(None, &png).format, "png");
        assert_eq!(ImageFormatFact::classify(None, b"hello").format, "unknown");
    }

    #[test]
    fn test_facts_json_uses_external_field_names() {
        let facts = NetworkFacts::from_json(
            r#"{
                "imageFormat": {"isWebP": true, "isValidFormat": false, "format": "webp", "accessible": true},
                "robots": {"accessible": true, "blockedCrawlers": ["GPTBot"], "allowedCrawlers": ["ClaudeBot"]},
                "llmsTxt": {"found": true, "llmsTxt": {"found": true, "url": "https://x/llms.txt", "size": 120},
                            "llmsFullTxt": {"found": false, "url": "https://x/llms-full.txt"}},
                "lastModified": {"accessible": true, "lastModified": "2024-05-01T00:00:00Z"}
            }"#,
        )
        .unwrap();

        assert!(facts.image_format.unwrap().is_webp);
        let robots = facts.robots.unwrap();
        assert!(robots.exists);
        assert_eq!(robots.blocked_crawlers, vec!["GPTBot"]);
        assert_eq!(facts.llms_txt.unwrap().llms_txt.size, Some(120));
    }

    #[test]
    fn test_facts_json_rejects_garbage() {
        let err = NetworkFacts::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("network facts"));
    }
}
