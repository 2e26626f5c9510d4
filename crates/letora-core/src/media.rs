// ── Media ingestion and normalization ──
//
// Backend image/document fields arrive in several shapes: bare URL
// strings, objects carrying one of several URL-ish keys, or inline
// `data:` payloads. Everything is resolved once, at ingestion, into a
// tagged `MediaSource`; downstream code never shape-sniffs again.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use letora_api::UploadFile;

/// Substituted when a listing ends up with no displayable image.
/// Display code never renders an empty image list.
pub const PLACEHOLDER_IMAGE: &str = "/images/apartment-dashboard.png";

/// Object keys probed during ingestion, in precedence order.
const URL_KEYS: [&str; 4] = ["url", "data", "secure_url", "imageUrl"];

/// A single media reference, resolved to exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum MediaSource {
    /// A remote or app-relative URL.
    Url(String),
    /// An inline `data:` URI, payload still encoded.
    DataUri(String),
    /// An already-decoded file, ready for multipart upload.
    File(UploadFile),
}

impl MediaSource {
    /// Resolve a raw JSON entry into a `MediaSource`.
    ///
    /// Strings become [`Url`](Self::Url) (or [`DataUri`](Self::DataUri)
    /// for `data:` payloads). Objects are probed for the first
    /// non-empty string among `url`, `data`, `secure_url`, `imageUrl`,
    /// in that order. Anything else is dropped.
    pub fn ingest(entry: &Value) -> Option<Self> {
        match entry {
            Value::String(s) if !s.is_empty() => Some(Self::from_str_value(s)),
            Value::Object(map) => URL_KEYS.iter().find_map(|key| {
                map.get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(Self::from_str_value)
            }),
            _ => None,
        }
    }

    fn from_str_value(s: &str) -> Self {
        if s.starts_with("data:") {
            Self::DataUri(s.to_owned())
        } else {
            Self::Url(s.to_owned())
        }
    }

    /// The displayable URL, if this source has one. Decoded files
    /// don't -- they exist only for upload.
    pub fn extract_url(&self) -> Option<&str> {
        match self {
            Self::Url(u) => Some(u),
            Self::DataUri(d) => Some(d),
            Self::File(_) => None,
        }
    }

    /// Convert into an upload-ready file.
    ///
    /// Files pass through unchanged; `data:` URIs are decoded and
    /// tagged with the declared MIME type (falling back to a guess
    /// from `fallback_name`'s extension); plain URLs yield `None` --
    /// the backend already has those bytes.
    pub fn to_upload_file(&self, fallback_name: &str) -> Option<UploadFile> {
        match self {
            Self::File(file) => Some(file.clone()),
            Self::DataUri(uri) => decode_data_uri(uri, fallback_name),
            Self::Url(_) => None,
        }
    }
}

/// Build the display list for a set of sources: entries without a URL
/// are dropped, and an empty result is replaced by the placeholder.
pub fn display_urls(sources: &[MediaSource]) -> Vec<String> {
    let urls: Vec<String> = sources
        .iter()
        .filter_map(|s| s.extract_url().map(str::to_owned))
        .collect();
    if urls.is_empty() {
        vec![PLACEHOLDER_IMAGE.to_owned()]
    } else {
        urls
    }
}

/// Decode a `data:[mime][;base64],payload` URI into an `UploadFile`.
fn decode_data_uri(uri: &str, fallback_name: &str) -> Option<UploadFile> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;

    let bytes = if header.ends_with(";base64") {
        match BASE64.decode(payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(error = %err, "dropping data URI with invalid base64 payload");
                return None;
            }
        }
    } else {
        payload.as_bytes().to_vec()
    };

    let declared = header.trim_end_matches(";base64");
    let mime = if declared.is_empty() {
        mime_from_name(fallback_name).to_owned()
    } else {
        declared.to_owned()
    };

    Some(UploadFile {
        name: fallback_name.to_owned(),
        mime,
        bytes,
    })
}

fn mime_from_name(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ingest_plain_string() {
        let src = MediaSource::ingest(&json!("https://cdn.example.com/a.jpg")).unwrap();
        assert_eq!(src.extract_url(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn ingest_prefers_url_over_secure_url() {
        let src = MediaSource::ingest(&json!({"secure_url": "s", "url": "y"})).unwrap();
        assert_eq!(src.extract_url(), Some("y"));
    }

    #[test]
    fn ingest_falls_through_precedence_order() {
        let src = MediaSource::ingest(&json!({"secure_url": "x"})).unwrap();
        assert_eq!(src.extract_url(), Some("x"));

        let src = MediaSource::ingest(&json!({"imageUrl": "i"})).unwrap();
        assert_eq!(src.extract_url(), Some("i"));
    }

    #[test]
    fn ingest_rejects_null_and_empty() {
        assert!(MediaSource::ingest(&Value::Null).is_none());
        assert!(MediaSource::ingest(&json!("")).is_none());
        assert!(MediaSource::ingest(&json!({"url": ""})).is_none());
        assert!(MediaSource::ingest(&json!(42)).is_none());
    }

    #[test]
    fn data_scheme_string_becomes_data_uri() {
        let src = MediaSource::ingest(&json!("data:image/png;base64,iVBORw==")).unwrap();
        assert!(matches!(src, MediaSource::DataUri(_)));
    }

    #[test]
    fn data_uri_decodes_to_upload_file() {
        // "hello" base64-encoded.
        let src = MediaSource::DataUri("data:image/png;base64,aGVsbG8=".into());
        let file = src.to_upload_file("img.png").unwrap();
        assert_eq!(file.bytes, b"hello");
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.name, "img.png");
    }

    #[test]
    fn data_uri_without_mime_guesses_from_name() {
        let src = MediaSource::DataUri("data:;base64,aGVsbG8=".into());
        let file = src.to_upload_file("photo.jpg").unwrap();
        assert_eq!(file.mime, "image/jpeg");
    }

    #[test]
    fn invalid_base64_is_dropped() {
        let src = MediaSource::DataUri("data:image/png;base64,!!!not-base64!!!".into());
        assert!(src.to_upload_file("x.png").is_none());
    }

    #[test]
    fn url_source_is_not_uploadable() {
        let src = MediaSource::Url("https://cdn.example.com/a.jpg".into());
        assert!(src.to_upload_file("a.jpg").is_none());
    }

    #[test]
    fn file_source_passes_through() {
        let file = UploadFile {
            name: "f.png".into(),
            mime: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        let src = MediaSource::File(file.clone());
        assert_eq!(src.to_upload_file("ignored.png").unwrap(), file);
    }

    #[test]
    fn empty_display_list_gets_placeholder() {
        assert_eq!(display_urls(&[]), vec![PLACEHOLDER_IMAGE.to_owned()]);

        let only_file = [MediaSource::File(UploadFile {
            name: "f".into(),
            mime: "image/png".into(),
            bytes: vec![],
        })];
        assert_eq!(display_urls(&only_file), vec![PLACEHOLDER_IMAGE.to_owned()]);
    }

    #[test]
    fn display_list_keeps_url_order() {
        let sources = [
            MediaSource::Url("a".into()),
            MediaSource::Url("b".into()),
        ];
        assert_eq!(display_urls(&sources), vec!["a".to_owned(), "b".to_owned()]);
    }
}
