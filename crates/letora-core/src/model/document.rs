// ── Verification document types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::media::MediaSource;

/// Known document kinds accepted by the verification flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum DocumentType {
    IdCard,
    IdPhotograph,
    ProofOfOwnership,
    AuthorizationToSublet,
    UtilityBill,
}

/// Backend review state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum DocumentStatus {
    #[default]
    Pending,
    Uploaded,
    Verified,
    Rejected,
}

/// Normalize a document type string for comparison: whitespace
/// removed, upper-cased. `"id card"`, `"ID_CARD"`, and `" Id_Card "`
/// all compare equal after normalization.
pub fn normalized_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// One entry in a host-profile draft's verification document list.
///
/// `doc_type` stays a string because the backend also returns types we
/// don't model; [`DocumentType`] covers the ones the client creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationDocument {
    pub id: String,
    pub doc_type: String,
    pub name: String,
    pub size: Option<u64>,
    pub file_type: Option<String>,
    pub source: Option<MediaSource>,
    pub status: DocumentStatus,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl VerificationDocument {
    /// Create a fresh draft document with a generated id.
    pub fn new(doc_type: impl Into<String>, name: impl Into<String>, source: MediaSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            doc_type: doc_type.into(),
            name: name.into(),
            source: Some(source),
            ..Self::default()
        }
    }

    /// True if this document's type matches `other_type` after
    /// normalization.
    pub fn matches_type(&self, other_type: &str) -> bool {
        normalized_type(&self.doc_type) == normalized_type(other_type)
    }
}
