// Wire types for the Letora backend.
//
// Response DTOs carry a flattened `extra` map so new backend fields don't
// break deserialization. Request types serialize exactly the shapes the
// backend expects (camelCase throughout).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDto {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub profile_pic: Option<String>,
    pub state_origin: Option<String>,
    pub town_origin: Option<String>,
    pub favorites: Vec<FavoriteDto>,
    pub bookings: Vec<Value>,
    pub apartments: Vec<ApartmentDto>,
    pub documents: Vec<DocumentDto>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One entry in the user's favorites list. Some endpoints embed the full
/// apartment, others only its id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FavoriteDto {
    pub id: Option<String>,
    pub apartment_id: Option<String>,
    pub apartment: Option<ApartmentDto>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Apartments ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApartmentDto {
    pub id: String,
    pub title: Option<String>,
    pub apartment_type: Option<String>,
    pub state: Option<String>,
    pub town: Option<String>,
    pub price: Option<u64>,
    pub security_deposit: Option<u64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub guest_number: Option<String>,
    pub parking_space: Option<String>,
    pub kitchen_size: Option<String>,
    pub electricity: Option<String>,
    pub description: Option<String>,
    pub facilities: Vec<String>,
    pub house_rules: Vec<String>,
    /// Heterogeneous: strings, `{url|data|secure_url|imageUrl}` objects.
    /// Normalized by `letora-core`'s media module, not here.
    pub images: Vec<Value>,
    pub status: Option<String>,
    pub host_id: Option<String>,
    pub reviews: Vec<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Documents ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentDto {
    pub id: String,
    pub document_type: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationDto {
    pub id: String,
    pub title: Option<String>,
    pub message: Option<String>,
    pub notification_type: Option<String>,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponseDto {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserDto>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshResponseDto {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub state_origin: Option<String>,
    pub town_origin: Option<String>,
    /// "GUEST" or "HOST".
    pub role: String,
}

// ── Favorites ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleFavoriteDto {
    pub is_favorited: bool,
}

// ── Banking ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
}

// ── Apartment submission (multipart `apartmentData` JSON field) ──────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentSubmission {
    pub basic_info: SubmissionBasicInfo,
    pub details: SubmissionDetails,
    pub facilities: Vec<String>,
    pub house_rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_deposit: Option<SubmissionDeposit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_documents: Option<SubmissionLegalRole>,
    pub document_metadata: Vec<DocumentMetadata>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBasicInfo {
    pub title: String,
    pub apartment_type: String,
    pub town: String,
    pub state: String,
    pub price: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetails {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking_space: String,
    pub guest_number: String,
    pub electricity: String,
    pub kitchen_size: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDeposit {
    pub amount: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionLegalRole {
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub document_type: String,
    pub role: String,
    pub name: String,
}

// ── File payloads ────────────────────────────────────────────────────

/// An upload-ready file: decoded bytes plus filename and MIME type.
/// Produced by `letora-core`'s media normalizer, consumed by the
/// multipart endpoints here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Convert into a multipart part. Fails only on an unparseable MIME
    /// string, which indicates a bug upstream in normalization.
    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part, crate::Error> {
        let mime = self.mime.clone();
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.name)
            .mime_str(&mime)
            .map_err(|e| crate::Error::Multipart {
                message: format!("invalid MIME type {mime:?}: {e}"),
            })
    }
}
