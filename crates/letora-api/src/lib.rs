//! Async Rust client for the Letora shortlet marketplace backend.
//!
//! One [`ApiClient`] covers the whole REST surface: auth (with transparent
//! refresh-token retry on 401), apartment browse/search, the multipart
//! apartment-creation and host-profile flows, identity documents, favorites,
//! and notifications. Responses arrive in a `{ success, data, error }`
//! envelope which is unwrapped before callers see it; failures become
//! structured [`Error`] values that `letora-core` classifies for display.

pub mod apartments;
pub mod auth;
pub mod client;
pub mod documents;
pub mod error;
pub mod notifications;
pub mod transport;
pub mod types;
pub mod users;

pub use client::{ApiClient, SessionTokens};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    ApartmentDto, ApartmentSubmission, BankDetails, DocumentDto, DocumentMetadata, FavoriteDto,
    LoginResponseDto, NotificationDto, RegisterRequest, SubmissionBasicInfo, SubmissionDeposit,
    SubmissionDetails, SubmissionLegalRole, ToggleFavoriteDto, UploadFile, UserDto,
};
