// ── Canonical domain model ──

pub mod apartment;
pub mod document;
pub mod notification;
pub mod user;

pub use apartment::{Apartment, ApartmentType, ListingStatus, Location};
pub use document::{DocumentStatus, DocumentType, VerificationDocument, normalized_type};
pub use notification::Notification;
pub use user::{Role, User};
