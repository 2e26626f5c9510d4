//! Business logic and reactive data layer between `letora-api` and UI
//! consumers.
//!
//! This crate owns the client-side state model for the Letora shortlet
//! marketplace:
//!
//! - **[`Session`]** — Central facade managing authentication, listing
//!   refresh, draft editing/submission, booking fee computation, and
//!   favorite/notification sync. Cheaply cloneable.
//!
//! - **[`DataStore`]** — Reactive storage built on `DashMap` +
//!   `tokio::sync::watch` channels: apartments, the authenticated
//!   user, notifications, and per-entity pending flags. Consumers
//!   subscribe for push-based change notification.
//!
//! - **Drafts** ([`draft`]) — Multi-step form state for listing
//!   creation and host onboarding, with pure reducer-style updates
//!   ([`ApartmentDraft::apply`], [`HostProfileDraft::apply`]) and
//!   degradation-tolerant persistence ([`DraftStore`]).
//!
//! - **[`BookingData`]** — Deterministic fee derivation from price,
//!   date range, and deposit.
//!
//! - **[`media`]** — Ingestion of the backend's heterogeneous image
//!   and document shapes into a single tagged [`MediaSource`].

pub mod booking;
pub mod convert;
pub mod draft;
pub mod error;
pub mod media;
pub mod model;
pub mod search_history;
pub mod session;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use booking::{BookingData, BookingPatch, BookingSummary, CONVENIENCE_FEE};
pub use draft::{
    ApartmentDraft, ApartmentDraftUpdate, DraftStore, FileStorage, HostProfileDraft,
    HostProfileUpdate, KeyValueStorage, MemoryStorage, StorageError,
};
pub use error::{CoreError, ErrorClass};
pub use media::{MediaSource, PLACEHOLDER_IMAGE, display_urls};
pub use search_history::{SEARCH_HISTORY_LIMIT, SearchHistory, SearchHistoryEntry};
pub use session::Session;
pub use store::DataStore;
pub use sync::ToggleOutcome;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Apartment,
    ApartmentType,
    DocumentStatus,
    DocumentType,
    ListingStatus,
    Location,
    Notification,
    Role,
    User,
    VerificationDocument,
};
