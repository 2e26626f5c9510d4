// ── Core error type ──
//
// Translates `letora_api` errors into domain errors and adds the
// failure modes that only exist at this layer (drafts, validation,
// coalesced favorite syncs).

use thiserror::Error;

use crate::draft::StorageError;

/// Display category for transient error alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Auth,
    Network,
    Server,
    Validation,
    Other,
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// The access token expired and could not be refreshed.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// An operation that requires authentication was attempted while
    /// logged out.
    #[error("not logged in")]
    NotLoggedIn,

    /// Input rejected before any state mutation or network call.
    #[error("{0}")]
    Validation(String),

    /// An apartment id that is in neither the store nor the backend.
    #[error("unknown apartment: {0}")]
    UnknownApartment(String),

    /// A coalesced favorite toggle failed in the request that this
    /// caller joined. Carries the leader's error message only; the
    /// structured error went to the leader.
    #[error("favorite sync failed: {0}")]
    FavoriteSync(String),

    #[error("draft storage: {0}")]
    DraftStorage(#[from] StorageError),

    #[error(transparent)]
    Api(letora_api::Error),
}

impl From<letora_api::Error> for CoreError {
    fn from(err: letora_api::Error) -> Self {
        match err {
            letora_api::Error::SessionExpired => Self::SessionExpired,
            letora_api::Error::NotAuthenticated => Self::NotLoggedIn,
            other => Self::Api(other),
        }
    }
}

impl CoreError {
    /// Classify for alert display. UI consumers pick wording and
    /// severity off this rather than matching variants.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::SessionExpired | Self::NotLoggedIn => ErrorClass::Auth,
            Self::Validation(_) => ErrorClass::Validation,
            Self::UnknownApartment(_) | Self::DraftStorage(_) => ErrorClass::Other,
            Self::FavoriteSync(_) => ErrorClass::Network,
            Self::Api(api) => {
                if api.is_network() {
                    ErrorClass::Network
                } else if api.is_server() {
                    ErrorClass::Server
                } else if api.is_validation() {
                    ErrorClass::Validation
                } else {
                    ErrorClass::Other
                }
            }
        }
    }
}
