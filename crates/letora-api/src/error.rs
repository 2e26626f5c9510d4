use thiserror::Error;

/// Top-level error type for the `letora-api` crate.
///
/// Covers every failure mode across the API surface: authentication,
/// transport, the backend's JSON envelope, and multipart assembly.
/// `letora-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, unverified email, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Access token rejected and the refresh-token exchange also failed.
    /// The caller should log the user out.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// An operation requiring auth was attempted with no stored tokens.
    #[error("Not authenticated")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API envelope ────────────────────────────────────────────────
    /// Structured error from the backend. Carries the HTTP status and the
    /// raw response body so callers can classify and display it.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Multipart ───────────────────────────────────────────────────
    /// A multipart form part could not be assembled (bad MIME type, etc.)
    #[error("Multipart form error: {message}")]
    Multipart { message: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::NotAuthenticated | Self::Api { status: 401, .. }
        )
    }

    /// Returns `true` if the request never produced a server response
    /// (connectivity, DNS, timeout). Maps to the UI's "network" alert class.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout() || e.is_connect() || e.is_request())
    }

    /// Returns `true` for 5xx responses. Maps to the UI's "server" alert class.
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }

    /// Returns `true` for 4xx responses other than auth failures.
    /// Maps to the UI's "validation" alert class.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status) && *status != 401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}
