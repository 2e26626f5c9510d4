// Hand-crafted async HTTP client for the Letora backend.
//
// Auth: Bearer access token, with a one-shot refresh-token exchange on 401.
// Envelope: `{ success, data, error|message }` -- unwrapped before callers
// see it. Endpoint modules (auth, apartments, users, documents,
// notifications) add inherent methods via separate files so this module
// stays focused on transport mechanics.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

/// Bearer/refresh token pair for an authenticated session.
#[derive(Clone)]
pub struct SessionTokens {
    pub access: SecretString,
    pub refresh: Option<SecretString>,
}

/// Async client for the Letora REST API.
///
/// Cheaply cloneable; the token store is shared across clones so a refresh
/// performed by one request is visible to all.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<RwLock<Option<SessionTokens>>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the given backend base URL.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, Self::normalize_base_url(base_url)?))
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            tokens: Arc::new(RwLock::new(None)),
        }
    }

    /// Ensure the base URL ends with a slash so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a token pair (after login or from persisted storage).
    pub fn set_tokens(&self, tokens: SessionTokens) {
        *self.tokens.write().expect("token lock poisoned") = Some(tokens);
    }

    /// Drop all stored tokens (logout).
    pub fn clear_tokens(&self) {
        *self.tokens.write().expect("token lock poisoned") = None;
    }

    /// Whether an access token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.read().expect("token lock poisoned").is_some()
    }

    /// Current refresh token, if any (for persistence across restarts).
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .expect("token lock poisoned")
            .as_ref()
            .and_then(|t| t.refresh.clone())
    }

    fn access_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .expect("token lock poisoned")
            .as_ref()
            .map(|t| t.access.clone())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/auth/login"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── Request execution ────────────────────────────────────────────

    /// Execute a request, refreshing the access token and retrying exactly
    /// once if the backend answers 401.
    ///
    /// `make` is called per attempt so non-reusable bodies (multipart
    /// forms) can be rebuilt for the retry.
    pub(crate) async fn execute<T, F>(&self, make: F) -> Result<T, Error>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> Result<reqwest::RequestBuilder, Error>,
    {
        let resp = self.authorized(make(&self.http)?).send().await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!("access token rejected, attempting refresh");
            self.refresh_access_token().await?;
            let resp = self.authorized(make(&self.http)?).send().await?;
            return Self::handle_response(resp).await;
        }

        Self::handle_response(resp).await
    }

    /// Attach the Bearer header when a token is stored.
    fn authorized(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.access_token() {
            Some(token) => rb.bearer_auth(token.expose_secret()),
            None => rb,
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure here means the session is gone -- callers get
    /// [`Error::SessionExpired`] and should log the user out.
    async fn refresh_access_token(&self) -> Result<(), Error> {
        let refresh = self
            .refresh_token()
            .ok_or(Error::SessionExpired)?;

        let url = self.url("api/auth/refresh-token");
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&json!({ "refreshToken": refresh.expose_secret() }))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "refresh-token request failed");
                Error::SessionExpired
            })?;

        if !resp.status().is_success() {
            return Err(Error::SessionExpired);
        }

        let body: Value = resp.json().await.map_err(|_| Error::SessionExpired)?;
        let access = body
            .get("accessToken")
            .or_else(|| body.get("data").and_then(|d| d.get("accessToken")))
            .and_then(Value::as_str)
            .ok_or(Error::SessionExpired)?;

        let mut guard = self.tokens.write().expect("token lock poisoned");
        if let Some(tokens) = guard.as_mut() {
            tokens.access = SecretString::from(access.to_owned());
        } else {
            *guard = Some(SessionTokens {
                access: SecretString::from(access.to_owned()),
                refresh: Some(refresh),
            });
        }
        debug!("access token refreshed");
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Unwrap the `{ success, data, ... }` envelope.
    ///
    /// Non-2xx statuses and `success: false` bodies both become
    /// [`Error::Api`] carrying the full body for classification. On
    /// success the `data` field is deserialized when present, otherwise
    /// the whole body (some endpoints skip the envelope).
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let text = resp.text().await?;

        let body: Value = serde_json::from_str(&text)
            .unwrap_or_else(|_| json!({ "error": "Invalid response from server" }));

        let declared_failure = body.get("success").and_then(Value::as_bool) == Some(false);
        if !status.is_success() || declared_failure {
            return Err(Error::Api {
                status: status.as_u16(),
                message: extract_message(&body, status),
                body,
            });
        }

        let payload = match body.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => body,
        };

        serde_json::from_value(payload).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text,
            }
        })
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");
        self.execute(move |http| Ok(http.get(url.clone()))).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");
        self.execute(move |http| Ok(http.get(url.clone()).query(params)))
            .await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.url(path);
        debug!("POST {url}");
        self.execute(move |http| Ok(http.post(url.clone()).json(body)))
            .await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.url(path);
        debug!("PUT {url}");
        self.execute(move |http| Ok(http.put(url.clone()).json(body)))
            .await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.url(path);
        debug!("PATCH {url}");
        self.execute(move |http| Ok(http.patch(url.clone()).json(body)))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("DELETE {url}");
        self.execute(move |http| Ok(http.delete(url.clone()))).await
    }
}

/// Pull the most useful human-readable message out of an error body.
fn extract_message(body: &Value, status: reqwest::StatusCode) -> String {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map_or_else(
            || {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            },
            str::to_owned,
        )
}
