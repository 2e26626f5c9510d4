// Authentication endpoints.
//
// Login installs the returned token pair on the client so subsequent
// requests are authorized automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{ApiClient, SessionTokens};
use crate::types::{LoginResponseDto, RegisterRequest, UserDto};
use crate::Error;

impl ApiClient {
    /// Log in with email + password. On success the access/refresh token
    /// pair is stored on the client and the user payload is returned.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<UserDto, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp: LoginResponseDto = self.post("api/auth/login", &body).await.map_err(|e| {
            match e {
                Error::Api { status: 401 | 403, message, .. } => {
                    Error::Authentication { message }
                }
                other => other,
            }
        })?;

        let access = resp.access_token.ok_or_else(|| Error::Authentication {
            message: "login response missing access token".into(),
        })?;

        self.set_tokens(SessionTokens {
            access: SecretString::from(access),
            refresh: resp.refresh_token.map(SecretString::from),
        });
        debug!("login successful");

        resp.user.ok_or_else(|| Error::Authentication {
            message: "login response missing user payload".into(),
        })
    }

    /// Register a new account. The backend sends a verification code to
    /// the supplied email address.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, Error> {
        self.post("api/auth/register", request).await
    }

    /// Verify an email address with the emailed code.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Value, Error> {
        let body = json!({ "email": email, "code": code });
        self.post("api/auth/verify-email", &body).await
    }

    /// Re-send the verification code.
    pub async fn resend_verification(&self, email: &str) -> Result<Value, Error> {
        let body = json!({ "email": email });
        self.post("api/auth/resend-verification", &body).await
    }

    /// Start a password reset (emails a reset token).
    pub async fn forgot_password(&self, email: &str) -> Result<Value, Error> {
        let body = json!({ "email": email });
        self.post("api/auth/forgot-password", &body).await
    }

    /// Complete a password reset with the emailed token.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<Value, Error> {
        let body = json!({
            "token": token,
            "newPassword": new_password.expose_secret(),
        });
        self.post("api/auth/reset-password", &body).await
    }

    /// Log out: best-effort server notification, then drop local tokens.
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<Value, Error> = self.post("api/auth/logout", &json!({})).await;
        self.clear_tokens();
        // A failed server-side logout is non-fatal; tokens are gone locally.
        if let Err(e) = result {
            debug!(error = %e, "server-side logout failed (non-fatal)");
        }
        Ok(())
    }
}
