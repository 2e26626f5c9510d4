// ── Session token persistence ──
//
// Tokens live in the OS keychain under the `letora` service. The
// `LETORA_TOKEN` / `LETORA_REFRESH_TOKEN` env vars override the
// keychain for CI and headless use; env-sourced tokens are never
// written back.

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use letora_api::SessionTokens;

use crate::ConfigError;

const SERVICE: &str = "letora";
const ACCESS_USER: &str = "access-token";
const REFRESH_USER: &str = "refresh-token";

const ENV_ACCESS: &str = "LETORA_TOKEN";
const ENV_REFRESH: &str = "LETORA_REFRESH_TOKEN";

/// Load stored tokens: environment first, then the keychain. `None`
/// when nothing is stored anywhere.
pub fn load_tokens() -> Result<Option<SessionTokens>, ConfigError> {
    if let Ok(access) = std::env::var(ENV_ACCESS) {
        debug!("using session token from environment");
        let refresh = std::env::var(ENV_REFRESH).ok().map(SecretString::from);
        return Ok(Some(SessionTokens {
            access: SecretString::from(access),
            refresh,
        }));
    }

    let access_entry = Entry::new(SERVICE, ACCESS_USER)?;
    let access = match access_entry.get_password() {
        Ok(secret) => SecretString::from(secret),
        Err(keyring::Error::NoEntry) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let refresh = match Entry::new(SERVICE, REFRESH_USER)?.get_password() {
        Ok(secret) => Some(SecretString::from(secret)),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Some(SessionTokens { access, refresh }))
}

/// Persist a token pair to the keychain.
pub fn store_tokens(tokens: &SessionTokens) -> Result<(), ConfigError> {
    Entry::new(SERVICE, ACCESS_USER)?.set_password(tokens.access.expose_secret())?;
    match &tokens.refresh {
        Some(refresh) => {
            Entry::new(SERVICE, REFRESH_USER)?.set_password(refresh.expose_secret())?;
        }
        None => forget(REFRESH_USER)?,
    }
    debug!("session tokens stored in keychain");
    Ok(())
}

/// Remove any stored tokens. Missing entries are not an error.
pub fn clear_tokens() -> Result<(), ConfigError> {
    forget(ACCESS_USER)?;
    forget(REFRESH_USER)?;
    Ok(())
}

fn forget(user: &str) -> Result<(), ConfigError> {
    match Entry::new(SERVICE, user)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
