// User profile, banking, favorites, and host-profile endpoints.

use reqwest::multipart::Form;
use serde_json::Value;
use tracing::debug;

use crate::Error;
use crate::client::ApiClient;
use crate::types::{BankDetails, ToggleFavoriteDto, UploadFile, UserDto};

impl ApiClient {
    /// Fetch the authenticated user's full profile, including favorites,
    /// bookings, apartments, and documents.
    pub async fn get_profile(&self) -> Result<UserDto, Error> {
        self.get("api/users/profile").await
    }

    /// Update profile fields.
    pub async fn update_profile(&self, fields: &Value) -> Result<UserDto, Error> {
        self.put("api/users/profile", fields).await
    }

    /// Add or replace bank details for payouts.
    pub async fn upload_bank_details(&self, details: &BankDetails) -> Result<Value, Error> {
        self.post("api/users/bank-details", details).await
    }

    /// Toggle an apartment in the user's favorites.
    ///
    /// The returned `is_favorited` reflects the server's new state for
    /// this toggle only; callers treat it as transient and refetch the
    /// profile for authoritative state.
    pub async fn toggle_favorite(&self, apartment_id: &str) -> Result<ToggleFavoriteDto, Error> {
        self.post(
            &format!("api/users/favorites/{apartment_id}/toggle"),
            &Value::Object(serde_json::Map::new()),
        )
        .await
    }

    /// Create a host profile in one multipart request: a `bankingInfo`
    /// JSON field plus paired `documents` file parts and `documentTypes`
    /// text parts (one type per file, same order).
    pub async fn create_host_profile(
        &self,
        banking_info: &BankDetails,
        documents: &[(String, UploadFile)],
    ) -> Result<UserDto, Error> {
        let url = self.url("api/users/host-profile");
        debug!("POST {url} (multipart)");
        let banking_json = serde_json::to_string(banking_info).map_err(|e| Error::Multipart {
            message: format!("failed to serialize bankingInfo: {e}"),
        })?;

        self.execute(move |http| {
            let mut form = Form::new().text("bankingInfo", banking_json.clone());
            for (doc_type, file) in documents {
                form = form
                    .part("documents", file.clone().into_part()?)
                    .text("documentTypes", doc_type.clone());
            }
            Ok(http.post(url.clone()).multipart(form))
        })
        .await
    }
}
