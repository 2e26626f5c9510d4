// Apartment endpoints: browse/search plus the multipart creation flow.

use reqwest::multipart::Form;
use serde_json::Value;
use tracing::debug;

use crate::Error;
use crate::client::ApiClient;
use crate::types::{ApartmentDto, ApartmentSubmission, UploadFile};

impl ApiClient {
    // ── Browse ───────────────────────────────────────────────────────

    /// All approved apartments.
    pub async fn list_approved(&self) -> Result<Vec<ApartmentDto>, Error> {
        self.get("apartments/approved").await
    }

    /// Trending ("hot") apartments.
    pub async fn list_hot(&self) -> Result<Vec<ApartmentDto>, Error> {
        self.get("apartments/hot").await
    }

    /// Apartments near a location. `town` narrows within the state.
    pub async fn list_nearby(
        &self,
        state: &str,
        town: Option<&str>,
    ) -> Result<Vec<ApartmentDto>, Error> {
        let mut params = vec![("state", state.to_owned())];
        if let Some(town) = town {
            params.push(("town", town.to_owned()));
        }
        self.get_with_params("apartments/nearby", &params).await
    }

    /// Filtered search. Empty filter values are skipped.
    pub async fn search(&self, filters: &[(&str, String)]) -> Result<Vec<ApartmentDto>, Error> {
        let params: Vec<(&str, String)> = filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .cloned()
            .collect();
        self.get_with_params("apartments/search", &params).await
    }

    /// Fetch one apartment by id.
    pub async fn get_apartment(&self, apartment_id: &str) -> Result<ApartmentDto, Error> {
        self.get(&format!("apartments/{apartment_id}")).await
    }

    // ── Create / update ──────────────────────────────────────────────

    /// Create a complete apartment listing in one multipart request:
    /// an `apartmentData` JSON field plus `images` and `documents` file
    /// parts.
    pub async fn create_apartment(
        &self,
        data: &ApartmentSubmission,
        images: &[UploadFile],
        documents: &[UploadFile],
    ) -> Result<ApartmentDto, Error> {
        let url = self.url("apartments/create");
        debug!("POST {url} (multipart)");
        let json = serde_json::to_string(data).map_err(|e| Error::Multipart {
            message: format!("failed to serialize apartmentData: {e}"),
        })?;

        self.execute(move |http| {
            Ok(http
                .post(url.clone())
                .multipart(build_apartment_form(&json, images, documents)?))
        })
        .await
    }

    /// Update an existing apartment with the same multipart shape as
    /// creation.
    pub async fn update_apartment(
        &self,
        apartment_id: &str,
        data: &ApartmentSubmission,
        images: &[UploadFile],
        documents: &[UploadFile],
    ) -> Result<ApartmentDto, Error> {
        let url = self.url(&format!("apartments/{apartment_id}"));
        debug!("PUT {url} (multipart)");
        let json = serde_json::to_string(data).map_err(|e| Error::Multipart {
            message: format!("failed to serialize apartmentData: {e}"),
        })?;

        self.execute(move |http| {
            Ok(http
                .put(url.clone())
                .multipart(build_apartment_form(&json, images, documents)?))
        })
        .await
    }

    /// Delete an apartment listing.
    pub async fn delete_apartment(&self, apartment_id: &str) -> Result<Value, Error> {
        self.delete(&format!("apartments/{apartment_id}")).await
    }
}

/// Assemble the apartment multipart form. Rebuilt per attempt because
/// `Form` is consumed on send.
fn build_apartment_form(
    apartment_data: &str,
    images: &[UploadFile],
    documents: &[UploadFile],
) -> Result<Form, Error> {
    let mut form = Form::new().text("apartmentData", apartment_data.to_owned());
    for image in images {
        form = form.part("images", image.clone().into_part()?);
    }
    for document in documents {
        form = form.part("documents", document.clone().into_part()?);
    }
    Ok(form)
}
