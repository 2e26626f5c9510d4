// ── Session facade ──
//
// The main entry point for consumers. Owns the API client, the
// reactive data store, the persisted drafts, and the in-progress
// booking; UI layers call methods here and subscribe to the store.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use letora_api::{
    ApartmentSubmission, ApiClient, DocumentMetadata, RegisterRequest, SessionTokens,
    SubmissionBasicInfo, SubmissionDeposit, SubmissionDetails, SubmissionLegalRole, UploadFile,
};

use crate::booking::{BookingData, BookingPatch, BookingSummary};
use crate::draft::{
    ApartmentDraft, ApartmentDraftUpdate, DraftStore, HostProfileDraft, HostProfileUpdate,
    KeyValueStorage,
};
use crate::error::CoreError;
use crate::model::{Apartment, Notification, User};
use crate::search_history::{SearchHistory, SearchHistoryEntry};
use crate::store::{DataStore, RefreshSnapshot};
use crate::sync::{self, FavoriteSync, ToggleOutcome};

/// Cheaply cloneable session handle over `Arc<SessionInner>`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    store: Arc<DataStore>,
    drafts: DraftStore,
    apartment_draft: Mutex<ApartmentDraft>,
    host_profile_draft: Mutex<HostProfileDraft>,
    booking: Mutex<BookingData>,
    favorites: FavoriteSync,
    searches: SearchHistory,
}

impl Session {
    /// Build a session over an API client and draft storage. Drafts
    /// persisted by an earlier run are loaded immediately; nothing
    /// touches the network until an operation is called.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        let searches = SearchHistory::new(Arc::clone(&storage));
        let drafts = DraftStore::new(storage);
        let apartment_draft = drafts.load_apartment();
        let host_profile_draft = drafts.load_host_profile();

        Self {
            inner: Arc::new(SessionInner {
                api,
                store: Arc::new(DataStore::new()),
                drafts,
                apartment_draft: Mutex::new(apartment_draft),
                host_profile_draft: Mutex::new(host_profile_draft),
                booking: Mutex::new(BookingData::default()),
                favorites: FavoriteSync::new(),
                searches,
            }),
        }
    }

    /// Access the reactive data store.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    /// Access the underlying API client.
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── Authentication ───────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Arc<User>, CoreError> {
        let dto = self.inner.api.login(email, password).await?;
        let user = Arc::new(User::from(dto));
        self.inner.store.set_user(Some(Arc::clone(&user)));
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Resume a persisted session: install the token pair, then pull
    /// the profile to confirm the tokens still work.
    pub async fn restore(&self, tokens: SessionTokens) -> Result<Arc<User>, CoreError> {
        self.inner.api.set_tokens(tokens);
        self.refresh_user().await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), CoreError> {
        self.inner.api.register(request).await?;
        Ok(())
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<(), CoreError> {
        self.inner.api.verify_email(email, code).await?;
        Ok(())
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), CoreError> {
        self.inner.api.resend_verification(email).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), CoreError> {
        self.inner.api.forgot_password(email).await?;
        Ok(())
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<(), CoreError> {
        self.inner.api.reset_password(token, new_password).await?;
        Ok(())
    }

    /// Log out and drop all session-scoped state. Drafts survive --
    /// they belong to the device, not the session.
    pub async fn logout(&self) -> Result<(), CoreError> {
        self.inner.api.logout().await?;
        self.inner.store.clear_session_state();
        Ok(())
    }

    /// Refetch the authoritative user profile into the store.
    pub async fn refresh_user(&self) -> Result<Arc<User>, CoreError> {
        let dto = self.inner.api.get_profile().await?;
        let user = Arc::new(User::from(dto));
        self.inner.store.set_user(Some(Arc::clone(&user)));
        Ok(user)
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// Refresh the browse sections. The approved list is load-bearing
    /// and errors propagate; hot and nearby are supplementary and
    /// degrade to empty with a warning.
    pub async fn refresh_listings(&self) -> Result<(), CoreError> {
        let api = &self.inner.api;

        let location = self.inner.store.user().and_then(|u| {
            u.state_origin
                .clone()
                .map(|state| (state, u.town_origin.clone()))
        });
        let nearby_fut = async {
            match &location {
                Some((state, town)) => api.list_nearby(state, town.as_deref()).await,
                None => Ok(Vec::new()),
            }
        };

        let (approved, hot, nearby) = tokio::join!(api.list_approved(), api.list_hot(), nearby_fut);

        let approved = approved?;
        let hot = hot.unwrap_or_else(|err| {
            warn!(error = %err, "hot listings unavailable");
            Vec::new()
        });
        let nearby = nearby.unwrap_or_else(|err| {
            warn!(error = %err, "nearby listings unavailable");
            Vec::new()
        });

        debug!(
            approved = approved.len(),
            hot = hot.len(),
            nearby = nearby.len(),
            "applying listing refresh"
        );
        self.inner.store.apply_refresh_snapshot(RefreshSnapshot {
            approved: approved.into_iter().map(Apartment::from).collect(),
            hot: hot.into_iter().map(Apartment::from).collect(),
            nearby: nearby.into_iter().map(Apartment::from).collect(),
        });
        Ok(())
    }

    /// Filtered search. Results are returned directly and also merged
    /// into the store so detail lookups resolve.
    pub async fn search_apartments(
        &self,
        filters: &[(&str, String)],
    ) -> Result<Vec<Apartment>, CoreError> {
        let results: Vec<Apartment> = self
            .inner
            .api
            .search(filters)
            .await?
            .into_iter()
            .map(Apartment::from)
            .collect();
        for apartment in &results {
            self.inner.store.upsert_apartment(apartment.clone());
        }
        Ok(results)
    }

    /// Fetch one apartment, preferring the store and falling back to
    /// the backend.
    pub async fn apartment(&self, apartment_id: &str) -> Result<Arc<Apartment>, CoreError> {
        if let Some(apartment) = self.inner.store.apartment(apartment_id) {
            return Ok(apartment);
        }
        let dto = self.inner.api.get_apartment(apartment_id).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::UnknownApartment(apartment_id.to_owned())
            } else {
                CoreError::from(e)
            }
        })?;
        let apartment = Apartment::from(dto);
        self.inner.store.upsert_apartment(apartment.clone());
        Ok(Arc::new(apartment))
    }

    // ── Apartment draft ──────────────────────────────────────────────

    pub async fn apartment_draft(&self) -> ApartmentDraft {
        self.inner.apartment_draft.lock().await.clone()
    }

    /// Apply one draft update and autosave the result.
    pub async fn update_apartment_draft(&self, update: ApartmentDraftUpdate) -> ApartmentDraft {
        let mut guard = self.inner.apartment_draft.lock().await;
        let next = guard.apply(update);
        *guard = next.clone();
        self.inner.drafts.save_apartment(&next);
        next
    }

    /// Reset the draft to the default shape (step 1) and remove the
    /// persisted copy.
    pub async fn reset_apartment_draft(&self) {
        *self.inner.apartment_draft.lock().await = ApartmentDraft::default();
        self.inner.drafts.clear_apartment();
    }

    /// Submit the apartment draft: create a new listing, or update the
    /// existing one when the draft is in edit mode. On success the
    /// draft is cleared and the listing lands in the store.
    pub async fn submit_apartment(&self) -> Result<Apartment, CoreError> {
        let draft = self.inner.apartment_draft.lock().await.clone();

        if draft.basic_info.title.trim().is_empty() {
            return Err(CoreError::Validation("listing title is required".into()));
        }
        if draft.pricing.price == 0 {
            return Err(CoreError::Validation("nightly price is required".into()));
        }

        let images: Vec<UploadFile> = draft
            .images
            .iter()
            .enumerate()
            .filter_map(|(i, src)| src.to_upload_file(&format!("image-{i}.jpg")))
            .collect();
        let documents: Vec<UploadFile> = draft
            .legal_documents
            .documents
            .iter()
            .enumerate()
            .filter_map(|(i, src)| src.to_upload_file(&format!("document-{i}.pdf")))
            .collect();
        let document_metadata = documents
            .iter()
            .map(|file| DocumentMetadata {
                document_type: "LEGAL_DOCUMENT".into(),
                role: draft.legal_documents.role.clone(),
                name: file.name.clone(),
            })
            .collect();

        let submission = ApartmentSubmission {
            basic_info: SubmissionBasicInfo {
                title: draft.basic_info.title.clone(),
                apartment_type: draft.basic_info.apartment_type.clone(),
                town: draft.basic_info.town.clone(),
                state: draft.basic_info.state.clone(),
                price: draft.pricing.price,
            },
            details: SubmissionDetails {
                bedrooms: draft.details.bedrooms,
                bathrooms: draft.details.bathrooms,
                parking_space: draft.details.parking_space.clone(),
                guest_number: draft.details.guest_number.clone(),
                electricity: draft.details.electricity.clone(),
                kitchen_size: draft.details.kitchen_size.clone(),
                description: draft.details.description.clone(),
            },
            facilities: draft.facilities.clone(),
            house_rules: draft.house_rules.clone(),
            security_deposit: (draft.security_deposit.amount > 0).then(|| SubmissionDeposit {
                amount: draft.security_deposit.amount,
            }),
            legal_documents: (!draft.legal_documents.role.is_empty()).then(|| {
                SubmissionLegalRole {
                    role: draft.legal_documents.role.clone(),
                }
            }),
            document_metadata,
        };

        let api = &self.inner.api;
        let dto = match (draft.is_editing, draft.existing_apartment_id.as_deref()) {
            (true, Some(id)) => {
                api.update_apartment(id, &submission, &images, &documents)
                    .await?
            }
            _ => api.create_apartment(&submission, &images, &documents).await?,
        };

        let apartment = Apartment::from(dto);
        self.inner.store.upsert_apartment(apartment.clone());
        self.reset_apartment_draft().await;
        info!(apartment_id = %apartment.id, "listing submitted");
        Ok(apartment)
    }

    // ── Host profile draft ───────────────────────────────────────────

    pub async fn host_profile_draft(&self) -> HostProfileDraft {
        self.inner.host_profile_draft.lock().await.clone()
    }

    pub async fn update_host_profile_draft(&self, update: HostProfileUpdate) -> HostProfileDraft {
        let mut guard = self.inner.host_profile_draft.lock().await;
        let next = guard.apply(update);
        *guard = next.clone();
        self.inner.drafts.save_host_profile(&next);
        next
    }

    pub async fn reset_host_profile_draft(&self) {
        *self.inner.host_profile_draft.lock().await = HostProfileDraft::default();
        self.inner.drafts.clear_host_profile();
    }

    /// Submit the host profile draft. Documents without uploadable
    /// bytes (plain URLs, missing sources) are skipped with a warning.
    pub async fn submit_host_profile(&self) -> Result<Arc<User>, CoreError> {
        let draft = self.inner.host_profile_draft.lock().await.clone();

        if draft.banking_info.bank_name.trim().is_empty()
            || draft.banking_info.account_no.trim().is_empty()
        {
            return Err(CoreError::Validation(
                "bank name and account number are required".into(),
            ));
        }

        let banking = letora_api::BankDetails {
            bank_name: draft.banking_info.bank_name.clone(),
            account_no: draft.banking_info.account_no.clone(),
            account_name: None,
        };

        let mut documents: Vec<(String, UploadFile)> = Vec::new();
        for doc in &draft.verification_documents {
            let fallback = if doc.name.is_empty() {
                format!("{}.jpg", doc.doc_type.to_ascii_lowercase())
            } else {
                doc.name.clone()
            };
            match doc.source.as_ref().and_then(|s| s.to_upload_file(&fallback)) {
                Some(file) => documents.push((doc.doc_type.clone(), file)),
                None => {
                    warn!(document_id = %doc.id, doc_type = %doc.doc_type,
                        "verification document has no uploadable payload, skipping");
                }
            }
        }
        if documents.is_empty() {
            return Err(CoreError::Validation(
                "at least one verification document is required".into(),
            ));
        }

        let dto = self
            .inner
            .api
            .create_host_profile(&banking, &documents)
            .await?;
        let user = Arc::new(User::from(dto));
        self.inner.store.set_user(Some(Arc::clone(&user)));
        self.reset_host_profile_draft().await;
        info!(user_id = %user.id, "host profile created");
        Ok(user)
    }

    // ── Booking ──────────────────────────────────────────────────────

    /// Begin a booking for an apartment, resolving price and deposit
    /// from the store (or the backend when not yet cached).
    pub async fn start_booking(&self, apartment_id: &str) -> Result<BookingData, CoreError> {
        let apartment = self.apartment(apartment_id).await?;
        let mut booking = self.inner.booking.lock().await;
        booking.clear();
        booking.set_apartment_details(&apartment.id, apartment.price, apartment.security_deposit);
        Ok(booking.clone())
    }

    pub async fn set_booking_dates(
        &self,
        checkin: Option<chrono::DateTime<chrono::Utc>>,
        checkout: Option<chrono::DateTime<chrono::Utc>>,
    ) -> BookingData {
        let mut booking = self.inner.booking.lock().await;
        booking.set_booking_dates(checkin, checkout);
        booking.clone()
    }

    /// Merge a bulk patch onto the booking's input fields. Fees are
    /// not recomputed here; call [`Self::calculate_booking_fees`].
    pub async fn update_booking(&self, patch: BookingPatch) -> BookingData {
        let mut booking = self.inner.booking.lock().await;
        booking.update(patch);
        booking.clone()
    }

    /// Recompute derived fees from the current booking state.
    pub async fn calculate_booking_fees(&self) -> BookingData {
        let mut booking = self.inner.booking.lock().await;
        booking.calculate_fees();
        booking.clone()
    }

    pub async fn booking_summary(&self) -> BookingSummary {
        self.inner.booking.lock().await.summary()
    }

    pub async fn clear_booking(&self) {
        self.inner.booking.lock().await.clear();
    }

    // ── Search history ───────────────────────────────────────────────

    fn current_user_id(&self) -> Option<String> {
        self.inner.store.user().map(|u| u.id.clone())
    }

    /// The current user's recent searches, newest first.
    pub fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.inner.searches.load(self.current_user_id().as_deref())
    }

    /// Record a completed search against the current user (or the
    /// anonymous bucket when logged out).
    pub fn record_search(&self, term: &str, results: &[Apartment]) -> Vec<SearchHistoryEntry> {
        let ids = results.iter().map(|a| a.id.clone()).collect();
        self.inner
            .searches
            .record(self.current_user_id().as_deref(), term, ids)
    }

    pub fn remove_search_entry(&self, entry_id: &str) -> Vec<SearchHistoryEntry> {
        self.inner
            .searches
            .remove(self.current_user_id().as_deref(), entry_id)
    }

    pub fn clear_search_history(&self) {
        self.inner.searches.clear(self.current_user_id().as_deref());
    }

    // ── Favorites ────────────────────────────────────────────────────

    /// Toggle a favorite. Concurrent toggles for the same apartment
    /// coalesce into a single request; see [`crate::sync`].
    pub async fn toggle_favorite(&self, apartment_id: &str) -> Result<ToggleOutcome, CoreError> {
        self.inner
            .favorites
            .toggle(&self.inner.api, &self.inner.store, apartment_id)
            .await
    }

    pub fn is_favorite(&self, apartment_id: &str) -> bool {
        self.inner.store.is_favorite(apartment_id)
    }

    pub fn is_favorite_pending(&self, apartment_id: &str) -> bool {
        self.inner.store.is_favorite_pending(apartment_id)
    }

    // ── Notifications ────────────────────────────────────────────────

    pub async fn refresh_notifications(&self) -> Result<(), CoreError> {
        let items = self.inner.api.list_notifications().await?;
        self.inner
            .store
            .apply_notifications(items.into_iter().map(Notification::from).collect());
        Ok(())
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), CoreError> {
        sync::mark_notification_read(&self.inner.api, &self.inner.store, notification_id).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), CoreError> {
        sync::mark_all_notifications_read(&self.inner.api, &self.inner.store).await
    }

    pub async fn delete_notification(&self, notification_id: &str) -> Result<(), CoreError> {
        sync::delete_notification(&self.inner.api, &self.inner.store, notification_id).await
    }

    // ── Profile updates ──────────────────────────────────────────────

    pub async fn update_profile(&self, fields: &Value) -> Result<Arc<User>, CoreError> {
        let dto = self.inner.api.update_profile(fields).await?;
        let user = Arc::new(User::from(dto));
        self.inner.store.set_user(Some(Arc::clone(&user)));
        Ok(user)
    }
}
