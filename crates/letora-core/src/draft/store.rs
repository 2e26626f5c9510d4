// ── Persistent draft store ──
//
// Bridges the in-memory drafts to on-device key-value storage.
// Loads never fail: a missing or corrupt entry yields the default
// draft. Saves degrade: full draft first, then an essential subset on
// quota failure, then log-and-swallow.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::apartment::{ApartmentDraft, BasicInfo, Details, Pricing, SecurityDeposit};
use super::host_profile::{BankingInfo, HostProfileDraft};
use super::storage::{KeyValueStorage, StorageError};
use crate::media::MediaSource;

pub const APARTMENT_DRAFT_KEY: &str = "apartmentDraft";
pub const HOST_PROFILE_DRAFT_KEY: &str = "hostProfileDraft";

/// Quota-fallback subset of the apartment draft: the fields a user
/// would most resent re-typing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EssentialApartmentDraft<'a> {
    basic_info: &'a BasicInfo,
    details: &'a Details,
    facilities: &'a [String],
    pricing: &'a Pricing,
    security_deposit: &'a SecurityDeposit,
    current_step: u8,
}

/// Quota-fallback subset of the host profile draft.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EssentialHostProfileDraft<'a> {
    banking_info: &'a BankingInfo,
    current_step: u8,
}

#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    // ── Apartment draft ──────────────────────────────────────────────

    /// Load the apartment draft, or the default when nothing usable is
    /// stored. Never errors.
    pub fn load_apartment(&self) -> ApartmentDraft {
        self.load_or_default(APARTMENT_DRAFT_KEY)
    }

    /// Persist the apartment draft. `images` is already excluded by
    /// the draft's serialization. On quota failure, retries with the
    /// essential subset; a second failure is logged and swallowed.
    pub fn save_apartment(&self, draft: &ApartmentDraft) {
        let fallback = EssentialApartmentDraft {
            basic_info: &draft.basic_info,
            details: &draft.details,
            facilities: &draft.facilities,
            pricing: &draft.pricing,
            security_deposit: &draft.security_deposit,
            current_step: draft.current_step,
        };
        self.save_with_fallback(APARTMENT_DRAFT_KEY, draft, &fallback);
    }

    pub fn clear_apartment(&self) {
        self.clear(APARTMENT_DRAFT_KEY);
    }

    // ── Host profile draft ───────────────────────────────────────────

    pub fn load_host_profile(&self) -> HostProfileDraft {
        self.load_or_default(HOST_PROFILE_DRAFT_KEY)
    }

    /// Persist the host profile draft. Decoded file bytes in document
    /// sources are stripped first (same size constraint as apartment
    /// images); URL and data-URI sources survive the round-trip.
    pub fn save_host_profile(&self, draft: &HostProfileDraft) {
        let mut persisted = draft.clone();
        for doc in &mut persisted.verification_documents {
            if matches!(doc.source, Some(MediaSource::File(_))) {
                doc.source = None;
            }
        }
        let fallback = EssentialHostProfileDraft {
            banking_info: &draft.banking_info,
            current_step: draft.current_step,
        };
        self.save_with_fallback(HOST_PROFILE_DRAFT_KEY, &persisted, &fallback);
    }

    pub fn clear_host_profile(&self) {
        self.clear(HOST_PROFILE_DRAFT_KEY);
    }

    // ── Shared plumbing ──────────────────────────────────────────────

    fn load_or_default<T>(&self, key: &str) -> T
    where
        T: Default + serde::de::DeserializeOwned,
    {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, error = %err, "draft read failed, starting fresh");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(key, error = %err, "stored draft unparseable, starting fresh");
                T::default()
            }
        }
    }

    fn save_with_fallback<T: Serialize, E: Serialize>(&self, key: &str, full: &T, essential: &E) {
        match self.put_json(key, full) {
            Ok(()) => {}
            Err(err) => {
                warn!(key, error = %err, "full draft save failed, retrying with essential fields");
                if let Err(err) = self.put_json(key, essential) {
                    warn!(key, error = %err, "essential draft save failed, draft not persisted");
                }
            }
        }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;
        self.storage.put(key, &json)
    }

    fn clear(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            warn!(key, error = %err, "failed to clear stored draft");
        } else {
            debug!(key, "cleared stored draft");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::draft::apartment::{ApartmentDraftUpdate, BasicInfoPatch};
    use crate::draft::storage::MemoryStorage;

    fn store_with(storage: MemoryStorage) -> (DraftStore, Arc<MemoryStorage>) {
        let storage = Arc::new(storage);
        (DraftStore::new(storage.clone()), storage)
    }

    #[test]
    fn load_missing_returns_default() {
        let (store, _) = store_with(MemoryStorage::new());
        let draft = store.load_apartment();
        assert_eq!(draft, ApartmentDraft::default());
        assert_eq!(draft.current_step, 1);
    }

    #[test]
    fn load_corrupt_returns_default() {
        let (store, storage) = store_with(MemoryStorage::new());
        storage.put(APARTMENT_DRAFT_KEY, "{not json").unwrap();
        assert_eq!(store.load_apartment(), ApartmentDraft::default());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let (store, _) = store_with(MemoryStorage::new());
        let draft = ApartmentDraft::default()
            .apply(ApartmentDraftUpdate::BasicInfo(BasicInfoPatch {
                title: Some("Yaba Studio".into()),
                ..BasicInfoPatch::default()
            }))
            .apply(ApartmentDraftUpdate::Pricing { price: 12_000 })
            .apply(ApartmentDraftUpdate::Step(3));

        store.save_apartment(&draft);
        let restored = store.load_apartment();
        assert_eq!(restored.basic_info.title, "Yaba Studio");
        assert_eq!(restored.pricing.price, 12_000);
        assert_eq!(restored.current_step, 3);
    }

    #[test]
    fn quota_failure_falls_back_to_essential_subset() {
        // Big enough for the essential subset, too small for the full
        // draft once house rules pile up.
        let (store, storage) = store_with(MemoryStorage::with_quota(600));
        let mut draft = ApartmentDraft::default()
            .apply(ApartmentDraftUpdate::BasicInfo(BasicInfoPatch {
                title: Some("Surulere 2-Bed".into()),
                ..BasicInfoPatch::default()
            }))
            .apply(ApartmentDraftUpdate::Pricing { price: 30_000 });
        draft.house_rules = (0..50).map(|i| format!("house rule number {i}")).collect();

        store.save_apartment(&draft);

        let raw = storage.get(APARTMENT_DRAFT_KEY).unwrap().unwrap();
        assert!(raw.contains("Surulere 2-Bed"));
        assert!(!raw.contains("house rule number"));

        // Loading the essential subset still works via serde defaults.
        let restored = store.load_apartment();
        assert_eq!(restored.basic_info.title, "Surulere 2-Bed");
        assert!(restored.house_rules.is_empty());
    }

    #[test]
    fn double_quota_failure_is_swallowed() {
        let (store, storage) = store_with(MemoryStorage::with_quota(4));
        let draft = ApartmentDraft::default();

        // Must not panic or propagate.
        store.save_apartment(&draft);
        assert!(storage.get(APARTMENT_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_removes_entry() {
        let (store, storage) = store_with(MemoryStorage::new());
        store.save_apartment(&ApartmentDraft::default());
        assert!(storage.get(APARTMENT_DRAFT_KEY).unwrap().is_some());

        store.clear_apartment();
        assert!(storage.get(APARTMENT_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn host_profile_file_sources_are_stripped_on_save() {
        use crate::draft::host_profile::HostProfileUpdate;
        use crate::model::document::VerificationDocument;
        use letora_api::UploadFile;

        let (store, storage) = store_with(MemoryStorage::new());
        let draft = HostProfileDraft::default().apply(HostProfileUpdate::AddDocument {
            document: VerificationDocument {
                id: "d1".into(),
                doc_type: "ID_CARD".into(),
                name: "card.png".into(),
                source: Some(MediaSource::File(UploadFile {
                    name: "card.png".into(),
                    mime: "image/png".into(),
                    bytes: vec![0u8; 512],
                })),
                ..VerificationDocument::default()
            },
            replace: false,
        });

        store.save_host_profile(&draft);
        let raw = storage.get(HOST_PROFILE_DRAFT_KEY).unwrap().unwrap();
        assert!(!raw.contains("\"kind\":\"file\""));

        let restored = store.load_host_profile();
        assert_eq!(restored.verification_documents.len(), 1);
        assert!(restored.verification_documents[0].source.is_none());
    }
}
