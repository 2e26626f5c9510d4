// ── Draft persistence and pure update logic ──

pub mod apartment;
pub mod host_profile;
pub mod storage;
pub mod store;

pub use apartment::{
    ApartmentDraft, ApartmentDraftUpdate, BasicInfo, BasicInfoPatch, Details, DetailsPatch,
    LegalDocuments, Pricing, SecurityDeposit,
};
pub use host_profile::{
    BankingInfo, BankingInfoPatch, DocumentPatch, HostProfileDraft, HostProfileUpdate,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{APARTMENT_DRAFT_KEY, DraftStore, HOST_PROFILE_DRAFT_KEY};
