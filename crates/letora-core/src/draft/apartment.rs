// ── Apartment listing draft ──
//
// The multi-step listing form's state. Section updates are pure:
// `apply` returns a new draft and never mutates the old one, so
// consumers can diff old against new for change detection.

use serde::{Deserialize, Serialize};

use crate::media::MediaSource;

/// Step-one fields of the listing form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub title: String,
    pub apartment_type: String,
    pub state: String,
    pub town: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Details {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking_space: String,
    pub guest_number: String,
    pub electricity: String,
    pub kitchen_size: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    /// Nightly price in currency minor units.
    pub price: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityDeposit {
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalDocuments {
    /// The lister's relationship to the property ("OWNER", "AGENT", ...).
    pub role: String,
    pub documents: Vec<MediaSource>,
}

/// The full in-progress listing draft.
///
/// `images` is memory-only: it is skipped during serialization so
/// persisted drafts stay within key-value storage size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApartmentDraft {
    pub basic_info: BasicInfo,
    pub details: Details,
    pub facilities: Vec<String>,
    #[serde(skip)]
    pub images: Vec<MediaSource>,
    pub pricing: Pricing,
    pub security_deposit: SecurityDeposit,
    pub house_rules: Vec<String>,
    pub legal_documents: LegalDocuments,
    pub is_editing: bool,
    pub existing_apartment_id: Option<String>,
    pub current_step: u8,
}

impl Default for ApartmentDraft {
    fn default() -> Self {
        Self {
            basic_info: BasicInfo::default(),
            details: Details::default(),
            facilities: Vec::new(),
            images: Vec::new(),
            pricing: Pricing::default(),
            security_deposit: SecurityDeposit::default(),
            house_rules: Vec::new(),
            legal_documents: LegalDocuments::default(),
            is_editing: false,
            existing_apartment_id: None,
            current_step: 1,
        }
    }
}

// ── Section patches ─────────────────────────────────────────────────

/// Partial update for [`BasicInfo`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BasicInfoPatch {
    pub title: Option<String>,
    pub apartment_type: Option<String>,
    pub state: Option<String>,
    pub town: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DetailsPatch {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub parking_space: Option<String>,
    pub guest_number: Option<String>,
    pub electricity: Option<String>,
    pub kitchen_size: Option<String>,
    pub description: Option<String>,
}

fn merge<T>(target: &mut T, patch: Option<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}

impl BasicInfoPatch {
    fn apply_to(self, section: &mut BasicInfo) {
        merge(&mut section.title, self.title);
        merge(&mut section.apartment_type, self.apartment_type);
        merge(&mut section.state, self.state);
        merge(&mut section.town, self.town);
    }
}

impl DetailsPatch {
    fn apply_to(self, section: &mut Details) {
        merge(&mut section.bedrooms, self.bedrooms);
        merge(&mut section.bathrooms, self.bathrooms);
        merge(&mut section.parking_space, self.parking_space);
        merge(&mut section.guest_number, self.guest_number);
        merge(&mut section.electricity, self.electricity);
        merge(&mut section.kitchen_size, self.kitchen_size);
        merge(&mut section.description, self.description);
    }
}

// ── Updates ─────────────────────────────────────────────────────────

/// One section update. Object sections shallow-merge; array sections
/// are replaced wholesale.
#[derive(Debug, Clone)]
pub enum ApartmentDraftUpdate {
    BasicInfo(BasicInfoPatch),
    Details(DetailsPatch),
    Pricing { price: u64 },
    SecurityDeposit { amount: u64 },
    Facilities(Vec<String>),
    Images(Vec<MediaSource>),
    HouseRules(Vec<String>),
    LegalRole(String),
    LegalDocumentList(Vec<MediaSource>),
    Step(u8),
    /// Switch the draft into edit mode for an existing listing.
    BeginEditing { apartment_id: String },
}

impl ApartmentDraft {
    /// Apply one update, returning the new draft. The receiver is
    /// never modified.
    #[must_use]
    pub fn apply(&self, update: ApartmentDraftUpdate) -> Self {
        let mut next = self.clone();
        match update {
            ApartmentDraftUpdate::BasicInfo(patch) => patch.apply_to(&mut next.basic_info),
            ApartmentDraftUpdate::Details(patch) => patch.apply_to(&mut next.details),
            ApartmentDraftUpdate::Pricing { price } => next.pricing.price = price,
            ApartmentDraftUpdate::SecurityDeposit { amount } => {
                next.security_deposit.amount = amount;
            }
            ApartmentDraftUpdate::Facilities(facilities) => next.facilities = facilities,
            ApartmentDraftUpdate::Images(images) => next.images = images,
            ApartmentDraftUpdate::HouseRules(rules) => next.house_rules = rules,
            ApartmentDraftUpdate::LegalRole(role) => next.legal_documents.role = role,
            ApartmentDraftUpdate::LegalDocumentList(documents) => {
                next.legal_documents.documents = documents;
            }
            ApartmentDraftUpdate::Step(step) => next.current_step = step,
            ApartmentDraftUpdate::BeginEditing { apartment_id } => {
                next.is_editing = true;
                next.existing_apartment_id = Some(apartment_id);
            }
        }
        next
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_starts_at_step_one() {
        let draft = ApartmentDraft::default();
        assert_eq!(draft.current_step, 1);
        assert!(!draft.is_editing);
        assert!(draft.images.is_empty());
    }

    #[test]
    fn basic_info_patch_preserves_siblings() {
        let draft = ApartmentDraft::default().apply(ApartmentDraftUpdate::BasicInfo(
            BasicInfoPatch {
                title: Some("Lekki Mini Flat".into()),
                state: Some("Lagos".into()),
                ..BasicInfoPatch::default()
            },
        ));

        let updated = draft.apply(ApartmentDraftUpdate::BasicInfo(BasicInfoPatch {
            town: Some("Lekki".into()),
            ..BasicInfoPatch::default()
        }));

        assert_eq!(updated.basic_info.title, "Lekki Mini Flat");
        assert_eq!(updated.basic_info.state, "Lagos");
        assert_eq!(updated.basic_info.town, "Lekki");
    }

    #[test]
    fn apply_never_mutates_the_receiver() {
        let original = ApartmentDraft::default();
        let _updated = original.apply(ApartmentDraftUpdate::Pricing { price: 20_000 });
        assert_eq!(original.pricing.price, 0);
    }

    #[test]
    fn array_sections_replace_wholesale() {
        let draft = ApartmentDraft::default()
            .apply(ApartmentDraftUpdate::Facilities(vec!["wifi".into(), "ac".into()]));
        let updated = draft.apply(ApartmentDraftUpdate::Facilities(vec!["pool".into()]));
        assert_eq!(updated.facilities, vec!["pool".to_owned()]);
    }

    #[test]
    fn images_are_not_serialized() {
        let draft = ApartmentDraft::default().apply(ApartmentDraftUpdate::Images(vec![
            MediaSource::Url("https://cdn.example.com/a.jpg".into()),
        ]));
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("cdn.example.com"));

        let restored: ApartmentDraft = serde_json::from_str(&json).unwrap();
        assert!(restored.images.is_empty());
    }

    #[test]
    fn begin_editing_records_listing_id() {
        let draft = ApartmentDraft::default().apply(ApartmentDraftUpdate::BeginEditing {
            apartment_id: "a1".into(),
        });
        assert!(draft.is_editing);
        assert_eq!(draft.existing_apartment_id.as_deref(), Some("a1"));
    }
}
