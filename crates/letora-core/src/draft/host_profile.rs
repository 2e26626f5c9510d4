// ── Host profile draft ──
//
// Host onboarding form state: banking details plus a list of
// verification documents. Same pure-update discipline as the
// apartment draft.

use serde::{Deserialize, Serialize};

use crate::media::MediaSource;
use crate::model::document::{DocumentStatus, VerificationDocument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankingInfo {
    pub bank_name: String,
    pub account_no: String,
    pub account_balance: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostProfileDraft {
    pub banking_info: BankingInfo,
    pub verification_documents: Vec<VerificationDocument>,
    pub current_step: u8,
}

impl Default for HostProfileDraft {
    fn default() -> Self {
        Self {
            banking_info: BankingInfo::default(),
            verification_documents: Vec::new(),
            current_step: 1,
        }
    }
}

// ── Patches ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BankingInfoPatch {
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub account_balance: Option<u64>,
}

/// Partial update for one verification document.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub size: Option<u64>,
    pub file_type: Option<String>,
    pub source: Option<MediaSource>,
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone)]
pub enum HostProfileUpdate {
    BankingInfo(BankingInfoPatch),
    /// Replace the whole document list.
    ReplaceDocuments(Vec<VerificationDocument>),
    /// Append a document. With `replace` set, all existing documents
    /// of the same (normalized) type are removed first, leaving the
    /// new entry as the only one of its type.
    AddDocument {
        document: VerificationDocument,
        replace: bool,
    },
    /// Drop the document with this id. No-op when absent.
    RemoveDocument { id: String },
    /// Merge a patch onto the document with this id. No-op when absent.
    UpdateDocument { id: String, patch: DocumentPatch },
    Step(u8),
}

impl HostProfileDraft {
    /// Apply one update, returning the new draft. The receiver is
    /// never modified.
    #[must_use]
    pub fn apply(&self, update: HostProfileUpdate) -> Self {
        let mut next = self.clone();
        match update {
            HostProfileUpdate::BankingInfo(patch) => {
                if let Some(v) = patch.bank_name {
                    next.banking_info.bank_name = v;
                }
                if let Some(v) = patch.account_no {
                    next.banking_info.account_no = v;
                }
                if let Some(v) = patch.account_balance {
                    next.banking_info.account_balance = v;
                }
            }
            HostProfileUpdate::ReplaceDocuments(documents) => {
                next.verification_documents = documents;
            }
            HostProfileUpdate::AddDocument { document, replace } => {
                if replace {
                    next.verification_documents
                        .retain(|existing| !existing.matches_type(&document.doc_type));
                }
                next.verification_documents.push(document);
            }
            HostProfileUpdate::RemoveDocument { id } => {
                next.verification_documents.retain(|doc| doc.id != id);
            }
            HostProfileUpdate::UpdateDocument { id, patch } => {
                if let Some(doc) = next
                    .verification_documents
                    .iter_mut()
                    .find(|doc| doc.id == id)
                {
                    if let Some(v) = patch.name {
                        doc.name = v;
                    }
                    if let Some(v) = patch.size {
                        doc.size = Some(v);
                    }
                    if let Some(v) = patch.file_type {
                        doc.file_type = Some(v);
                    }
                    if let Some(v) = patch.source {
                        doc.source = Some(v);
                    }
                    if let Some(v) = patch.status {
                        doc.status = v;
                    }
                }
            }
            HostProfileUpdate::Step(step) => next.current_step = step,
        }
        next
    }
}
