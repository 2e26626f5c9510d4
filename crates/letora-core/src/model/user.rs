// ── User domain types ──

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::document::VerificationDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum Role {
    #[default]
    Guest,
    Host,
    Admin,
}

/// The authenticated user, as held by the data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub profile_pic: Option<String>,
    pub state_origin: Option<String>,
    pub town_origin: Option<String>,

    /// Apartment ids the user has favorited. Authoritative copy --
    /// rebuilt from the profile on every refetch.
    pub favorite_ids: HashSet<String>,

    pub documents: Vec<VerificationDocument>,
}

impl User {
    pub fn is_favorite(&self, apartment_id: &str) -> bool {
        self.favorite_ids.contains(apartment_id)
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone().unwrap_or_default(),
        }
    }
}
