// ── Apartment domain types ──

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::media::MediaSource;

/// Listing category -- normalized from the backend's free-form
/// `apartmentType` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum ApartmentType {
    Studio,
    MiniFlat,
    OneBedroom,
    TwoBedroom,
    Duplex,
    Bungalow,
    #[default]
    Unspecified,
}

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
    #[default]
    Unknown,
}

impl ListingStatus {
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub town: String,
}

/// The canonical apartment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apartment {
    pub id: String,
    pub title: String,
    pub apartment_type: ApartmentType,
    pub location: Location,

    /// Nightly price in currency minor units.
    pub price: u64,
    pub security_deposit: u64,

    pub bedrooms: u32,
    pub bathrooms: u32,
    pub guest_number: Option<String>,
    pub parking_space: Option<String>,
    pub kitchen_size: Option<String>,
    pub electricity: Option<String>,
    pub description: Option<String>,

    pub facilities: Vec<String>,
    pub house_rules: Vec<String>,

    /// Already-ingested media. Display code goes through
    /// [`crate::media::display_urls`], which substitutes a placeholder
    /// when this is empty.
    pub images: Vec<MediaSource>,

    pub status: ListingStatus,
    pub host_id: Option<String>,
}
