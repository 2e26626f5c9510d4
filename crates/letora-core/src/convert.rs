// ── API-to-domain type conversions ──
//
// Bridges raw `letora_api` response types into canonical
// `letora_core::model` domain types. Each `From` impl normalizes
// field names, parses strings into strong types, and fills sensible
// defaults for missing optional data.

use std::collections::HashSet;
use std::str::FromStr;

use letora_api::{ApartmentDto, DocumentDto, NotificationDto, UserDto};

use crate::media::MediaSource;
use crate::model::{
    Apartment, DocumentStatus, ListingStatus, Location, Notification, Role, User,
    VerificationDocument,
};

/// Parse an optional enum-ish string, falling back to the type's
/// default for unknown or missing values.
fn parse_or_default<T: FromStr + Default>(raw: Option<&String>) -> T {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

impl From<ApartmentDto> for Apartment {
    fn from(dto: ApartmentDto) -> Self {
        let images = dto
            .images
            .iter()
            .filter_map(MediaSource::ingest)
            .collect();

        Self {
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            apartment_type: parse_or_default(dto.apartment_type.as_ref()),
            location: Location {
                state: dto.state.unwrap_or_default(),
                town: dto.town.unwrap_or_default(),
            },
            price: dto.price.unwrap_or_default(),
            security_deposit: dto.security_deposit.unwrap_or_default(),
            bedrooms: dto.bedrooms.unwrap_or_default(),
            bathrooms: dto.bathrooms.unwrap_or_default(),
            guest_number: dto.guest_number,
            parking_space: dto.parking_space,
            kitchen_size: dto.kitchen_size,
            electricity: dto.electricity,
            description: dto.description,
            facilities: dto.facilities,
            house_rules: dto.house_rules,
            images,
            status: parse_or_default::<ListingStatus>(dto.status.as_ref()),
            host_id: dto.host_id,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        // Favorites arrive either as bare apartment-id links or with
        // the apartment embedded.
        let favorite_ids: HashSet<String> = dto
            .favorites
            .iter()
            .filter_map(|fav| {
                fav.apartment_id
                    .clone()
                    .or_else(|| fav.apartment.as_ref().map(|a| a.id.clone()))
            })
            .collect();

        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            role: parse_or_default::<Role>(dto.role.as_ref()),
            profile_pic: dto.profile_pic,
            state_origin: dto.state_origin,
            town_origin: dto.town_origin,
            favorite_ids,
            documents: dto.documents.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DocumentDto> for VerificationDocument {
    fn from(dto: DocumentDto) -> Self {
        Self {
            id: dto.id,
            doc_type: dto.document_type.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            size: None,
            file_type: None,
            source: dto.url.filter(|u| !u.is_empty()).map(MediaSource::Url),
            status: parse_or_default::<DocumentStatus>(dto.status.as_ref()),
            uploaded_at: dto.uploaded_at,
        }
    }
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            message: dto.message,
            kind: dto.notification_type,
            is_read: dto.is_read,
            created_at: dto.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apartment_images_are_ingested_and_filtered() {
        let dto = ApartmentDto {
            id: "a1".into(),
            images: vec![
                json!("https://cdn.example.com/a.jpg"),
                json!({"secure_url": "https://cdn.example.com/b.jpg"}),
                json!(null),
                json!({"caption": "no url here"}),
            ],
            ..ApartmentDto::default()
        };

        let apartment = Apartment::from(dto);
        assert_eq!(apartment.images.len(), 2);
    }

    #[test]
    fn unknown_status_defaults_to_unknown() {
        let dto = ApartmentDto {
            id: "a1".into(),
            status: Some("SOMETHING_NEW".into()),
            ..ApartmentDto::default()
        };
        assert_eq!(Apartment::from(dto).status, ListingStatus::Unknown);
    }

    #[test]
    fn status_parses_case_insensitively() {
        let dto = ApartmentDto {
            id: "a1".into(),
            status: Some("approved".into()),
            ..ApartmentDto::default()
        };
        assert_eq!(Apartment::from(dto).status, ListingStatus::Approved);
    }

    #[test]
    fn favorites_collect_both_link_shapes() {
        let dto = UserDto {
            id: "u1".into(),
            favorites: vec![
                letora_api::FavoriteDto {
                    apartment_id: Some("a1".into()),
                    ..letora_api::FavoriteDto::default()
                },
                letora_api::FavoriteDto {
                    apartment: Some(ApartmentDto {
                        id: "a2".into(),
                        ..ApartmentDto::default()
                    }),
                    ..letora_api::FavoriteDto::default()
                },
            ],
            ..UserDto::default()
        };

        let user = User::from(dto);
        assert!(user.is_favorite("a1"));
        assert!(user.is_favorite("a2"));
        assert!(!user.is_favorite("a3"));
    }

    #[test]
    fn host_role_parses() {
        let dto = UserDto {
            id: "u1".into(),
            role: Some("HOST".into()),
            ..UserDto::default()
        };
        assert_eq!(User::from(dto).role, Role::Host);
    }
}
