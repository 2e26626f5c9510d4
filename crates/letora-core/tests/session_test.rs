#![allow(clippy::unwrap_used)]
// End-to-end tests for the `Session` facade against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use letora_api::ApiClient;
use letora_core::draft::{ApartmentDraftUpdate, BasicInfoPatch, HostProfileUpdate};
use letora_core::model::VerificationDocument;
use letora_core::{MediaSource, MemoryStorage, Session};

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), base_url);
    let session = Session::new(api, Arc::new(MemoryStorage::new()));
    (server, session)
}

fn ok_data(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

async fn login(server: &MockServer, session: &Session) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok_data(json!({
            "accessToken": "acc",
            "refreshToken": "ref",
            "user": {
                "id": "u1",
                "firstName": "Ada",
                "stateOrigin": "Lagos",
                "townOrigin": "Lekki",
                "favorites": []
            }
        })))
        .mount(server)
        .await;

    let password = SecretString::from("hunter2".to_owned());
    session.login("ada@example.com", &password).await.unwrap();
}

// ── Listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_listings_populates_store_sections() {
    let (server, session) = setup().await;
    login(&server, &session).await;

    Mock::given(method("GET"))
        .and(path("/apartments/approved"))
        .respond_with(ok_data(json!([
            { "id": "a1", "title": "Lekki Mini Flat", "price": 20000, "status": "APPROVED" },
            { "id": "a2", "title": "Ikeja Duplex", "price": 85000, "status": "APPROVED" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apartments/hot"))
        .respond_with(ok_data(json!([
            { "id": "a2", "title": "Ikeja Duplex", "price": 85000 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apartments/nearby"))
        .respond_with(ok_data(json!([
            { "id": "a3", "title": "Lekki Studio", "price": 15000 }
        ])))
        .mount(&server)
        .await;

    session.refresh_listings().await.unwrap();

    let store = session.store();
    assert_eq!(store.apartment_count(), 3);
    assert_eq!(store.hot_apartments().len(), 1);
    assert_eq!(store.hot_apartments()[0].id, "a2");
    assert_eq!(store.nearby_apartments().len(), 1);
    assert!(store.last_full_refresh().is_some());
}

#[tokio::test]
async fn hot_listing_failure_degrades_to_empty() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apartments/approved"))
        .respond_with(ok_data(json!([
            { "id": "a1", "title": "Lekki Mini Flat", "price": 20000 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apartments/hot"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    // Not logged in: nearby is skipped entirely.
    session.refresh_listings().await.unwrap();

    let store = session.store();
    assert_eq!(store.apartment_count(), 1);
    assert!(store.hot_apartments().is_empty());
    assert!(store.nearby_apartments().is_empty());
}

#[tokio::test]
async fn approved_listing_failure_is_fatal() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apartments/approved"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apartments/hot"))
        .respond_with(ok_data(json!([])))
        .mount(&server)
        .await;

    assert!(session.refresh_listings().await.is_err());
}

// ── Favorites ───────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_toggles_coalesce_into_one_request() {
    let (server, session) = setup().await;
    login(&server, &session).await;

    // Slow toggle so the second caller overlaps the first.
    Mock::given(method("POST"))
        .and(path("/api/users/favorites/a1/toggle"))
        .respond_with(
            ok_data(json!({ "isFavorited": true }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ok_data(json!({
            "id": "u1",
            "favorites": [{ "apartmentId": "a1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_favorite("a1").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.is_favorite_pending("a1"));

    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.toggle_favorite("a1").await })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert!(first.is_favorited);
    assert_eq!(first, second);

    // Authoritative state came from the profile refetch.
    assert!(session.is_favorite("a1"));
    assert!(!session.is_favorite_pending("a1"));
}

#[tokio::test]
async fn failed_toggle_clears_pending_flag() {
    let (server, session) = setup().await;
    login(&server, &session).await;

    Mock::given(method("POST"))
        .and(path("/api/users/favorites/a1/toggle"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert!(session.toggle_favorite("a1").await.is_err());
    assert!(!session.is_favorite_pending("a1"));
    assert!(!session.is_favorite("a1"));
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn mark_read_patches_local_state_only_on_success() {
    let (server, session) = setup().await;
    login(&server, &session).await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ok_data(json!([
            { "id": "n1", "title": "Booking confirmed", "isRead": false },
            { "id": "n2", "title": "Payout sent", "isRead": false }
        ])))
        .mount(&server)
        .await;
    session.refresh_notifications().await.unwrap();
    assert_eq!(session.store().unread_count(), 2);

    Mock::given(method("PATCH"))
        .and(path("/api/notifications/n1/read"))
        .respond_with(ok_data(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/n2/read"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    session.mark_notification_read("n1").await.unwrap();
    assert_eq!(session.store().unread_count(), 1);

    // Failure leaves the unread state visible.
    assert!(session.mark_notification_read("n2").await.is_err());
    assert_eq!(session.store().unread_count(), 1);
}

// ── Drafts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn draft_survives_session_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();

    {
        let api = ApiClient::with_client(reqwest::Client::new(), base_url.clone());
        let session = Session::new(api, storage.clone());
        session
            .update_apartment_draft(ApartmentDraftUpdate::BasicInfo(BasicInfoPatch {
                title: Some("Yaba Studio".into()),
                ..BasicInfoPatch::default()
            }))
            .await;
        session
            .update_apartment_draft(ApartmentDraftUpdate::Step(2))
            .await;
    }

    let api = ApiClient::with_client(reqwest::Client::new(), base_url);
    let session = Session::new(api, storage);
    let draft = session.apartment_draft().await;
    assert_eq!(draft.basic_info.title, "Yaba Studio");
    assert_eq!(draft.current_step, 2);
}

#[tokio::test]
async fn submit_apartment_clears_draft_and_stores_listing() {
    let (server, session) = setup().await;

    session
        .update_apartment_draft(ApartmentDraftUpdate::BasicInfo(BasicInfoPatch {
            title: Some("New Listing".into()),
            apartment_type: Some("MINI_FLAT".into()),
            state: Some("Lagos".into()),
            town: Some("Lekki".into()),
            ..BasicInfoPatch::default()
        }))
        .await;
    session
        .update_apartment_draft(ApartmentDraftUpdate::Pricing { price: 20_000 })
        .await;
    session
        .update_apartment_draft(ApartmentDraftUpdate::Images(vec![MediaSource::DataUri(
            "data:image/png;base64,aGVsbG8=".into(),
        )]))
        .await;

    Mock::given(method("POST"))
        .and(path("/apartments/create"))
        .respond_with(ok_data(json!({
            "id": "a9",
            "title": "New Listing",
            "price": 20000,
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let apartment = session.submit_apartment().await.unwrap();
    assert_eq!(apartment.id, "a9");
    assert!(session.store().apartment("a9").is_some());

    // Draft reset to defaults after submission.
    let draft = session.apartment_draft().await;
    assert_eq!(draft.current_step, 1);
    assert!(draft.basic_info.title.is_empty());

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|r| r.url.path() == "/apartments/create")
        .unwrap();
    let body = String::from_utf8_lossy(&create.body);
    assert!(body.contains("name=\"apartmentData\""));
    assert!(body.contains("name=\"images\""));
}

#[tokio::test]
async fn submit_apartment_without_title_is_rejected_locally() {
    let (_server, session) = setup().await;
    session
        .update_apartment_draft(ApartmentDraftUpdate::Pricing { price: 20_000 })
        .await;

    let result = session.submit_apartment().await;
    assert!(matches!(
        result,
        Err(letora_core::CoreError::Validation(_))
    ));
}

#[tokio::test]
async fn submit_host_profile_sends_documents_and_updates_user() {
    let (server, session) = setup().await;
    login(&server, &session).await;

    session
        .update_host_profile_draft(HostProfileUpdate::BankingInfo(
            letora_core::draft::BankingInfoPatch {
                bank_name: Some("GTBank".into()),
                account_no: Some("0123456789".into()),
                ..Default::default()
            },
        ))
        .await;
    session
        .update_host_profile_draft(HostProfileUpdate::AddDocument {
            document: VerificationDocument::new(
                "ID_CARD",
                "card.png",
                MediaSource::DataUri("data:image/png;base64,aGVsbG8=".into()),
            ),
            replace: true,
        })
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/host-profile"))
        .respond_with(ok_data(json!({
            "id": "u1",
            "role": "HOST",
            "favorites": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = session.submit_host_profile().await.unwrap();
    assert_eq!(user.role, letora_core::Role::Host);
    assert_eq!(
        session.store().user().unwrap().role,
        letora_core::Role::Host
    );

    // Draft cleared after success.
    let draft = session.host_profile_draft().await;
    assert!(draft.verification_documents.is_empty());
}

// ── Search history ──────────────────────────────────────────────────

#[tokio::test]
async fn search_history_is_scoped_to_the_logged_in_user() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apartments/search"))
        .respond_with(ok_data(json!([
            { "id": "a1", "title": "Lekki Mini Flat", "price": 20000 }
        ])))
        .mount(&server)
        .await;

    // Anonymous search before login.
    let results = session
        .search_apartments(&[("state", "Lagos".to_owned())])
        .await
        .unwrap();
    session.record_search("Lagos", &results);
    assert_eq!(session.search_history().len(), 1);
    assert_eq!(session.search_history()[0].search_term, "Lagos");

    // Logging in switches to the user's own (empty) bucket.
    login(&server, &session).await;
    assert!(session.search_history().is_empty());

    session.record_search("Lekki", &results);
    let entries = session.search_history();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].search_term, "Lekki");
    assert_eq!(entries[0].apartment_ids, vec!["a1".to_owned()]);
}

// ── Booking flow ────────────────────────────────────────────────────

#[tokio::test]
async fn booking_flow_resolves_price_from_backend() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apartments/a1"))
        .respond_with(ok_data(json!({
            "id": "a1",
            "title": "Lekki Mini Flat",
            "price": 20000,
            "securityDeposit": 5000
        })))
        .mount(&server)
        .await;

    session.start_booking("a1").await.unwrap();
    session
        .set_booking_dates(
            Some("2025-01-01T12:00:00Z".parse().unwrap()),
            Some("2025-01-04T12:00:00Z".parse().unwrap()),
        )
        .await;
    let booking = session.calculate_booking_fees().await;

    assert_eq!(booking.duration, 3);
    assert_eq!(booking.booking_fee, 60_000);
    assert_eq!(booking.total_amount, 67_500);
}
