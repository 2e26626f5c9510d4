// ── Reactive data store ──
//
// Holds the canonical client-side view of backend state: listings,
// the authenticated user, notifications, and transient per-entity
// sync flags. Consumers read snapshots or subscribe to watch
// channels; all writes come from the `Session` facade.

pub(crate) mod collection;
mod refresh;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use collection::EntityCollection;
pub(crate) use refresh::RefreshSnapshot;

use crate::model::{Apartment, Notification, User};

pub struct DataStore {
    pub(crate) apartments: EntityCollection<Apartment>,
    pub(crate) notifications: EntityCollection<Notification>,

    user: watch::Sender<Option<Arc<User>>>,

    /// Ordered id lists for the curated browse sections; entities live
    /// in `apartments`.
    hot_ids: watch::Sender<Arc<Vec<String>>>,
    nearby_ids: watch::Sender<Arc<Vec<String>>>,

    /// Apartment ids with a favorite toggle currently in flight.
    /// Drives per-entity loading indicators.
    favorite_pending: watch::Sender<Arc<HashSet<String>>>,

    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        let (hot_ids, _) = watch::channel(Arc::new(Vec::new()));
        let (nearby_ids, _) = watch::channel(Arc::new(Vec::new()));
        let (favorite_pending, _) = watch::channel(Arc::new(HashSet::new()));
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            apartments: EntityCollection::new(),
            notifications: EntityCollection::new(),
            user,
            hot_ids,
            nearby_ids,
            favorite_pending,
            last_full_refresh,
        }
    }

    // ── Apartments ───────────────────────────────────────────────────

    pub fn apartment(&self, id: &str) -> Option<Arc<Apartment>> {
        self.apartments.get(id)
    }

    pub fn apartments(&self) -> Arc<Vec<Arc<Apartment>>> {
        self.apartments.snapshot()
    }

    pub fn subscribe_apartments(&self) -> watch::Receiver<Arc<Vec<Arc<Apartment>>>> {
        self.apartments.subscribe()
    }

    pub fn upsert_apartment(&self, apartment: Apartment) {
        self.apartments.upsert(apartment.id.clone(), apartment);
    }

    pub fn apartment_count(&self) -> usize {
        self.apartments.len()
    }

    /// Trending listings, in backend order.
    pub fn hot_apartments(&self) -> Vec<Arc<Apartment>> {
        self.resolve_ids(&self.hot_ids.borrow())
    }

    /// Listings near the user's registered location, in backend order.
    pub fn nearby_apartments(&self) -> Vec<Arc<Apartment>> {
        self.resolve_ids(&self.nearby_ids.borrow())
    }

    fn resolve_ids(&self, ids: &[String]) -> Vec<Arc<Apartment>> {
        ids.iter().filter_map(|id| self.apartments.get(id)).collect()
    }

    // ── User ─────────────────────────────────────────────────────────

    pub fn user(&self) -> Option<Arc<User>> {
        self.user.borrow().clone()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<Arc<User>>> {
        self.user.subscribe()
    }

    pub fn set_user(&self, user: Option<Arc<User>>) {
        self.user.send_replace(user);
    }

    /// The user's favorite apartment ids, empty when logged out.
    pub fn favorite_ids(&self) -> HashSet<String> {
        self.user()
            .map(|u| u.favorite_ids.clone())
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, apartment_id: &str) -> bool {
        self.user()
            .is_some_and(|u| u.is_favorite(apartment_id))
    }

    // ── Favorite toggle in-flight flags ──────────────────────────────

    pub fn is_favorite_pending(&self, apartment_id: &str) -> bool {
        self.favorite_pending.borrow().contains(apartment_id)
    }

    pub fn subscribe_favorite_pending(&self) -> watch::Receiver<Arc<HashSet<String>>> {
        self.favorite_pending.subscribe()
    }

    pub(crate) fn set_favorite_pending(&self, apartment_id: &str, pending: bool) {
        self.favorite_pending.send_modify(|set| {
            let mut next = HashSet::clone(set);
            if pending {
                next.insert(apartment_id.to_owned());
            } else {
                next.remove(apartment_id);
            }
            *set = Arc::new(next);
        });
    }

    // ── Notifications ────────────────────────────────────────────────

    pub fn notifications(&self) -> Arc<Vec<Arc<Notification>>> {
        self.notifications.snapshot()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Arc<Vec<Arc<Notification>>>> {
        self.notifications.subscribe()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .snapshot()
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    /// Patch one notification's read flag in place.
    pub(crate) fn mark_notification_read(&self, id: &str) {
        if let Some(existing) = self.notifications.get(id) {
            let mut updated = Notification::clone(&existing);
            updated.is_read = true;
            self.notifications.upsert(id.to_owned(), updated);
        }
    }

    pub(crate) fn mark_all_notifications_read(&self) {
        for id in self.notifications.ids() {
            self.mark_notification_read(&id);
        }
    }

    pub(crate) fn remove_notification(&self, id: &str) {
        self.notifications.remove(id);
    }

    // ── Refresh metadata ─────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    pub(crate) fn set_hot_ids(&self, ids: Vec<String>) {
        self.hot_ids.send_replace(Arc::new(ids));
    }

    pub(crate) fn set_nearby_ids(&self, ids: Vec<String>) {
        self.nearby_ids.send_replace(Arc::new(ids));
    }

    /// Drop everything tied to the authenticated session.
    pub(crate) fn clear_session_state(&self) {
        self.set_user(None);
        for id in self.notifications.ids() {
            self.notifications.remove(&id);
        }
        self.favorite_pending.send_replace(Arc::new(HashSet::new()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::user::User;

    fn apartment(id: &str, title: &str) -> Apartment {
        Apartment {
            id: id.into(),
            title: title.into(),
            apartment_type: crate::model::ApartmentType::default(),
            location: crate::model::Location::default(),
            price: 10_000,
            security_deposit: 0,
            bedrooms: 1,
            bathrooms: 1,
            guest_number: None,
            parking_space: None,
            kitchen_size: None,
            electricity: None,
            description: None,
            facilities: vec![],
            house_rules: vec![],
            images: vec![],
            status: crate::model::ListingStatus::Approved,
            host_id: None,
        }
    }

    #[test]
    fn hot_list_resolves_through_apartments() {
        let store = DataStore::new();
        store.upsert_apartment(apartment("a1", "First"));
        store.upsert_apartment(apartment("a2", "Second"));
        store.set_hot_ids(vec!["a2".into(), "a1".into(), "missing".into()]);

        let hot = store.hot_apartments();
        assert_eq!(hot.len(), 2);
        assert_eq!(hot[0].id, "a2");
        assert_eq!(hot[1].id, "a1");
    }

    #[test]
    fn favorite_pending_flags_toggle() {
        let store = DataStore::new();
        assert!(!store.is_favorite_pending("a1"));

        store.set_favorite_pending("a1", true);
        assert!(store.is_favorite_pending("a1"));

        store.set_favorite_pending("a1", false);
        assert!(!store.is_favorite_pending("a1"));
    }

    #[test]
    fn mark_notification_read_patches_in_place() {
        let store = DataStore::new();
        store.notifications.upsert(
            "n1".into(),
            Notification {
                id: "n1".into(),
                title: "Booking confirmed".into(),
                is_read: false,
                ..Notification::default()
            },
        );

        store.mark_notification_read("n1");
        assert!(store.notifications.get("n1").unwrap().is_read);
        assert_eq!(store.unread_count(), 0);

        // Unknown id is a no-op.
        store.mark_notification_read("n2");
    }

    #[test]
    fn clear_session_state_drops_user_and_notifications() {
        let store = DataStore::new();
        store.set_user(Some(Arc::new(User {
            id: "u1".into(),
            ..User::default()
        })));
        store.notifications.upsert(
            "n1".into(),
            Notification {
                id: "n1".into(),
                ..Notification::default()
            },
        );

        store.clear_session_state();
        assert!(store.user().is_none());
        assert!(store.notifications().is_empty());
    }
}
