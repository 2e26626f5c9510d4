// ── Full refresh application logic ──
//
// Applies a bulk listing/notification snapshot into the DataStore.

use std::collections::HashSet;

use chrono::Utc;

use super::DataStore;
use super::collection::EntityCollection;
use crate::model::{Apartment, Notification};

/// Upsert all incoming entities, then prune any existing ids not in
/// the incoming set. This avoids the brief empty state that a
/// clear-then-insert approach would cause.
fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: Vec<(String, T)>,
) {
    let incoming_ids: HashSet<String> = items.iter().map(|(id, _)| id.clone()).collect();
    for (id, entity) in items {
        collection.upsert(id, entity);
    }
    for existing_id in collection.ids() {
        if !incoming_ids.contains(&existing_id) {
            collection.remove(&existing_id);
        }
    }
}

/// Listing collections fetched during a single refresh cycle.
///
/// The hot and nearby lists are subsets of the approved list on a
/// well-behaved backend, but nothing assumes that: all three are
/// merged into the apartment collection. Notifications refresh
/// separately (they need authentication; listings don't).
pub(crate) struct RefreshSnapshot {
    pub approved: Vec<Apartment>,
    pub hot: Vec<Apartment>,
    pub nearby: Vec<Apartment>,
}

impl DataStore {
    /// Apply a full data refresh.
    ///
    /// Uses upsert-then-prune: incoming entities are upserted first,
    /// then ids not present in the incoming set are removed, so
    /// subscribers never observe a transiently empty store.
    pub(crate) fn apply_refresh_snapshot(&self, snap: RefreshSnapshot) {
        let hot_ids: Vec<String> = snap.hot.iter().map(|a| a.id.clone()).collect();
        let nearby_ids: Vec<String> = snap.nearby.iter().map(|a| a.id.clone()).collect();

        let mut merged: Vec<(String, Apartment)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for apartment in snap
            .approved
            .into_iter()
            .chain(snap.hot)
            .chain(snap.nearby)
        {
            if seen.insert(apartment.id.clone()) {
                merged.push((apartment.id.clone(), apartment));
            }
        }

        upsert_and_prune(&self.apartments, merged);
        self.set_hot_ids(hot_ids);
        self.set_nearby_ids(nearby_ids);

        self.last_full_refresh.send_replace(Some(Utc::now()));
    }

    /// Replace the notification collection with a fresh fetch.
    pub(crate) fn apply_notifications(&self, items: Vec<Notification>) {
        upsert_and_prune(
            &self.notifications,
            items.into_iter().map(|n| (n.id.clone(), n)).collect(),
        );
    }
}
