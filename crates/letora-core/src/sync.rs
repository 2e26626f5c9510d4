// ── Favorite / notification state synchronization ──
//
// Favorites use refetch-after-write: the toggle response's own
// `isFavorited` flag is shown only transiently, and authoritative
// state comes from a full profile refetch. Concurrent toggles for the
// same apartment are coalesced: the first caller becomes the leader
// and runs the request + refetch; later callers subscribe to the
// leader's broadcast and share its outcome.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use letora_api::ApiClient;

use crate::error::CoreError;
use crate::model::User;
use crate::store::DataStore;

/// Result of one favorite toggle, shared by every coalesced caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The server's post-toggle state. Transient: the profile refetch
    /// that already ran is the authoritative source.
    pub is_favorited: bool,
}

type ToggleResult = Result<ToggleOutcome, String>;

#[derive(Default)]
pub(crate) struct FavoriteSync {
    in_flight: DashMap<String, broadcast::Sender<ToggleResult>>,
}

impl FavoriteSync {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Toggle an apartment's favorite state.
    ///
    /// Exactly one request per apartment is in flight at a time. The
    /// per-entity pending flag in the store is set before the round
    /// trip and cleared unconditionally afterwards.
    pub(crate) async fn toggle(
        &self,
        api: &ApiClient,
        store: &DataStore,
        apartment_id: &str,
    ) -> Result<ToggleOutcome, CoreError> {
        if apartment_id.is_empty() {
            warn!("favorite toggle with no apartment id, ignoring");
            return Err(CoreError::Validation("missing apartment id".into()));
        }

        let sender = match self.in_flight.entry(apartment_id.to_owned()) {
            Entry::Occupied(entry) => {
                // Join the in-flight toggle instead of issuing another
                // request.
                let mut rx = entry.get().subscribe();
                drop(entry);
                debug!(apartment_id, "joining in-flight favorite toggle");
                return match rx.recv().await {
                    Ok(Ok(outcome)) => Ok(outcome),
                    Ok(Err(message)) => Err(CoreError::FavoriteSync(message)),
                    Err(_) => Err(CoreError::FavoriteSync("toggle dropped".into())),
                };
            }
            Entry::Vacant(entry) => {
                let (tx, _) = broadcast::channel(1);
                entry.insert(tx.clone());
                tx
            }
        };

        store.set_favorite_pending(apartment_id, true);
        let result = self.run_toggle(api, store, apartment_id).await;

        // Cleared regardless of outcome so the UI never sticks in a
        // loading state.
        store.set_favorite_pending(apartment_id, false);
        self.in_flight.remove(apartment_id);

        let shared: ToggleResult = match &result {
            Ok(outcome) => Ok(*outcome),
            Err(err) => Err(err.to_string()),
        };
        // No receivers just means nobody joined this toggle.
        let _ = sender.send(shared);

        result
    }

    async fn run_toggle(
        &self,
        api: &ApiClient,
        store: &DataStore,
        apartment_id: &str,
    ) -> Result<ToggleOutcome, CoreError> {
        let response = api.toggle_favorite(apartment_id).await?;

        // Refetch-after-write: the profile is the source of truth for
        // favorite state, not the toggle response.
        match api.get_profile().await {
            Ok(profile) => {
                store.set_user(Some(Arc::new(User::from(profile))));
            }
            Err(err) => {
                warn!(apartment_id, error = %err,
                    "profile refetch after favorite toggle failed, local state may be stale");
            }
        }

        Ok(ToggleOutcome {
            is_favorited: response.is_favorited,
        })
    }
}

// ── Notification read-state ─────────────────────────────────────────

/// Mark one notification as read, patching local state only after the
/// backend accepts. On failure local state is untouched and the item
/// keeps showing unread.
pub(crate) async fn mark_notification_read(
    api: &ApiClient,
    store: &DataStore,
    notification_id: &str,
) -> Result<(), CoreError> {
    api.mark_notification_read(notification_id).await?;
    store.mark_notification_read(notification_id);
    Ok(())
}

pub(crate) async fn mark_all_notifications_read(
    api: &ApiClient,
    store: &DataStore,
) -> Result<(), CoreError> {
    api.mark_all_notifications_read().await?;
    store.mark_all_notifications_read();
    Ok(())
}

pub(crate) async fn delete_notification(
    api: &ApiClient,
    store: &DataStore,
    notification_id: &str,
) -> Result<(), CoreError> {
    api.delete_notification(notification_id).await?;
    store.remove_notification(notification_id);
    Ok(())
}
