// In-app notification endpoints.

use serde_json::{Value, json};

use crate::Error;
use crate::client::ApiClient;
use crate::types::NotificationDto;

impl ApiClient {
    /// List the authenticated user's notifications, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<NotificationDto>, Error> {
        self.get("api/notifications").await
    }

    /// Mark one notification as read.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Value, Error> {
        self.patch(
            &format!("api/notifications/{notification_id}/read"),
            &json!({}),
        )
        .await
    }

    /// Mark every notification as read.
    pub async fn mark_all_notifications_read(&self) -> Result<Value, Error> {
        self.patch("api/notifications/read-all", &json!({})).await
    }

    /// Delete one notification.
    pub async fn delete_notification(&self, notification_id: &str) -> Result<Value, Error> {
        self.delete(&format!("api/notifications/{notification_id}"))
            .await
    }
}
