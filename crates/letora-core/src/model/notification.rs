// ── Notification domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}
