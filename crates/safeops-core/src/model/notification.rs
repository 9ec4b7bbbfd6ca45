// ── Notification domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An in-app notification row.
///
/// `kind` is `"type"` on the wire; a fixed vocabulary is not enforced —
/// `"raw_submitted"` is the one the submission flow writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a notification.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<Uuid>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_travels_as_type() {
        let new = NewNotification {
            user_id: Uuid::nil(),
            title: "RAW Submitted".into(),
            message: "submitted for approval".into(),
            kind: "raw_submitted".into(),
            related_id: None,
        };
        let body = serde_json::to_value(&new).unwrap();
        assert_eq!(body["type"], "raw_submitted");
        assert!(body.get("kind").is_none());
    }
}
