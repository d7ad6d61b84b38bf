//! Notification Entity

use chrono::{DateTime, Utc};
use kernel::id::{NotificationId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            is_read: false,
            action_url: None,
            action_label: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, url: impl Into<String>, label: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self.action_label = Some(label.into());
        self
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_shape() {
        let mut notification = Notification::new(
            UserId::from_suffix(2),
            NotificationKind::Success,
            "Conversão aprovada",
            "Sua comissão de R$ 25,49 foi aprovada",
        )
        .with_action("/conversions/conv_1", "Ver conversão");

        assert!(!notification.is_read);
        notification.mark_read();

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["isRead"], true);
        assert_eq!(json["actionLabel"], "Ver conversão");
        assert!(json["id"].as_str().unwrap().starts_with("notif_"));
    }
}
