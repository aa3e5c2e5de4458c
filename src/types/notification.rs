use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

time::serde::format_description!(
    local_timestamp,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// An in-app notification as the backend lists it.
///
/// `read` is backend-authoritative; the client never flips it locally and
/// only sees a change after the next list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub redirect_url: String,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "local_timestamp")]
    pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub action: ToastAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub label: String,
    pub redirect_url: String,
}

impl Toast {
    pub fn new_notification(notification: &Notification) -> Self {
        Self {
            title: "New Notification".to_string(),
            description: notification.message.clone(),
            action: ToastAction {
                label: "View".to_string(),
                redirect_url: notification.redirect_url.clone(),
            },
        }
    }
}
