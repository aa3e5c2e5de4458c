use serde::Deserialize;
use tracing::{debug, warn};

use crate::ports::{NotificationSurface, WindowClients};
use crate::types::push::{DisplayedNotification, NotificationData, NotificationOptions, PushPayload};

const FALLBACK_BODY: &str = "You have a new notification.";
const FALLBACK_URL: &str = "/";

#[derive(Debug, Deserialize)]
struct PartialPayload {
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
}

/// Background handler that turns server pushes into system notifications.
pub struct PushDeliveryAgent<S, W> {
    surface: S,
    windows: W,
    icon: String,
    default_title: String,
}

impl<S, W> PushDeliveryAgent<S, W>
where
    S: NotificationSurface,
    W: WindowClients,
{
    pub fn new(surface: S, windows: W, icon: impl Into<String>, default_title: impl Into<String>) -> Self {
        Self {
            surface,
            windows,
            icon: icon.into(),
            default_title: default_title.into(),
        }
    }

    /// Completes only after the host has shown the notification, so the
    /// host must keep the agent alive until this future resolves.
    pub async fn handle_push(&self, data: Option<&[u8]>) -> Result<DisplayedNotification, S::Error> {
        let payload = self.payload_from(data);
        let displayed = DisplayedNotification {
            title: payload.title,
            options: NotificationOptions {
                body: payload.body,
                icon: self.icon.clone(),
                badge: self.icon.clone(),
                data: NotificationData { url: payload.url },
            },
        };

        self.surface
            .show_notification(&displayed.title, &displayed.options)
            .await?;
        Ok(displayed)
    }

    pub async fn handle_click(&self, notification: &DisplayedNotification) -> Result<(), W::Error> {
        self.surface.close_notification(notification);

        let url = notification.options.data.url.as_str();
        if self.windows.focus_matching(url).await? {
            debug!(url, "focused existing window");
            return Ok(());
        }
        self.windows.open_window(url).await
    }

    fn payload_from(&self, data: Option<&[u8]>) -> PushPayload {
        let Some(data) = data else {
            warn!("push event without payload, showing generic notification");
            return self.fallback_payload();
        };

        match serde_json::from_slice::<PartialPayload>(data) {
            Ok(partial) => PushPayload {
                title: partial.title.unwrap_or_else(|| self.default_title.clone()),
                body: partial.body.unwrap_or_else(|| FALLBACK_BODY.to_string()),
                url: partial.url.unwrap_or_else(|| FALLBACK_URL.to_string()),
            },
            Err(err) => {
                warn!("malformed push payload ({err}), showing generic notification");
                self.fallback_payload()
            }
        }
    }

    fn fallback_payload(&self) -> PushPayload {
        PushPayload {
            title: self.default_title.clone(),
            body: FALLBACK_BODY.to_string(),
            url: FALLBACK_URL.to_string(),
        }
    }
}
