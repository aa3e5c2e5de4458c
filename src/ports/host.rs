use std::fmt::Display;

use crate::ports::PortFuture;
use crate::types::notification::Toast;
use crate::types::push::{DisplayedNotification, NotificationOptions, PushSubscription, SubscribeOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub service_worker: bool,
    pub push_manager: bool,
}

impl HostCapabilities {
    pub fn supports_push(&self) -> bool {
        self.service_worker && self.push_manager
    }
}

/// Service worker runtime plus push manager of the hosting environment.
pub trait PushHost: Send + Sync {
    type Error: Display + Send + Sync + 'static;

    fn capabilities(&self) -> HostCapabilities;

    /// Registering the same script again returns the existing registration.
    fn register_agent<'a>(&'a self, script_path: &'a str) -> PortFuture<'a, (), Self::Error>;

    fn agent_ready<'a>(&'a self) -> PortFuture<'a, (), Self::Error>;

    fn subscribe<'a>(
        &'a self,
        options: &'a SubscribeOptions,
    ) -> PortFuture<'a, PushSubscription, Self::Error>;
}

/// OS-level notification display available to the delivery agent.
pub trait NotificationSurface: Send + Sync {
    type Error: Display + Send + Sync + 'static;

    /// Resolves once the notification is on screen.
    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> PortFuture<'a, (), Self::Error>;

    fn close_notification(&self, notification: &DisplayedNotification);
}

/// Windows controlled by the delivery agent's origin.
pub trait WindowClients: Send + Sync {
    type Error: Display + Send + Sync + 'static;

    /// Returns `true` when a window showing `url` existed and got focus.
    fn focus_matching<'a>(&'a self, url: &'a str) -> PortFuture<'a, bool, Self::Error>;

    fn open_window<'a>(&'a self, url: &'a str) -> PortFuture<'a, (), Self::Error>;
}

pub trait Toaster: Send + Sync + 'static {
    fn show(&self, toast: Toast);
}

pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, url: &str);
}
