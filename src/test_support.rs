use std::collections::HashSet;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use time::macros::datetime;
use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::ports::{Navigator, NotificationsApi, PortFuture, TimeProvider, Toaster};
use crate::session::AuthToken;
use crate::types::notification::{Notification, Toast};
use crate::types::push::PushSubscription;

/// In-memory backend that records every call it receives.
#[derive(Clone, Default)]
pub(crate) struct TestApi {
    calls: Arc<Mutex<Vec<String>>>,
    count: Arc<Mutex<u64>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    subscriptions: Arc<Mutex<Vec<PushSubscription>>>,
    failing: Arc<Mutex<HashSet<&'static str>>>,
}

impl TestApi {
    pub(crate) fn set_count(&self, count: u64) {
        *self.count.lock().expect("count lock") = count;
    }

    pub(crate) fn set_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().expect("notifications lock") = notifications;
    }

    /// Makes every later call to `endpoint` answer with a 500.
    pub(crate) fn fail(&self, endpoint: &'static str) {
        self.failing.lock().expect("failing lock").insert(endpoint);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn subscriptions(&self) -> Vec<PushSubscription> {
        self.subscriptions.lock().expect("subscriptions lock").clone()
    }

    fn record(&self, endpoint: &'static str, call: String, path: String) -> Result<(), ApiError> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing.lock().expect("failing lock").contains(endpoint) {
            return Err(ApiError::UnexpectedStatus {
                method: "TEST".to_string(),
                path,
                status: 500,
            });
        }
        Ok(())
    }
}

impl NotificationsApi for TestApi {
    fn subscribe<'a>(
        &'a self,
        _token: &'a AuthToken,
        subscription: &'a PushSubscription,
    ) -> PortFuture<'a, (), ApiError> {
        let result = self
            .record(
                "subscribe",
                "subscribe".to_string(),
                "/api/notifications/subscribe".to_string(),
            )
            .map(|()| {
                self.subscriptions
                    .lock()
                    .expect("subscriptions lock")
                    .push(subscription.clone());
            });
        Box::pin(std::future::ready(result))
    }

    fn unread_count<'a>(&'a self, _token: &'a AuthToken) -> PortFuture<'a, u64, ApiError> {
        let result = self
            .record(
                "unread-count",
                "unread-count".to_string(),
                "/api/notifications/unread-count".to_string(),
            )
            .map(|()| *self.count.lock().expect("count lock"));
        Box::pin(std::future::ready(result))
    }

    fn list<'a>(&'a self, _token: &'a AuthToken) -> PortFuture<'a, Vec<Notification>, ApiError> {
        let result = self
            .record("list", "list".to_string(), "/api/notifications".to_string())
            .map(|()| self.notifications.lock().expect("notifications lock").clone());
        Box::pin(std::future::ready(result))
    }

    fn mark_read<'a>(&'a self, _token: &'a AuthToken, id: i64) -> PortFuture<'a, (), ApiError> {
        let result = self.record(
            "read",
            format!("read {id}"),
            format!("/api/notifications/{id}/read"),
        );
        Box::pin(std::future::ready(result))
    }
}

#[derive(Clone, Default)]
pub(crate) struct TestUi {
    toasts: Arc<Mutex<Vec<Toast>>>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl TestUi {
    pub(crate) fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toasts lock").clone()
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.navigations.lock().expect("navigations lock").clone()
    }
}

impl Toaster for TestUi {
    fn show(&self, toast: Toast) {
        self.toasts.lock().expect("toasts lock").push(toast);
    }
}

impl Navigator for TestUi {
    fn navigate(&self, url: &str) {
        self.navigations
            .lock()
            .expect("navigations lock")
            .push(url.to_string());
    }
}

/// Clock whose sleeps only finish when a test wakes them.
#[derive(Clone, Default)]
pub(crate) struct TestTime {
    pending: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
    requested: Arc<Mutex<Vec<Duration>>>,
}

impl TestTime {
    pub(crate) fn sleep_durations(&self) -> Vec<Duration> {
        self.requested.lock().expect("requested lock").clone()
    }

    pub(crate) fn wake_all(&self) {
        for waker in self.pending.lock().expect("pending lock").drain(..) {
            let _ = waker.send(());
        }
    }
}

pub(crate) struct PendingSleep {
    woken: oneshot::Receiver<()>,
}

impl Future for PendingSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.woken).poll(cx).map(|_| ())
    }
}

impl TimeProvider for TestTime {
    type Sleep<'a>
        = PendingSleep
    where
        Self: 'a;

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        let (waker, woken) = oneshot::channel();
        self.requested.lock().expect("requested lock").push(duration);
        self.pending.lock().expect("pending lock").push(waker);
        PendingSleep { woken }
    }
}

pub(crate) fn notification(id: i64, message: &str, redirect_url: &str) -> Notification {
    Notification {
        id,
        message: message.to_string(),
        redirect_url: redirect_url.to_string(),
        read: false,
        created_at: datetime!(2025-01-12 09:30:00),
    }
}
