use std::sync::Mutex;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::inbox::UnreadCounter;
use crate::ports::{Navigator, NotificationsApi};
use crate::session::Session;
use crate::types::notification::Notification;

/// What happens to the optimistic decrement when the backend rejects a
/// mark-read call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarkReadFailurePolicy {
    #[default]
    Ignore,
    Rollback,
}

pub struct NotificationInbox<A, N> {
    api: A,
    navigator: N,
    session: Session,
    counter: UnreadCounter,
    policy: MarkReadFailurePolicy,
    cached: Mutex<Vec<Notification>>,
}

impl<A, N> NotificationInbox<A, N>
where
    A: NotificationsApi,
    N: Navigator,
{
    pub fn new(
        api: A,
        navigator: N,
        session: Session,
        counter: UnreadCounter,
        policy: MarkReadFailurePolicy,
    ) -> Self {
        Self {
            api,
            navigator,
            session,
            counter,
            policy,
            cached: Mutex::new(Vec::new()),
        }
    }

    /// Fetches the list in backend order and keeps it for the view.
    pub async fn fetch_list(&self) -> Result<Vec<Notification>, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(Vec::new());
        };

        let notifications = self.api.list(token).await?;
        *self.cached.lock().expect("notification cache lock") = notifications.clone();
        Ok(notifications)
    }

    pub fn cached(&self) -> Vec<Notification> {
        self.cached.lock().expect("notification cache lock").clone()
    }

    /// Sends the read request in the background, decrements the counter and
    /// navigates without waiting for the backend. The cached entry keeps its
    /// `read` flag until the next fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mark_read(&self, id: i64, redirect_url: &str) -> Option<JoinHandle<()>> {
        let decremented = self.counter.decrement();

        let request = match self.session.token().cloned() {
            Some(token) => {
                let api = self.api.clone();
                let counter = self.counter.clone();
                let policy = self.policy;
                Some(tokio::spawn(async move {
                    if let Err(err) = api.mark_read(&token, id).await {
                        error!("failed to mark notification {id} as read: {err}");
                        if policy == MarkReadFailurePolicy::Rollback
                            && let Some(decremented) = decremented
                        {
                            counter.undo_decrement(decremented);
                        }
                    }
                }))
            }
            None => {
                warn!("marking notification {id} as read without a session");
                None
            }
        };

        self.navigator.navigate(redirect_url);
        request
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::session::AuthToken;
    use crate::test_support::{TestApi, TestUi, notification};

    fn inbox(
        api: &TestApi,
        ui: &TestUi,
        counter: &UnreadCounter,
        policy: MarkReadFailurePolicy,
    ) -> NotificationInbox<TestApi, TestUi> {
        NotificationInbox::new(
            api.clone(),
            ui.clone(),
            Session::authenticated(AuthToken::new("token")),
            counter.clone(),
            policy,
        )
    }

    #[tokio::test]
    async fn fetch_list__should_keep_backend_order() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        api.set_notifications(vec![
            notification(2, "older id, newer entry", "/a"),
            notification(5, "newer id, older entry", "/b"),
        ]);
        let inbox = inbox(&api, &ui, &UnreadCounter::default(), MarkReadFailurePolicy::Ignore);

        // When
        let list = inbox.fetch_list().await.expect("fetch list");

        // Then
        let ids: Vec<i64> = list.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(inbox.cached(), list);
    }

    #[tokio::test]
    async fn fetch_list__should_return_empty_without_session() {
        // Given
        let api = TestApi::default();
        api.set_notifications(vec![notification(1, "hidden", "/")]);
        let inbox = NotificationInbox::new(
            api.clone(),
            TestUi::default(),
            Session::anonymous(),
            UnreadCounter::default(),
            MarkReadFailurePolicy::Ignore,
        );

        // When
        let list = inbox.fetch_list().await.expect("fetch list");

        // Then
        assert!(list.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn mark_read__should_decrement_and_navigate() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let counter = UnreadCounter::default();
        counter.set(2);
        api.set_notifications(vec![notification(8, "Graded", "/student/performance")]);
        let inbox = inbox(&api, &ui, &counter, MarkReadFailurePolicy::Ignore);
        inbox.fetch_list().await.expect("fetch list");

        // When
        let request = inbox.mark_read(8, "/student/performance").expect("request");
        request.await.expect("join request");

        // Then
        assert_eq!(counter.get(), 1);
        assert_eq!(ui.navigations(), vec!["/student/performance"]);
        assert_eq!(api.calls(), vec!["list", "read 8"]);
        assert!(!inbox.cached()[0].read);
    }

    #[tokio::test]
    async fn mark_read__should_navigate_even_when_request_fails() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let counter = UnreadCounter::default();
        counter.set(1);
        api.fail("read");
        let inbox = inbox(&api, &ui, &counter, MarkReadFailurePolicy::Ignore);

        // When
        inbox
            .mark_read(3, "/student/doubts")
            .expect("request")
            .await
            .expect("join request");

        // Then
        assert_eq!(counter.get(), 0);
        assert_eq!(ui.navigations(), vec!["/student/doubts"]);
    }

    #[tokio::test]
    async fn mark_read__should_floor_counter_at_zero() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let counter = UnreadCounter::default();
        let inbox = inbox(&api, &ui, &counter, MarkReadFailurePolicy::Ignore);

        // When
        for id in 0..3 {
            inbox.mark_read(id, "/").expect("request").await.expect("join");
        }

        // Then
        assert_eq!(counter.get(), 0);
        assert_eq!(ui.navigations().len(), 3);
    }

    #[tokio::test]
    async fn mark_read__should_roll_back_when_configured() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let counter = UnreadCounter::default();
        counter.set(1);
        api.fail("read");
        let inbox = inbox(&api, &ui, &counter, MarkReadFailurePolicy::Rollback);

        // When
        inbox
            .mark_read(3, "/student/doubts")
            .expect("request")
            .await
            .expect("join request");
        inbox
            .mark_read(4, "/student/doubts")
            .expect("request")
            .await
            .expect("join request");

        // Then
        assert_eq!(counter.get(), 1);
        assert_eq!(ui.navigations().len(), 2);
    }

    #[tokio::test]
    async fn mark_read__should_not_roll_back_over_a_newer_poll() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let counter = UnreadCounter::default();
        counter.set(3);
        api.fail("read");
        let inbox = inbox(&api, &ui, &counter, MarkReadFailurePolicy::Rollback);

        // When
        let request = inbox.mark_read(3, "/student/doubts").expect("request");
        // a poll lands before the failed request settles
        counter.set(3);
        request.await.expect("join request");

        // Then
        assert_eq!(counter.get(), 3);
    }

    #[tokio::test]
    async fn mark_read__should_not_call_backend_without_session() {
        // Given
        let api = TestApi::default();
        let ui = TestUi::default();
        let inbox = NotificationInbox::new(
            api.clone(),
            ui.clone(),
            Session::anonymous(),
            UnreadCounter::default(),
            MarkReadFailurePolicy::Ignore,
        );

        // When
        let request = inbox.mark_read(1, "/student/dashboard");

        // Then
        assert!(request.is_none());
        assert!(api.calls().is_empty());
        assert_eq!(ui.navigations(), vec!["/student/dashboard"]);
    }
}
