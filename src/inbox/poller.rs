use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::inbox::UnreadCounter;
use crate::ports::{NotificationsApi, TimeProvider, Toaster};
use crate::session::Session;
use crate::types::notification::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unauthenticated,
    Refreshed {
        previous: u64,
        count: u64,
        toasted: bool,
    },
}

/// Keeps the unread counter in sync with the backend and toasts new
/// arrivals.
pub struct InboxPoller<A, T, U> {
    api: A,
    time: T,
    toaster: U,
    session: Session,
    counter: UnreadCounter,
    interval: Duration,
}

impl<A, T, U> InboxPoller<A, T, U>
where
    A: NotificationsApi,
    T: TimeProvider,
    U: Toaster,
{
    pub fn new(
        api: A,
        time: T,
        toaster: U,
        session: Session,
        counter: UnreadCounter,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            time,
            toaster,
            session,
            counter,
            interval,
        }
    }

    pub fn counter(&self) -> &UnreadCounter {
        &self.counter
    }

    /// One poll. Errors leave the counter untouched.
    pub async fn tick(&self) -> Result<TickOutcome, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(TickOutcome::Unauthenticated);
        };

        let count = self.api.unread_count(token).await?;
        let previous = self.counter.get();
        let mut toasted = false;
        if count > previous {
            let notifications = self.api.list(token).await?;
            if let Some(latest) = notifications.first() {
                self.toaster.show(Toast::new_notification(latest));
                toasted = true;
            }
        }
        self.counter.set(count);

        Ok(TickOutcome::Refreshed {
            previous,
            count,
            toasted,
        })
    }

    /// Ticks once right away, then once per interval until the returned
    /// handle is stopped or dropped.
    ///
    /// Every tick runs as its own task, so a slow response never holds back
    /// the next tick. Stopping only cancels the timer; ticks already in
    /// flight still complete.
    pub fn start(self) -> PollerHandle {
        let poller = Arc::new(self);
        let handle = tokio::spawn(async move {
            loop {
                let tick = Arc::clone(&poller);
                tokio::spawn(async move {
                    tick.run_tick().await;
                });
                poller.time.sleep(poller.interval).await;
            }
        });
        PollerHandle { handle }
    }

    async fn run_tick(&self) {
        match self.tick().await {
            Ok(TickOutcome::Unauthenticated) => {}
            Ok(outcome) => debug!(?outcome, "inbox poll"),
            Err(err) => error!("polling error: {err}"),
        }
    }
}

pub struct PollerHandle {
    handle: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
