use tracing::{debug, error};

use crate::ports::PushSender;
use crate::types::push::{PushPayload, PushSubscription};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans one notification out to every push subscription of a recipient.
#[derive(Debug, Clone)]
pub struct PushDispatcher<S> {
    sender: S,
    title: String,
}

impl<S: PushSender> PushDispatcher<S> {
    pub fn new(sender: S, title: impl Into<String>) -> Self {
        Self {
            sender,
            title: title.into(),
        }
    }

    pub fn payload(&self, message: &str, url: &str) -> PushPayload {
        PushPayload {
            title: self.title.clone(),
            body: message.to_string(),
            url: url.to_string(),
        }
    }

    pub async fn send_notification(
        &self,
        subscriptions: &[PushSubscription],
        message: &str,
        url: &str,
    ) -> Result<DispatchReport, serde_json::Error> {
        let payload = serde_json::to_string(&self.payload(message, url))?;
        let mut report = DispatchReport::default();

        for subscription in subscriptions {
            match self.sender.send(subscription, &payload).await {
                Ok(()) => {
                    debug!(endpoint = %subscription.endpoint, "push delivered");
                    report.delivered += 1;
                }
                Err(err) => {
                    error!(
                        "push delivery error: {} (endpoint {})",
                        err, subscription.endpoint
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
