use tracing::{debug, error, warn};

use crate::config::AGENT_SCRIPT_PATH;
use crate::error::PushSetupError;
use crate::ports::{NotificationsApi, PushHost};
use crate::push::vapid::decode_application_server_key;
use crate::session::{AuthToken, Session};
use crate::types::push::SubscribeOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Unsupported,
    Unauthenticated,
    Subscribed,
}

/// Registers the delivery agent and hands its push subscription to the
/// backend. Runs as part of login and must never hold it up.
pub struct PushRegistrationClient<H, A> {
    host: H,
    api: A,
    vapid_public_key: String,
}

impl<H, A> PushRegistrationClient<H, A>
where
    H: PushHost,
    A: NotificationsApi,
{
    pub fn new(host: H, api: A, vapid_public_key: impl Into<String>) -> Self {
        Self {
            host,
            api,
            vapid_public_key: vapid_public_key.into(),
        }
    }

    /// Best-effort: every failure is logged and swallowed.
    pub async fn subscribe(&self, session: &Session) {
        match self.try_subscribe(session).await {
            Ok(RegistrationOutcome::Subscribed) => debug!("push subscription registered"),
            Ok(RegistrationOutcome::Unsupported) => {
                warn!("push notifications not supported by this host")
            }
            Ok(RegistrationOutcome::Unauthenticated) => {
                debug!("skipping push setup for anonymous session")
            }
            Err(err) => error!("{err}"),
        }
    }

    pub async fn try_subscribe(
        &self,
        session: &Session,
    ) -> Result<RegistrationOutcome, PushSetupError> {
        if !self.host.capabilities().supports_push() {
            return Ok(RegistrationOutcome::Unsupported);
        }
        let Some(token) = session.token() else {
            return Ok(RegistrationOutcome::Unauthenticated);
        };

        self.register(token).await?;
        Ok(RegistrationOutcome::Subscribed)
    }

    async fn register(&self, token: &AuthToken) -> Result<(), PushSetupError> {
        self.host
            .register_agent(AGENT_SCRIPT_PATH)
            .await
            .map_err(|err| PushSetupError::Register(err.to_string()))?;

        // Subscribing through a registration that is not active yet fails
        // on some hosts.
        self.host
            .agent_ready()
            .await
            .map_err(|err| PushSetupError::Ready(err.to_string()))?;

        let options = SubscribeOptions {
            user_visible_only: true,
            application_server_key: decode_application_server_key(&self.vapid_public_key)?,
        };
        let subscription = self
            .host
            .subscribe(&options)
            .await
            .map_err(|err| PushSetupError::Subscribe(err.to_string()))?;

        self.api.subscribe(token, &subscription).await?;
        Ok(())
    }
}
