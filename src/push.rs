use tracing::{error, warn};

use crate::adapters::WebPushSender;
use crate::config;

pub mod agent;
pub mod dispatch;
pub mod registration;
pub mod vapid;

pub use agent::PushDeliveryAgent;
pub use dispatch::{DispatchReport, PushDispatcher};
pub use registration::{PushRegistrationClient, RegistrationOutcome};
pub use vapid::{VapidConfigStatus, load_vapid_config};

/// Builds a Web Push dispatcher when signing credentials are configured.
pub fn web_push_dispatcher(config: &config::AppConfig) -> Option<PushDispatcher<WebPushSender>> {
    let vapid = match load_vapid_config(config) {
        VapidConfigStatus::Ready(vapid) => vapid,
        VapidConfigStatus::Incomplete => {
            warn!("push delivery disabled: incomplete VAPID configuration");
            return None;
        }
        VapidConfigStatus::Missing => {
            return None;
        }
    };

    match WebPushSender::new(vapid) {
        Ok(sender) => Some(PushDispatcher::new(sender, config.push_title.clone())),
        Err(err) => {
            error!("push delivery disabled: failed to init web-push ({err})");
            None
        }
    }
}
