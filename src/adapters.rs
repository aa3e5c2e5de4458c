use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use tracing::info;
use url::Url;

use crate::error::ApiError;
use crate::ports::{self, PortFuture};
use crate::session::AuthToken;
use crate::types::notification::{Notification, Toast, UnreadCount};
use crate::types::push::{DisplayedNotification, NotificationOptions, PushSubscription, VapidConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}

/// reqwest client for the backend's `/api/notifications` endpoints.
#[derive(Debug, Clone)]
pub struct HttpNotificationsApi {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpNotificationsApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// `path` is relative so that it resolves under any prefix on the base url.
    async fn call(
        &self,
        method: Method,
        path: &str,
        token: &AuthToken,
        body: Option<&PushSubscription>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.base_url.join(path)?;
        let request_path = url.path().to_string();
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(AUTHORIZATION, token.bearer());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                method: method.to_string(),
                path: request_path,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl ports::NotificationsApi for HttpNotificationsApi {
    fn subscribe<'a>(
        &'a self,
        token: &'a AuthToken,
        subscription: &'a PushSubscription,
    ) -> PortFuture<'a, (), ApiError> {
        Box::pin(async move {
            self.call(
                Method::POST,
                "api/notifications/subscribe",
                token,
                Some(subscription),
            )
            .await?;
            Ok(())
        })
    }

    fn unread_count<'a>(&'a self, token: &'a AuthToken) -> PortFuture<'a, u64, ApiError> {
        Box::pin(async move {
            let response = self
                .call(Method::GET, "api/notifications/unread-count", token, None)
                .await?;
            let body: UnreadCount = response.json().await?;
            Ok(body.count)
        })
    }

    fn list<'a>(&'a self, token: &'a AuthToken) -> PortFuture<'a, Vec<Notification>, ApiError> {
        Box::pin(async move {
            let response = self
                .call(Method::GET, "api/notifications", token, None)
                .await?;
            Ok(response.json().await?)
        })
    }

    fn mark_read<'a>(&'a self, token: &'a AuthToken, id: i64) -> PortFuture<'a, (), ApiError> {
        Box::pin(async move {
            let path = format!("api/notifications/{id}/read");
            self.call(Method::PUT, &path, token, None).await?;
            Ok(())
        })
    }
}

#[derive(Clone)]
pub struct WebPushSender {
    vapid: VapidConfig,
    client: Arc<web_push::WebPushClient>,
}

impl WebPushSender {
    pub fn new(vapid: VapidConfig) -> Result<Self, web_push::WebPushError> {
        let client = web_push::WebPushClient::new()?;
        Ok(Self {
            vapid,
            client: Arc::new(client),
        })
    }
}

impl ports::PushSender for WebPushSender {
    type Error = web_push::WebPushError;
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>>
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a PushSubscription, payload: &'a str) -> Self::Fut<'a> {
        Box::pin(async move {
            let subscription_info = web_push::SubscriptionInfo::new(
                subscription.endpoint.clone(),
                subscription.keys.p256dh.clone(),
                subscription.keys.auth.clone(),
            );
            let mut builder = web_push::WebPushMessageBuilder::new(&subscription_info)?;
            builder.set_payload(web_push::ContentEncoding::Aes128Gcm, payload.as_bytes());
            let mut signature_builder = web_push::VapidSignatureBuilder::from_base64(
                &self.vapid.private_key,
                web_push::URL_SAFE_NO_PAD,
                &subscription_info,
            )?;
            signature_builder.add_claim("sub", self.vapid.subject.as_str());
            builder.set_vapid_signature(signature_builder.build()?);
            self.client.send(builder.build()?).await?;
            Ok(())
        })
    }
}

/// Host surfaces for a terminal session: everything is written to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHost;

impl ports::Toaster for LogHost {
    fn show(&self, toast: Toast) {
        info!(
            title = %toast.title,
            description = %toast.description,
            action = %toast.action.label,
            redirect_url = %toast.action.redirect_url,
            "toast"
        );
    }
}

impl ports::Navigator for LogHost {
    fn navigate(&self, url: &str) {
        info!(url, "navigate");
    }
}

impl ports::NotificationSurface for LogHost {
    type Error = std::convert::Infallible;

    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> PortFuture<'a, (), Self::Error> {
        info!(
            title,
            body = %options.body,
            icon = %options.icon,
            url = %options.data.url,
            "system notification"
        );
        Box::pin(std::future::ready(Ok(())))
    }

    fn close_notification(&self, notification: &DisplayedNotification) {
        info!(title = %notification.title, "notification closed");
    }
}

impl ports::WindowClients for LogHost {
    type Error = std::convert::Infallible;

    fn focus_matching<'a>(&'a self, _url: &'a str) -> PortFuture<'a, bool, Self::Error> {
        Box::pin(std::future::ready(Ok(false)))
    }

    fn open_window<'a>(&'a self, url: &'a str) -> PortFuture<'a, (), Self::Error> {
        info!(url, "open window");
        Box::pin(std::future::ready(Ok(())))
    }
}
