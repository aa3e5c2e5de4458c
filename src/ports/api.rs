use crate::error::ApiError;
use crate::ports::PortFuture;
use crate::session::AuthToken;
use crate::types::notification::Notification;
use crate::types::push::PushSubscription;

/// The backend's notification REST contract.
pub trait NotificationsApi: Clone + Send + Sync + 'static {
    fn subscribe<'a>(
        &'a self,
        token: &'a AuthToken,
        subscription: &'a PushSubscription,
    ) -> PortFuture<'a, (), ApiError>;

    fn unread_count<'a>(&'a self, token: &'a AuthToken) -> PortFuture<'a, u64, ApiError>;

    fn list<'a>(&'a self, token: &'a AuthToken) -> PortFuture<'a, Vec<Notification>, ApiError>;

    fn mark_read<'a>(&'a self, token: &'a AuthToken, id: i64) -> PortFuture<'a, (), ApiError>;
}
