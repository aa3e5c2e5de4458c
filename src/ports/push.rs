use crate::types::push::PushSubscription;

/// Sends an already-serialized payload to one push subscription.
pub trait PushSender: Clone + Send + Sync + 'static {
    type Error: std::fmt::Display + Send + Sync + 'static;
    type Fut<'a>: Future<Output = Result<(), Self::Error>> + Send + 'a
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a PushSubscription, payload: &'a str) -> Self::Fut<'a>;
}
