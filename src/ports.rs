use std::pin::Pin;

pub mod api;
pub mod host;
pub mod push;
pub mod time;

pub use api::NotificationsApi;
pub use host::{HostCapabilities, Navigator, NotificationSurface, PushHost, Toaster, WindowClients};
pub use push::PushSender;
pub use time::TimeProvider;

pub type PortFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;
