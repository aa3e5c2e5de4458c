mod counter;
pub mod poller;
pub mod read_state;

pub use counter::UnreadCounter;
pub use poller::{InboxPoller, PollerHandle, TickOutcome};
pub use read_state::{MarkReadFailurePolicy, NotificationInbox};
