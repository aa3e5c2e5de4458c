pub mod adapters;
pub mod config;
pub mod error;
pub mod inbox;
pub mod logging;
pub mod ports;
pub mod push;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use push::vapid::generate_vapid_credentials;
