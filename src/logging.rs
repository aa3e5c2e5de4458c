use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{EnvFilter, FromEnvError};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging filtered by `RUST_LOG`, `info` when unset.
pub fn setup_tracing() -> Result<(), FromEnvError> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(console_filter);

    tracing_subscriber::registry().with(console_layer).init();

    Ok(())
}
