//! Tracing subscriber setup for hosts embedding the cart.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CartConfig;

/// Installs a global fmt subscriber filtered by `config.log_level`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(config: &CartConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
