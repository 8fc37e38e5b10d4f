//! Canvas Core
//!
//! Editor-facing coordination layer. The [`Editor`] owns the session
//! manager and routes its change notifications into a [`ChangeFeed`]
//! that renderers subscribe to.

mod config;
mod editor;
mod error;
mod feed;

pub use config::Config;
pub use editor::Editor;
pub use error::CoreError;
pub use feed::{ChangeFeed, SubscriptionId};

// Re-export session components
pub use canvas_session::{
    Notifier, Operation, Session, SessionError, SessionInfo, SessionManager, SessionState,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over the configured filter when set. Returns false if a
/// global subscriber was already installed, in which case that one is kept.
pub fn init_logging(config: &Config) -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    match fmt()
        .with_env_filter(filter)
        .with_target(config.log_target)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Logging already initialized: {}", e);
            false
        }
    }
}
