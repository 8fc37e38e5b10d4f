//! Canvas Session Lifecycle
//!
//! Only one mutation session (drag, resize, draw, ...) runs at a time.
//! The [`SessionManager`] owns it and forwards `update`/`complete`/`cancel`
//! to it, notifying observers after `begin`, `update` and `cancel`.

mod error;
mod info;
mod manager;
mod session;
mod state;

pub use error::SessionError;
pub use info::SessionInfo;
pub use manager::{Notifier, SessionManager};
pub use session::Session;
pub use state::{Operation, SessionState};

pub type Result<T> = std::result::Result<T, SessionError>;
