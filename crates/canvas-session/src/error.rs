//! Session error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session already in progress: {kind} ({id})")]
    AlreadyActive { kind: &'static str, id: String },

    #[error("No current session")]
    NoActiveSession,
}
