//! Read-only snapshot of the active session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Identifier of this begin/end cycle
    pub id: String,
    /// Session variant label
    pub kind: String,
    /// When `begin` accepted the session
    pub started_at: DateTime<Utc>,
    /// Number of updates forwarded so far
    pub updates: u64,
}

impl SessionInfo {
    pub(crate) fn start(kind: &'static str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            started_at: Utc::now(),
            updates: 0,
        }
    }

    pub(crate) fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Time elapsed since the session began
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}
