//! Session State Machine
//!
//! ```text
//! Idle
//!   ↓ begin
//! Active ⟲ update
//!   ↓ complete / cancel / quietly_complete
//! Idle
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session is running
    Idle,
    /// A session owns the canvas
    Active,
}

/// Lifecycle operations routed through the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Begin,
    Update,
    Complete,
    Cancel,
    QuietlyComplete,
}

impl SessionState {
    /// Check whether an operation may run in this state
    pub fn accepts(&self, op: Operation) -> bool {
        match (self, op) {
            (SessionState::Idle, Operation::Begin) => true,
            (SessionState::Active, Operation::Begin) => false,
            (SessionState::Active, Operation::Update) => true,
            (SessionState::Idle, Operation::Update) => false,
            // Ending operations are tolerated from either state
            (_, Operation::Complete | Operation::Cancel | Operation::QuietlyComplete) => true,
        }
    }

    /// State reached after an accepted operation
    pub fn after(&self, op: Operation) -> SessionState {
        match op {
            Operation::Begin | Operation::Update => SessionState::Active,
            Operation::Complete | Operation::Cancel | Operation::QuietlyComplete => {
                SessionState::Idle
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
        }
    }
}

impl Operation {
    /// Whether observers hear about this operation
    pub fn notifies(&self) -> bool {
        matches!(self, Operation::Begin | Operation::Update | Operation::Cancel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Begin => "begin",
            Operation::Update => "update",
            Operation::Complete => "complete",
            Operation::Cancel => "cancel",
            Operation::QuietlyComplete => "quietly_complete",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SessionState::Idle),
            "active" => Ok(SessionState::Active),
            _ => Err(format!("Unknown session state: {}", s)),
        }
    }
}
