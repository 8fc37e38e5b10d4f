//! Editor state container
//!
//! Owns the session manager and wires its notifier into the change feed.
//! Renderers subscribe to the feed and re-derive UI state on each revision.

use canvas_session::{Session, SessionInfo, SessionManager, SessionState};

use crate::feed::{ChangeFeed, SubscriptionId};
use crate::Result;

pub struct Editor<S: Session> {
    /// Observers of session and document changes
    feed: ChangeFeed,
    /// Single active mutation session
    sessions: SessionManager<S>,
}

impl<S: Session> Editor<S> {
    pub fn new() -> Self {
        let feed = ChangeFeed::new();
        let notifier_feed = feed.clone();
        let sessions = SessionManager::new(move || {
            notifier_feed.publish();
        });

        tracing::info!("Editor initialized");

        Self { feed, sessions }
    }

    // === Session operations ===

    pub fn session_manager(&self) -> &SessionManager<S> {
        &self.sessions
    }

    pub fn begin_session(&mut self, session: S) -> Result<()> {
        self.sessions.begin(session)?;
        Ok(())
    }

    pub fn update_session(&mut self, args: S::Update) -> Result<()> {
        self.sessions.update(args)?;
        Ok(())
    }

    /// Finish the active session. The caller applies the output and then
    /// calls [`Editor::mark_changed`].
    pub fn complete_session(&mut self, args: S::Complete) -> Option<S::Output> {
        self.sessions.complete(args)
    }

    pub fn cancel_session(&mut self, args: S::Cancel) {
        self.sessions.cancel(args);
    }

    /// Reset bookkeeping for a session whose effect was committed elsewhere
    pub fn finish_externally(&mut self) {
        self.sessions.quietly_complete();
    }

    /// Cancel whatever is running, for teardown paths.
    /// Returns whether a session was actually cancelled.
    pub fn abort_active(&mut self, args: S::Cancel) -> bool {
        let Some(info) = self.sessions.info() else {
            return false;
        };

        tracing::info!(
            session_id = %info.id,
            kind = %info.kind,
            updates = info.updates,
            "Aborting active session"
        );

        self.sessions.cancel(args);
        true
    }

    pub fn is_in_session(&self) -> bool {
        self.sessions.is_in_session()
    }

    pub fn session_state(&self) -> SessionState {
        self.sessions.state()
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        self.sessions.info()
    }

    // === Change notification ===

    pub fn subscribe(&self, listener: impl Fn(u64) + Send + Sync + 'static) -> SubscriptionId {
        self.feed.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.feed.unsubscribe(id)
    }

    /// Publish a change made outside the session lifecycle
    pub fn mark_changed(&self) -> u64 {
        self.feed.publish()
    }

    pub fn revision(&self) -> u64 {
        self.feed.revision()
    }
}

impl<S: Session> Default for Editor<S> {
    fn default() -> Self {
        Self::new()
    }
}
