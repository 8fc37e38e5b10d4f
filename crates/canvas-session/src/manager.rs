//! Session Manager
//!
//! Holds at most one active session and routes lifecycle calls to it.
//! Observers are notified after `begin`, `update` and `cancel`. `complete`
//! stays silent because the caller applies its output, and that is what
//! observers react to.

use crate::error::SessionError;
use crate::info::SessionInfo;
use crate::session::Session;
use crate::state::{Operation, SessionState};
use crate::Result;

/// Change callback supplied once at construction
pub type Notifier = Box<dyn Fn() + Send + Sync>;

struct ActiveSlot<S> {
    session: S,
    info: SessionInfo,
}

pub struct SessionManager<S: Session> {
    /// The running session, if any
    active: Option<ActiveSlot<S>>,
    notify: Notifier,
}

impl<S: Session> SessionManager<S> {
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            active: None,
            notify: Box::new(notify),
        }
    }

    /// Start a session. Fails with [`SessionError::AlreadyActive`] if another
    /// one is still running; the running session is left untouched.
    ///
    /// A rejected `session` is destroyed without any of its capabilities
    /// being called. Ownership is not handed back to the caller.
    pub fn begin(&mut self, session: S) -> Result<&mut Self> {
        if let Err(err) = self.check(Operation::Begin) {
            tracing::error!(
                error = %err,
                rejected = session.kind(),
                "Session begun while another is in progress"
            );
            return Err(err);
        }

        let info = SessionInfo::start(session.kind());
        tracing::debug!(session_id = %info.id, kind = %info.kind, "Session started");

        self.active = Some(ActiveSlot { session, info });
        self.transitioned(Operation::Begin, SessionState::Idle);
        Ok(self)
    }

    /// Forward an intermediate step to the running session
    pub fn update(&mut self, args: S::Update) -> Result<&mut Self> {
        if let Err(err) = self.check(Operation::Update) {
            tracing::error!(error = %err, "Session update with no current session");
            return Err(err);
        }

        let Some(slot) = self.active.as_mut() else {
            return Err(SessionError::NoActiveSession);
        };

        slot.session.update(args);
        slot.info.record_update();
        tracing::trace!(
            session_id = %slot.info.id,
            updates = slot.info.updates,
            "Session updated"
        );

        self.transitioned(Operation::Update, SessionState::Active);
        Ok(self)
    }

    /// Finish the running session and hand back what it produced.
    /// Returns `None` when nothing is running.
    pub fn complete(&mut self, args: S::Complete) -> Option<S::Output> {
        let Some(mut slot) = self.active.take() else {
            tracing::debug!("Session complete with no current session");
            return None;
        };

        let output = slot.session.complete(args);
        tracing::debug!(
            session_id = %slot.info.id,
            kind = %slot.info.kind,
            updates = slot.info.updates,
            elapsed_ms = slot.info.elapsed().num_milliseconds(),
            "Session completed"
        );

        self.transitioned(Operation::Complete, SessionState::Active);
        Some(output)
    }

    /// Abandon the running session, if any
    pub fn cancel(&mut self, args: S::Cancel) -> &mut Self {
        let from = self.state();

        match self.active.take() {
            Some(mut slot) => {
                slot.session.cancel(args);
                tracing::debug!(
                    session_id = %slot.info.id,
                    kind = %slot.info.kind,
                    elapsed_ms = slot.info.elapsed().num_milliseconds(),
                    "Session cancelled"
                );
            }
            None => tracing::debug!("Session cancel with no current session"),
        }

        self.transitioned(Operation::Cancel, from);
        self
    }

    /// Drop the running session without calling `complete` or `cancel` and
    /// without notifying. For flows that already committed the effect
    /// through another path.
    pub fn quietly_complete(&mut self) -> &mut Self {
        let from = self.state();

        if let Some(slot) = self.active.take() {
            tracing::debug!(
                session_id = %slot.info.id,
                kind = %slot.info.kind,
                "Session quietly completed"
            );
        }

        self.transitioned(Operation::QuietlyComplete, from);
        self
    }

    pub fn is_in_session(&self) -> bool {
        self.state().is_active()
    }

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Borrow the running session
    pub fn current(&self) -> Option<&S> {
        self.active.as_ref().map(|slot| &slot.session)
    }

    /// Snapshot of the running session's bookkeeping
    pub fn info(&self) -> Option<SessionInfo> {
        self.active.as_ref().map(|slot| slot.info.clone())
    }

    /// Reject operations the current state does not accept
    fn check(&self, op: Operation) -> Result<()> {
        if self.state().accepts(op) {
            return Ok(());
        }

        match self.active.as_ref() {
            Some(slot) => Err(SessionError::AlreadyActive {
                kind: slot.session.kind(),
                id: slot.info.id.clone(),
            }),
            None => Err(SessionError::NoActiveSession),
        }
    }

    fn transitioned(&self, op: Operation, from: SessionState) {
        let to = from.after(op);
        debug_assert_eq!(to, self.state());

        if from != to {
            tracing::debug!(from = %from, to = %to, op = %op, "Session state transition");
        }

        if op.notifies() {
            (self.notify)();
        }
    }
}

impl<S: Session> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("info", &self.info())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update(i32),
        Complete(&'static str),
        Cancel(&'static str),
    }

    /// Records every call it receives into a shared log
    struct Recorder {
        name: &'static str,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Session for Recorder {
        type Update = i32;
        type Complete = &'static str;
        type Cancel = &'static str;
        type Output = String;

        fn update(&mut self, args: i32) {
            self.calls.lock().push(Call::Update(args));
        }

        fn complete(&mut self, args: &'static str) -> String {
            self.calls.lock().push(Call::Complete(args));
            format!("{}:{}", self.name, args)
        }

        fn cancel(&mut self, args: &'static str) {
            self.calls.lock().push(Call::Cancel(args));
        }

        fn kind(&self) -> &'static str {
            self.name
        }
    }

    struct Fixture {
        manager: SessionManager<Recorder>,
        notified: Arc<AtomicUsize>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl Fixture {
        fn new() -> Self {
            let notified = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&notified);
            let manager = SessionManager::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

            Self {
                manager,
                notified,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn session(&self, name: &'static str) -> Recorder {
            Recorder {
                name,
                calls: Arc::clone(&self.calls),
            }
        }

        fn notifications(&self) -> usize {
            self.notified.load(Ordering::SeqCst)
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    #[test]
    fn test_begin_update_complete() {
        let mut fx = Fixture::new();
        let drag = fx.session("drag");

        fx.manager.begin(drag).unwrap().update(1).unwrap().update(2).unwrap();
        assert!(fx.manager.is_in_session());
        assert_eq!(fx.notifications(), 3);

        let output = fx.manager.complete("release");
        assert_eq!(output.as_deref(), Some("drag:release"));
        assert!(!fx.manager.is_in_session());
        assert_eq!(fx.manager.state(), SessionState::Idle);

        // complete never notifies
        assert_eq!(fx.notifications(), 3);
        assert_eq!(
            fx.calls(),
            vec![Call::Update(1), Call::Update(2), Call::Complete("release")]
        );
    }

    #[test]
    fn test_double_begin_rejected() {
        let mut fx = Fixture::new();
        let first = fx.session("drag");
        let second = fx.session("draw");

        fx.manager.begin(first).unwrap();
        let cycle_id = fx.manager.info().unwrap().id;

        let err = fx.manager.begin(second).unwrap_err();
        assert_eq!(
            err,
            SessionError::AlreadyActive {
                kind: "drag",
                id: cycle_id.clone(),
            }
        );

        // Original session is still in charge
        assert_eq!(fx.manager.current().unwrap().kind(), "drag");
        assert_eq!(fx.manager.info().unwrap().id, cycle_id);
        assert_eq!(fx.notifications(), 1);
        assert!(fx.calls().is_empty());
    }

    #[test]
    fn test_update_without_session() {
        let mut fx = Fixture::new();

        let err = fx.manager.update(5).unwrap_err();
        assert_eq!(err, SessionError::NoActiveSession);
        assert_eq!(fx.notifications(), 0);
        assert!(fx.calls().is_empty());
    }

    #[test]
    fn test_complete_without_session() {
        let mut fx = Fixture::new();

        assert!(fx.manager.complete("release").is_none());
        assert!(!fx.manager.is_in_session());
        assert_eq!(fx.notifications(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut fx = Fixture::new();
        let resize = fx.session("resize");

        fx.manager.begin(resize).unwrap().update(7).unwrap();
        let before = fx.notifications();

        fx.manager.cancel("escape");
        assert!(!fx.manager.is_in_session());
        assert_eq!(fx.notifications(), before + 1);
        assert_eq!(fx.calls(), vec![Call::Update(7), Call::Cancel("escape")]);
    }

    #[test]
    fn test_cancel_without_session() {
        let mut fx = Fixture::new();

        let still_idle = fx.manager.cancel("escape").is_in_session();
        assert!(!still_idle);
        assert!(fx.calls().is_empty());
    }

    #[test]
    fn test_quietly_complete() {
        let mut fx = Fixture::new();
        let create = fx.session("create");

        fx.manager.begin(create).unwrap();
        fx.manager.quietly_complete();

        assert!(!fx.manager.is_in_session());
        assert!(fx.calls().is_empty());
        // Only the begin notification
        assert_eq!(fx.notifications(), 1);
    }

    #[test]
    fn test_reused_across_cycles() {
        let mut fx = Fixture::new();

        for name in ["drag", "draw", "transform"] {
            let session = fx.session(name);
            fx.manager.begin(session).unwrap();
            assert_eq!(fx.manager.info().unwrap().kind, name);
            fx.manager.complete("done");
        }

        let cancelled = fx.session("drag");
        fx.manager.begin(cancelled).unwrap().cancel("escape");

        let quiet = fx.session("create");
        fx.manager.begin(quiet).unwrap().quietly_complete();

        assert_eq!(fx.manager.state(), SessionState::Idle);
        // Three begins, one begin + cancel, one begin
        assert_eq!(fx.notifications(), 3 + 2 + 1);
    }

    #[test]
    fn test_info_counts_updates() {
        let mut fx = Fixture::new();
        let draw = fx.session("draw");

        assert!(fx.manager.info().is_none());
        fx.manager.begin(draw).unwrap();
        for step in 0..4 {
            fx.manager.update(step).unwrap();
        }

        let info = fx.manager.info().unwrap();
        assert_eq!(info.kind, "draw");
        assert_eq!(info.updates, 4);
    }

    #[test]
    fn test_boxed_variants() {
        type Dyn = Box<
            dyn Session<Update = i32, Complete = &'static str, Cancel = &'static str, Output = String>
                + Send,
        >;

        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut manager: SessionManager<Dyn> = SessionManager::new(|| {});

        manager
            .begin(Box::new(Recorder {
                name: "rotate",
                calls: Arc::clone(&calls),
            }))
            .unwrap();
        manager.update(90).unwrap();

        assert_eq!(manager.current().unwrap().kind(), "rotate");
        assert_eq!(manager.complete("ok").as_deref(), Some("rotate:ok"));
        assert_eq!(calls.lock().len(), 2);
    }

    #[test]
    fn test_checks_follow_state_table() {
        let mut fx = Fixture::new();

        // Idle
        let idle = fx.manager.state();
        assert_eq!(fx.manager.update(1).is_ok(), idle.accepts(Operation::Update));
        let first = fx.session("drag");
        assert_eq!(fx.manager.begin(first).is_ok(), idle.accepts(Operation::Begin));

        // Active
        let active = fx.manager.state();
        assert_eq!(active, SessionState::Active);
        let second = fx.session("draw");
        assert_eq!(fx.manager.begin(second).is_ok(), active.accepts(Operation::Begin));
        assert_eq!(fx.manager.update(2).is_ok(), active.accepts(Operation::Update));

        // Every accepted operation lands where the table says
        assert_eq!(fx.manager.state(), active.after(Operation::Update));
        fx.manager.cancel("escape");
        assert_eq!(fx.manager.state(), active.after(Operation::Cancel));
        assert_eq!(fx.manager.is_in_session(), fx.manager.state().is_active());
    }
}
