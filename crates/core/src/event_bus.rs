//! Activity notifications. The session store emits an [`Activity`] after
//! every lifecycle change or recorded event.
//!
//! Consumers (the presentation layer, host logging, tests) register an
//! `Arc<dyn ActivityListener>` with the store.

use crate::types::SessionEvent;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// A brand-new session was created (first visit, expiry, corruption or reset).
    SessionStarted { session_id: String },
    /// A persisted session was still valid and has been resumed.
    SessionResumed {
        session_id: String,
        event_count: usize,
    },
    /// An event was appended to the active session.
    EventRecorded {
        session_id: String,
        event: SessionEvent,
    },
}

impl Activity {
    pub fn session_id(&self) -> &str {
        match self {
            Activity::SessionStarted { session_id }
            | Activity::SessionResumed { session_id, .. }
            | Activity::EventRecorded { session_id, .. } => session_id,
        }
    }
}

pub trait ActivityListener: Send + Sync {
    fn on_activity(&self, activity: &Activity);
}

/// Listener that ignores every notification.
pub struct NoOpListener;

impl ActivityListener for NoOpListener {
    fn on_activity(&self, _activity: &Activity) {}
}

/// In-memory listener that captures notifications for testing.
#[derive(Default)]
pub struct CaptureListener {
    activities: Mutex<Vec<Activity>>,
}

impl CaptureListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.activities.lock().len()
    }

    pub fn recorded_events(&self) -> usize {
        self.activities
            .lock()
            .iter()
            .filter(|a| matches!(a, Activity::EventRecorded { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.activities.lock().clear();
    }
}

impl ActivityListener for CaptureListener {
    fn on_activity(&self, activity: &Activity) {
        self.activities.lock().push(activity.clone());
    }
}

pub fn noop_listener() -> Arc<dyn ActivityListener> {
    Arc::new(NoOpListener)
}

pub fn capture_listener() -> Arc<CaptureListener> {
    Arc::new(CaptureListener::new())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_capture_listener() {
        let listener = capture_listener();
        assert_eq!(listener.count(), 0);

        listener.on_activity(&Activity::SessionStarted {
            session_id: "s-1".into(),
        });
        listener.on_activity(&Activity::EventRecorded {
            session_id: "s-1".into(),
            event: SessionEvent::interaction(Utc::now(), "Clicked link: Shop Now"),
        });

        assert_eq!(listener.count(), 2);
        assert_eq!(listener.recorded_events(), 1);
        assert_eq!(listener.activities()[1].session_id(), "s-1");

        listener.clear();
        assert_eq!(listener.count(), 0);
    }

    #[test]
    fn test_noop_listener() {
        let listener = noop_listener();
        listener.on_activity(&Activity::SessionStarted {
            session_id: "s-1".into(),
        });
    }
}
