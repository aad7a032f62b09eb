//! Derived per-session statistics. Nothing here is persisted; values are
//! recomputed from the event log on demand.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use timeline_core::types::{Session, SessionEvent};

use crate::events::InteractionKind;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatistics {
    /// Whole minutes since the session started.
    pub duration_minutes: u64,
    pub pages_viewed: u64,
    pub total_clicks: u64,
    pub forms_submitted: u64,
}

impl SessionStatistics {
    pub fn compute(session: &Session, now: DateTime<Utc>) -> Self {
        let mut stats = SessionStatistics {
            duration_minutes: elapsed(session, now).num_minutes().max(0) as u64,
            ..Default::default()
        };

        for event in &session.events {
            match event {
                SessionEvent::PageView { .. } => stats.pages_viewed += 1,
                SessionEvent::Interaction { details, .. } => {
                    match InteractionKind::classify(details) {
                        InteractionKind::Click => stats.total_clicks += 1,
                        InteractionKind::FormSubmit => stats.forms_submitted += 1,
                        InteractionKind::Other => {}
                    }
                }
            }
        }
        stats
    }
}

/// Time since the session started, clamped at zero.
pub fn elapsed(session: &Session, now: DateTime<Utc>) -> Duration {
    (now - session.started_at).max(Duration::zero())
}
