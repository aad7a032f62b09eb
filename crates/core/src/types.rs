use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// A single recorded occurrence within a session.
///
/// Serialized with a `type` tag of `pageview` or `interaction`; timestamps
/// are integer epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "pageview")]
    PageView {
        page: String,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
        details: String,
    },
    #[serde(rename = "interaction")]
    Interaction {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        time: DateTime<Utc>,
        details: String,
    },
}

impl SessionEvent {
    pub fn page_view(
        page: impl Into<String>,
        time: DateTime<Utc>,
        details: impl Into<String>,
    ) -> Self {
        SessionEvent::PageView {
            page: page.into(),
            time: time.trunc_subsecs(3),
            details: details.into(),
        }
    }

    pub fn interaction(time: DateTime<Utc>, details: impl Into<String>) -> Self {
        SessionEvent::Interaction {
            time: time.trunc_subsecs(3),
            details: details.into(),
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::PageView { time, .. } | SessionEvent::Interaction { time, .. } => *time,
        }
    }

    pub fn details(&self) -> &str {
        match self {
            SessionEvent::PageView { details, .. } | SessionEvent::Interaction { details, .. } => {
                details
            }
        }
    }

    pub fn is_page_view(&self) -> bool {
        matches!(self, SessionEvent::PageView { .. })
    }
}

/// The visitor's active tracking window: identity, start time and the
/// append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    pub events: Vec<SessionEvent>,
}

impl Session {
    /// Start an empty session with a freshly generated identifier.
    pub fn new(now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            session_id: generate_session_id(now),
            started_at: now,
            events: Vec::new(),
        }
    }

    /// Latest event time, or the start time for an empty log.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.events
            .iter()
            .map(SessionEvent::time)
            .max()
            .unwrap_or(self.started_at)
    }

    /// A session stays valid while `now - last_activity` is strictly below
    /// the inactivity threshold.
    pub fn is_expired(&self, now: DateTime<Utc>, inactivity_timeout: Duration) -> bool {
        now - self.last_activity() >= inactivity_timeout
    }

    /// Timestamp to stamp the next event with. Never earlier than the last
    /// event so the log stays ordered even if the wall clock steps back.
    pub fn next_event_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(3);
        match self.events.last() {
            Some(last) if last.time() > now => last.time(),
            _ => now,
        }
    }

    pub fn push(&mut self, event: SessionEvent) {
        debug_assert!(
            self.events
                .last()
                .map_or(true, |last| last.time() <= event.time()),
            "session events must be appended in time order"
        );
        self.events.push(event);
    }

    pub fn page_views(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events.iter().filter(|e| e.is_page_view())
    }

    pub fn interactions(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events.iter().filter(|e| !e.is_page_view())
    }
}

/// `session_<epoch-ms>_<9 base-36 chars>`.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}
