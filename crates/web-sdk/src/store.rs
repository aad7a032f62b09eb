//! Session store. The single source of truth for session identity, start
//! time and event log.
//!
//! The store resolves the active session from storage when it is created,
//! appends events as they happen and overwrites the persisted record after
//! every mutation. Storage failures never reach the caller: a broken read
//! falls back to a fresh session, and a failed write switches the store into
//! memory-only (degraded) mode for the rest of its lifetime.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use timeline_core::config::TimelineConfig;
use timeline_core::event_bus::{Activity, ActivityListener};
use timeline_core::types::{Session, SessionEvent};
use timeline_core::{Clock, TimelineError, TimelineResult};

use crate::events::page_view_details;
use crate::location::page_name;
use crate::statistics::SessionStatistics;
use crate::storage::KeyValueStore;

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    storage_key: String,
    inactivity_timeout: Duration,
    default_page: String,
    session: Session,
    degraded: bool,
    listeners: Vec<Arc<dyn ActivityListener>>,
}

/// Outcome of reading the persisted record.
enum Loaded {
    Valid(Session),
    Expired(Session),
    Missing,
}

impl SessionStore {
    /// Create a store and resolve the active session from `storage`.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &TimelineConfig,
    ) -> Self {
        Self::with_listeners(storage, clock, config, Vec::new())
    }

    /// Like [`SessionStore::new`], with `listeners` registered before the
    /// session is resolved so they observe the initial
    /// [`Activity::SessionStarted`] or [`Activity::SessionResumed`].
    pub fn with_listeners(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &TimelineConfig,
        listeners: Vec<Arc<dyn ActivityListener>>,
    ) -> Self {
        let now = clock.now();
        let mut store = Self {
            storage,
            clock,
            storage_key: config.storage.key.clone(),
            inactivity_timeout: config.session.inactivity_timeout(),
            default_page: config.widget.default_page.clone(),
            session: Session::new(now),
            degraded: false,
            listeners,
        };
        store.resolve_or_create_session();
        store
    }

    /// Register a listener notified after every later session change.
    pub fn with_listener(mut self, listener: Arc<dyn ActivityListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Load the persisted session if it is present, parseable and still
    /// within the inactivity threshold; otherwise start and persist a new one.
    pub fn resolve_or_create_session(&mut self) -> &Session {
        let now = self.clock.now();
        match self.load_persisted(now) {
            Loaded::Valid(session) => {
                info!(
                    session_id = %session.session_id,
                    events = session.events.len(),
                    "resumed persisted session"
                );
                self.session = session;
                self.notify(Activity::SessionResumed {
                    session_id: self.session.session_id.clone(),
                    event_count: self.session.events.len(),
                });
            }
            Loaded::Expired(session) => {
                info!(
                    session_id = %session.session_id,
                    last_activity = %session.last_activity(),
                    "persisted session expired"
                );
                self.start_new_session(now);
            }
            Loaded::Missing => self.start_new_session(now),
        }
        &self.session
    }

    /// Record a page view for the page named by the final path segment of
    /// `location`.
    pub fn record_page_view(&mut self, location: &str) -> SessionEvent {
        let page = page_name(location, &self.default_page);
        let time = self.session.next_event_time(self.clock.now());
        let details = page_view_details(&page);
        self.append(SessionEvent::page_view(page, time, details))
    }

    /// Record a free-text interaction at the current time.
    pub fn record_interaction(&mut self, details: impl Into<String>) -> SessionEvent {
        let time = self.session.next_event_time(self.clock.now());
        self.append(SessionEvent::interaction(time, details))
    }

    /// Discard the active session and start a fresh one.
    pub fn reset(&mut self) -> &Session {
        let previous = self.session.session_id.clone();
        self.start_new_session(self.clock.now());
        info!(previous = %previous, session_id = %self.session.session_id, "session reset");
        &self.session
    }

    pub fn compute_statistics(&self) -> SessionStatistics {
        SessionStatistics::compute(&self.session, self.clock.now())
    }

    pub fn statistics_at(&self, now: DateTime<Utc>) -> SessionStatistics {
        SessionStatistics::compute(&self.session, now)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// True once a storage write has failed; the store then keeps tracking
    /// in memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Pretty-printed JSON of the active session, in the persisted layout.
    pub fn export_json(&self) -> TimelineResult<String> {
        Ok(serde_json::to_string_pretty(&self.session)?)
    }

    fn append(&mut self, event: SessionEvent) -> SessionEvent {
        self.session.push(event.clone());
        metrics::counter!("timeline.events_recorded").increment(1);
        debug!(
            session_id = %self.session.session_id,
            page_view = event.is_page_view(),
            details = %event.details(),
            "event recorded"
        );
        self.persist();
        self.notify(Activity::EventRecorded {
            session_id: self.session.session_id.clone(),
            event: event.clone(),
        });
        event
    }

    fn start_new_session(&mut self, now: DateTime<Utc>) {
        self.session = Session::new(now);
        metrics::counter!("timeline.sessions_started").increment(1);
        info!(session_id = %self.session.session_id, "started new session");
        self.persist();
        self.notify(Activity::SessionStarted {
            session_id: self.session.session_id.clone(),
        });
    }

    fn load_persisted(&self, now: DateTime<Utc>) -> Loaded {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Missing,
            Err(e) => {
                warn!(
                    backend = self.storage.backend(),
                    error = %e,
                    "failed to read persisted session, starting fresh"
                );
                return Loaded::Missing;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_expired(now, self.inactivity_timeout) => {
                Loaded::Expired(session)
            }
            Ok(session) => Loaded::Valid(session),
            Err(e) => {
                warn!(
                    key = %self.storage_key,
                    error = %e,
                    "discarding malformed persisted session"
                );
                Loaded::Missing
            }
        }
    }

    /// Overwrite the persisted record with the whole session.
    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let result = serde_json::to_string(&self.session)
            .map_err(TimelineError::from)
            .and_then(|json| self.storage.set(&self.storage_key, &json));
        if let Err(e) = result {
            metrics::counter!("timeline.persist_failures").increment(1);
            warn!(
                backend = self.storage.backend(),
                error = %e,
                "failed to persist session, continuing in memory only"
            );
            self.degraded = true;
        }
    }

    fn notify(&self, activity: Activity) {
        for listener in &self.listeners {
            listener.on_activity(&activity);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::UnavailableStorage;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use timeline_core::clock::{manual_clock, ManualClock};
    use timeline_core::event_bus::capture_listener;

    const T: i64 = 1_700_000_000_000;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn persisted(storage: &MemoryStorage) -> Session {
        serde_json::from_str(&storage.get("session_timeline").unwrap().unwrap()).unwrap()
    }

    fn seeded_storage() -> Arc<MemoryStorage> {
        let mut session = Session::new(at(T));
        session.session_id = "session_old".into();
        session.push(SessionEvent::page_view(
            "index.html",
            at(T + 5_000),
            "Viewed page: index.html",
        ));
        Arc::new(
            MemoryStorage::new()
                .with_entry("session_timeline", serde_json::to_string(&session).unwrap()),
        )
    }

    fn open(storage: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> SessionStore {
        SessionStore::new(storage, clock, &TimelineConfig::default())
    }

    #[test]
    fn test_creates_and_persists_when_absent() {
        let storage = Arc::new(MemoryStorage::new());
        let store = open(storage.clone(), manual_clock(at(T)));

        assert!(store.session().events.is_empty());
        assert_eq!(store.session().started_at, at(T));
        assert_eq!(persisted(&storage), *store.session());
    }

    #[test]
    fn test_expired_session_is_replaced() {
        let storage = seeded_storage();
        let store = open(storage.clone(), manual_clock(at(T + 5_000 + 3_600_001)));

        assert_ne!(store.session().session_id, "session_old");
        assert!(store.session().events.is_empty());
        assert_eq!(persisted(&storage).session_id, store.session().session_id);
    }

    #[test]
    fn test_idle_time_counts_from_latest_event() {
        // Over an hour since start, but under an hour since the page view.
        let storage = seeded_storage();
        let store = open(storage, manual_clock(at(T + 3_600_001)));

        assert_eq!(store.session().session_id, "session_old");
        assert_eq!(store.session().events.len(), 1);
    }

    #[test]
    fn test_valid_session_is_reused_verbatim() {
        let storage = seeded_storage();
        let clock = manual_clock(at(T + 5_000 + 3_599_999));
        let mut store = open(storage.clone(), clock.clone());

        assert_eq!(store.session().session_id, "session_old");
        assert_eq!(store.session().events.len(), 1);

        store.record_interaction("Clicked link: Shop Now");
        assert_eq!(store.session().events.len(), 2);
        assert_eq!(persisted(&storage).events.len(), 2);
        assert_eq!(persisted(&storage).session_id, "session_old");
    }

    #[test]
    fn test_threshold_measured_from_start_when_no_events() {
        let mut session = Session::new(at(T));
        session.session_id = "session_empty".into();
        let storage = Arc::new(
            MemoryStorage::new()
                .with_entry("session_timeline", serde_json::to_string(&session).unwrap()),
        );

        let store = open(storage.clone(), manual_clock(at(T + 3_599_999)));
        assert_eq!(store.session().session_id, "session_empty");

        let store = open(storage, manual_clock(at(T + 3_599_999 + 3_600_000)));
        assert_ne!(store.session().session_id, "session_empty");
    }

    #[test]
    fn test_malformed_data_behaves_like_absent() {
        let storage =
            Arc::new(MemoryStorage::new().with_entry("session_timeline", "{not json"));
        let store = open(storage.clone(), manual_clock(at(T)));

        assert!(store.session().events.is_empty());
        assert_eq!(persisted(&storage), *store.session());
    }

    #[test]
    fn test_record_page_view_uses_last_path_segment() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(storage, manual_clock(at(T)));

        let event = store.record_page_view("https://shop.example/catalog/shoes.html");
        assert_eq!(
            event,
            SessionEvent::page_view("shoes.html", at(T), "Viewed page: shoes.html")
        );

        let event = store.record_page_view("/");
        assert!(matches!(event, SessionEvent::PageView { ref page, .. } if page == "index.html"));
    }

    #[test]
    fn test_events_stay_ordered_when_clock_steps_back() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = manual_clock(at(T + 10_000));
        let mut store = open(storage, clock.clone());

        store.record_interaction("Clicked link: Shop Now");
        clock.set(at(T + 2_000));
        store.record_interaction("Submitted form: Newsletter signup");
        clock.set(at(T + 20_000));
        store.record_page_view("/cart.html");

        let times: Vec<_> = store.session().events.iter().map(|e| e.time()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(times[1], at(T + 10_000));
    }

    #[test]
    fn test_statistics_for_click_description() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(storage, manual_clock(at(T)));

        let before = store.compute_statistics();
        store.record_interaction("Clicked link: Shop Now");
        let after = store.compute_statistics();

        assert_eq!(after.total_clicks, before.total_clicks + 1);
        assert_eq!(after.forms_submitted, before.forms_submitted);
    }

    #[test]
    fn test_statistics_duration_uses_clock() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = manual_clock(at(T));
        let store = open(storage, clock.clone());

        clock.advance(Duration::milliseconds(150_000));
        assert_eq!(store.compute_statistics().duration_minutes, 2);
        assert_eq!(store.statistics_at(at(T + 60_000)).duration_minutes, 1);
    }

    #[test]
    fn test_listeners_are_notified() {
        let storage = Arc::new(MemoryStorage::new());
        let listener = capture_listener();
        let mut store = open(storage, manual_clock(at(T))).with_listener(listener.clone());

        store.record_page_view("/index.html");
        store.record_interaction("Clicked link: Shop Now");
        store.reset();

        let activities = listener.activities();
        assert_eq!(listener.recorded_events(), 2);
        assert!(matches!(activities[2], Activity::SessionStarted { .. }));
    }

    #[test]
    fn test_listeners_see_initial_session_start() {
        let listener = capture_listener();
        let store = SessionStore::with_listeners(
            Arc::new(MemoryStorage::new()),
            manual_clock(at(T)),
            &TimelineConfig::default(),
            vec![listener.clone() as Arc<dyn ActivityListener>],
        );

        assert_eq!(listener.count(), 1);
        match &listener.activities()[0] {
            Activity::SessionStarted { session_id } => {
                assert_eq!(session_id, &store.session().session_id)
            }
            other => panic!("unexpected activity {other:?}"),
        }
    }

    #[test]
    fn test_listeners_see_resumed_session() {
        let listener = capture_listener();
        let _store = SessionStore::with_listeners(
            seeded_storage(),
            manual_clock(at(T + 6_000)),
            &TimelineConfig::default(),
            vec![listener.clone() as Arc<dyn ActivityListener>],
        );

        assert_eq!(
            listener.activities(),
            vec![Activity::SessionResumed {
                session_id: "session_old".into(),
                event_count: 1,
            }]
        );
    }

    #[test]
    fn test_reset_starts_fresh_session() {
        let storage = seeded_storage();
        let mut store = open(storage.clone(), manual_clock(at(T + 6_000)));
        assert_eq!(store.session().session_id, "session_old");

        store.reset();
        assert_ne!(store.session().session_id, "session_old");
        assert!(store.session().events.is_empty());
        assert_eq!(persisted(&storage).session_id, store.session().session_id);
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let mut store = open(Arc::new(UnavailableStorage), manual_clock(at(T)));
        assert!(store.is_degraded());

        store.record_page_view("/index.html");
        store.record_interaction("Clicked link: Shop Now");
        assert_eq!(store.session().events.len(), 2);
        assert_eq!(store.compute_statistics().total_clicks, 1);
    }

    struct WriteOnceStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl KeyValueStore for WriteOnceStorage {
        fn backend(&self) -> &str {
            "write-once"
        }
        fn get(&self, key: &str) -> TimelineResult<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> TimelineResult<()> {
            if self.writes.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(TimelineError::Storage("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> TimelineResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_write_failure_keeps_tracking_in_memory() {
        let storage = Arc::new(WriteOnceStorage {
            inner: MemoryStorage::new(),
            writes: Default::default(),
        });
        let mut store = open(storage.clone(), manual_clock(at(T)));
        assert!(!store.is_degraded());

        store.record_interaction("Clicked link: Shop Now");
        assert!(store.is_degraded());
        assert_eq!(store.session().events.len(), 1);

        let on_disk: Session =
            serde_json::from_str(&storage.inner.get("session_timeline").unwrap().unwrap())
                .unwrap();
        assert!(on_disk.events.is_empty());
    }

    #[test]
    fn test_export_json_matches_persisted_layout() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = open(storage, manual_clock(at(T)));
        store.record_page_view("/index.html");

        let exported: serde_json::Value =
            serde_json::from_str(&store.export_json().unwrap()).unwrap();
        assert_eq!(exported["startedAt"], T);
        assert_eq!(exported["events"][0]["type"], "pageview");
    }
}
