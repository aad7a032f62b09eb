//! Pure mapping from session state to a description of the visible panel.
//!
//! Nothing here touches a document; [`crate::markup`] turns these views into
//! markup and [`crate::document`] applies it.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use timeline_core::types::{Session, SessionEvent};
use timeline_web_sdk::events::InteractionKind;
use timeline_web_sdk::statistics::{self, SessionStatistics};

use crate::format;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetView {
    pub expanded: bool,
    pub header: HeaderView,
    pub stats: StatsView,
    pub timeline: Vec<TimelineEntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub session_id: String,
    pub started_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    /// Live elapsed figure, refreshed by the tick.
    pub elapsed: String,
    pub event_count: usize,
    #[serde(flatten)]
    pub statistics: SessionStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    PageView,
    Click,
    FormSubmit,
    Interaction,
}

impl EntryKind {
    pub fn of(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::PageView { .. } => EntryKind::PageView,
            SessionEvent::Interaction { details, .. } => match InteractionKind::classify(details) {
                InteractionKind::Click => EntryKind::Click,
                InteractionKind::FormSubmit => EntryKind::FormSubmit,
                InteractionKind::Other => EntryKind::Interaction,
            },
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            EntryKind::PageView => "st-event-pageview",
            EntryKind::Click => "st-event-click",
            EntryKind::FormSubmit => "st-event-form",
            EntryKind::Interaction => "st-event-interaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntryView {
    pub kind: EntryKind,
    pub time: String,
    pub title: String,
    pub details: String,
}

/// Full panel view.
pub fn render(
    session: &Session,
    now: DateTime<Utc>,
    expanded: bool,
    offset: &FixedOffset,
) -> WidgetView {
    WidgetView {
        expanded,
        header: render_header(session, offset),
        stats: render_stats(session, now),
        timeline: render_timeline(session, offset),
    }
}

pub fn render_header(session: &Session, offset: &FixedOffset) -> HeaderView {
    HeaderView {
        session_id: session.session_id.clone(),
        started_at: format::clock_time(session.started_at, offset),
    }
}

pub fn render_stats(session: &Session, now: DateTime<Utc>) -> StatsView {
    StatsView {
        elapsed: render_elapsed(session, now),
        event_count: session.events.len(),
        statistics: SessionStatistics::compute(session, now),
    }
}

pub fn render_elapsed(session: &Session, now: DateTime<Utc>) -> String {
    format::elapsed(statistics::elapsed(session, now))
}

/// Timeline entries in chronological order.
pub fn render_timeline(session: &Session, offset: &FixedOffset) -> Vec<TimelineEntryView> {
    session
        .events
        .iter()
        .map(|event| {
            let kind = EntryKind::of(event);
            let title = match (event, kind) {
                (SessionEvent::PageView { page, .. }, _) => page.clone(),
                (_, EntryKind::Click) => "Click".to_string(),
                (_, EntryKind::FormSubmit) => "Form submission".to_string(),
                _ => "Interaction".to_string(),
            };
            TimelineEntryView {
                kind,
                time: format::clock_time(event.time(), offset),
                title,
                details: event.details().to_string(),
            }
        })
        .collect()
}
