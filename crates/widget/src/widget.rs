//! The timeline widget, an explicitly constructed component owned by the
//! hosting page. It owns the session store and a document adapter, renders
//! the full panel once on mount, and afterwards patches only the statistics,
//! event list and duration regions.

use chrono::{FixedOffset, Local};
use tracing::{debug, info};

use timeline_core::config::WidgetConfig;
use timeline_core::types::SessionEvent;
use timeline_web_sdk::{SessionStatistics, SessionStore};

use crate::document::{Document, Region};
use crate::input::{ClickTarget, InputEvent, InputOutcome};
use crate::markup;
use crate::view::{self, WidgetView};

pub struct TimelineWidget<D: Document> {
    store: SessionStore,
    document: D,
    offset: FixedOffset,
    expanded: bool,
    mounted: bool,
    primary_action_description: String,
    form_submit_description: String,
}

impl<D: Document> TimelineWidget<D> {
    pub fn new(store: SessionStore, document: D, config: &WidgetConfig) -> Self {
        Self {
            store,
            document,
            offset: *Local::now().offset(),
            expanded: true,
            mounted: false,
            primary_action_description: config.primary_action_description.clone(),
            form_submit_description: config.form_submit_description.clone(),
        }
    }

    /// Display times in `offset` instead of the host's local offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Start collapsed or expanded.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Initial full render: toggle, header, statistics and event list.
    pub fn mount(&mut self) {
        let view = self.view();
        self.document.append_to_body(&markup::render_widget(&view));
        self.document.set_visible(Region::Panel, self.expanded);
        self.mounted = true;
        info!(
            session_id = %view.header.session_id,
            events = view.timeline.len(),
            "timeline widget mounted"
        );
    }

    /// Current state of the whole panel.
    pub fn view(&self) -> WidgetView {
        view::render(self.store.session(), self.store.now(), self.expanded, &self.offset)
    }

    /// Re-render the statistics block and event list after a store mutation.
    pub fn on_activity(&mut self) {
        if !self.mounted {
            return;
        }
        let session = self.store.session();
        let stats = markup::render_stats(&view::render_stats(session, self.store.now()));
        let events = markup::render_timeline(&view::render_timeline(session, &self.offset));

        self.patch(Region::Stats, &stats);
        self.patch(Region::Timeline, &events);
    }

    /// Refresh the elapsed-duration figure. Driven by a fixed one-second
    /// timer, independent of event activity.
    pub fn tick(&mut self) {
        if !self.mounted {
            return;
        }
        let elapsed = view::render_elapsed(self.store.session(), self.store.now());
        self.patch(Region::Duration, &markup::escape_html(&elapsed));
    }

    /// Flip the timeline between expanded and collapsed. Not persisted.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        if self.mounted && !self.document.set_visible(Region::Panel, self.expanded) {
            debug!(region = Region::Panel.id(), "toggle target missing, skipped");
        }
        debug!(expanded = self.expanded, "timeline toggled");
        self.expanded
    }

    pub fn record_page_view(&mut self, location: &str) -> SessionEvent {
        let event = self.store.record_page_view(location);
        self.on_activity();
        event
    }

    pub fn record_interaction(&mut self, details: impl Into<String>) -> SessionEvent {
        let event = self.store.record_interaction(details);
        self.on_activity();
        event
    }

    /// Capture-phase hook for global click and submit input.
    pub fn handle_input(&mut self, input: &InputEvent) -> InputOutcome {
        match input {
            InputEvent::Click {
                target: ClickTarget::Toggle,
                ..
            } => InputOutcome::Toggled {
                expanded: self.toggle(),
            },
            InputEvent::Click {
                target: ClickTarget::PrimaryAction,
                ..
            } => {
                let description = self.primary_action_description.clone();
                InputOutcome::Recorded(self.record_interaction(description))
            }
            InputEvent::Click {
                target: ClickTarget::Other,
                ..
            } => InputOutcome::Ignored,
            InputEvent::FormSubmit { form_id, .. } => {
                debug!(form_id = ?form_id, "form submission observed");
                let description = self.form_submit_description.clone();
                InputOutcome::Recorded(self.record_interaction(description))
            }
        }
    }

    /// Start a fresh session and redraw the header and dynamic regions.
    pub fn reset_session(&mut self) {
        self.store.reset();
        if !self.mounted {
            return;
        }
        let header = view::render_header(self.store.session(), &self.offset);
        self.patch(Region::Header, &markup::render_header(&header));
        self.on_activity();
    }

    pub fn statistics(&self) -> SessionStatistics {
        self.store.compute_statistics()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    fn patch(&mut self, region: Region, markup: &str) {
        if !self.document.replace_region(region, markup) {
            debug!(region = region.id(), "render target missing, skipped");
        }
    }
}
