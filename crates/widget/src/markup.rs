//! HTML rendering of a [`WidgetView`]. Every user-provided string is escaped.

use crate::document::Region;
use crate::view::{HeaderView, StatsView, TimelineEntryView, WidgetView};

/// The complete widget structure appended to the document body on mount.
pub fn render_widget(view: &WidgetView) -> String {
    let panel_attrs = if view.expanded {
        r#" class="st-panel st-expanded""#
    } else {
        r#" class="st-panel st-collapsed" hidden"#
    };
    format!(
        concat!(
            r#"<div id="{root}" class="st-widget">"#,
            r#"<button id="{toggle}" class="st-toggle" type="button" aria-expanded="{expanded}">Session timeline</button>"#,
            r#"<div id="{panel}"{panel_attrs}>"#,
            r#"<header id="{header}" class="st-header">{header_inner}</header>"#,
            r#"<section id="{stats}" class="st-stats">{stats_inner}</section>"#,
            r#"<ol id="{events}" class="st-events">{events_inner}</ol>"#,
            "</div></div>"
        ),
        root = Region::Root.id(),
        toggle = Region::Toggle.id(),
        expanded = view.expanded,
        panel = Region::Panel.id(),
        panel_attrs = panel_attrs,
        header = Region::Header.id(),
        header_inner = render_header(&view.header),
        stats = Region::Stats.id(),
        stats_inner = render_stats(&view.stats),
        events = Region::Timeline.id(),
        events_inner = render_timeline(&view.timeline),
    )
}

pub fn render_header(header: &HeaderView) -> String {
    format!(
        r#"<strong>Session</strong> <code>{}</code> <span class="st-started">Started {}</span>"#,
        escape_html(&header.session_id),
        escape_html(&header.started_at),
    )
}

/// Inner content of the statistics region, including the duration region.
pub fn render_stats(stats: &StatsView) -> String {
    let s = &stats.statistics;
    format!(
        concat!(
            r#"<div class="st-stat"><span class="st-label">Duration</span> <span id="{duration}">{elapsed}</span> <span class="st-minutes">({minutes} min)</span></div>"#,
            r#"<div class="st-stat"><span class="st-label">Events</span> <span class="st-event-count">{events}</span></div>"#,
            r#"<div class="st-stat"><span class="st-label">Pages viewed</span> <span>{pages}</span></div>"#,
            r#"<div class="st-stat"><span class="st-label">Clicks</span> <span>{clicks}</span></div>"#,
            r#"<div class="st-stat"><span class="st-label">Forms submitted</span> <span>{forms}</span></div>"#,
        ),
        duration = Region::Duration.id(),
        elapsed = escape_html(&stats.elapsed),
        minutes = s.duration_minutes,
        events = stats.event_count,
        pages = s.pages_viewed,
        clicks = s.total_clicks,
        forms = s.forms_submitted,
    )
}

/// Inner content of the event list region.
pub fn render_timeline(entries: &[TimelineEntryView]) -> String {
    if entries.is_empty() {
        return r#"<li class="st-empty">No activity yet</li>"#.to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                r#"<li class="st-event {}"><time>{}</time> <span class="st-title">{}</span> <span class="st-details">{}</span></li>"#,
                entry.kind.css_class(),
                escape_html(&entry.time),
                escape_html(&entry.title),
                escape_html(&entry.details),
            )
        })
        .collect()
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
