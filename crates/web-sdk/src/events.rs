//! Interaction descriptions recorded by the widget and the markers the
//! statistics use to classify them.

use serde::{Deserialize, Serialize};

/// Interaction descriptions containing this marker count as clicks.
pub const CLICK_MARKER: &str = "Clicked";

/// Interaction descriptions containing this marker count as form submissions.
pub const FORM_SUBMIT_MARKER: &str = "Submitted form";

/// Prefix of every page-view description.
pub const PAGE_VIEW_PREFIX: &str = "Viewed page";

/// Classification of a free-text interaction description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Click,
    FormSubmit,
    Other,
}

impl InteractionKind {
    pub fn classify(details: &str) -> Self {
        if details.contains(CLICK_MARKER) {
            InteractionKind::Click
        } else if details.contains(FORM_SUBMIT_MARKER) {
            InteractionKind::FormSubmit
        } else {
            InteractionKind::Other
        }
    }
}

/// Human-readable description stored with a page view.
pub fn page_view_details(page: &str) -> String {
    format!("{PAGE_VIEW_PREFIX}: {page}")
}
