//! Global input hooks. The widget observes clicks and form submissions in
//! the capture phase, so it sees them even when an inner handler stops
//! propagation.

use serde::{Deserialize, Serialize};

use timeline_core::types::SessionEvent;

/// What a click landed on, as resolved by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// The page's designated primary action.
    PrimaryAction,
    /// The widget's own expand/collapse control.
    Toggle,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Click {
        target: ClickTarget,
        /// Set when an inner handler called `stopPropagation`; capture-phase
        /// hooks still observe the event.
        #[serde(default)]
        propagation_stopped: bool,
    },
    FormSubmit {
        #[serde(default)]
        form_id: Option<String>,
        #[serde(default)]
        propagation_stopped: bool,
    },
}

impl InputEvent {
    pub fn click(target: ClickTarget) -> Self {
        InputEvent::Click {
            target,
            propagation_stopped: false,
        }
    }

    pub fn form_submit(form_id: Option<String>) -> Self {
        InputEvent::FormSubmit {
            form_id,
            propagation_stopped: false,
        }
    }

    /// Same input with propagation stopped by an inner handler.
    pub fn stopped(self) -> Self {
        match self {
            InputEvent::Click { target, .. } => InputEvent::Click {
                target,
                propagation_stopped: true,
            },
            InputEvent::FormSubmit { form_id, .. } => InputEvent::FormSubmit {
                form_id,
                propagation_stopped: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Recorded(SessionEvent),
    Toggled { expanded: bool },
    Ignored,
}
