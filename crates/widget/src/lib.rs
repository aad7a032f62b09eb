//! Presentation layer for the session timeline. Renders the session store's
//! state as a small timeline panel and keeps its dynamic regions fresh.
//!
//! # Modules
//!
//! - [`format`]: Clock-time and elapsed-duration formatting
//! - [`view`]: Pure state-to-view mapping ([`WidgetView`])
//! - [`markup`]: HTML rendering of a view
//! - [`document`]: Thin adapter over the hosting document's regions
//! - [`input`]: Capture-phase click / form-submit hooks
//! - [`widget`]: The [`TimelineWidget`] component tying it together

pub mod document;
pub mod format;
pub mod input;
pub mod markup;
pub mod view;
pub mod widget;

pub use document::{Document, MemoryDocument, Region};
pub use input::{ClickTarget, InputEvent, InputOutcome};
pub use view::WidgetView;
pub use widget::TimelineWidget;
