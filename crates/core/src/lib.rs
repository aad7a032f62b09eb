pub mod clock;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TimelineConfig;
pub use error::{TimelineError, TimelineResult};
pub use event_bus::{Activity, ActivityListener};
pub use types::{Session, SessionEvent};
