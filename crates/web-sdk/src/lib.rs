#![warn(clippy::unwrap_used)]

//! Session store for the timeline widget: session lifecycle, event capture,
//! derived statistics and persistence to a local key-value store.
//!
//! # Modules
//!
//! - [`events`]: Interaction descriptions and their click / form markers
//! - [`location`]: Page-name extraction from the current location
//! - [`statistics`]: Derived per-session statistics
//! - [`storage`]: Key-value storage backends (memory, file, unavailable)
//! - [`store`]: The session store itself

pub mod events;
pub mod location;
pub mod statistics;
pub mod storage;
pub mod store;

pub use events::InteractionKind;
pub use statistics::SessionStatistics;
pub use storage::file::FileStorage;
pub use storage::memory::MemoryStorage;
pub use storage::KeyValueStore;
pub use store::SessionStore;
