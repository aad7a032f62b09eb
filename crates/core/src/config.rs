use serde::Deserialize;

use crate::error::{TimelineError, TimelineResult};

/// Storage key the active session is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "session_timeline";

/// Inactivity threshold after which a persisted session is discarded.
pub const DEFAULT_INACTIVITY_TIMEOUT_SECS: u64 = 60 * 60;

/// Root widget configuration. Compiled-in defaults, optionally overridden
/// from environment variables with the prefix `SESSION_TIMELINE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Directory used by file-backed storage in the host binary.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    /// Page name used when the location path has no final segment.
    #[serde(default = "default_page")]
    pub default_page: String,
    #[serde(default = "default_primary_action_description")]
    pub primary_action_description: String,
    #[serde(default = "default_form_submit_description")]
    pub form_submit_description: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_data_dir() -> String {
    ".session-timeline".to_string()
}
fn default_inactivity_timeout_secs() -> u64 {
    DEFAULT_INACTIVITY_TIMEOUT_SECS
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_page() -> String {
    "index.html".to_string()
}
fn default_primary_action_description() -> String {
    "Clicked link: Shop Now".to_string()
}
fn default_form_submit_description() -> String {
    "Submitted form: Newsletter signup".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            default_page: default_page(),
            primary_action_description: default_primary_action_description(),
            form_submit_description: default_form_submit_description(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
            widget: WidgetConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Saturates at `chrono::Duration::MAX` for values past its range.
    pub fn inactivity_timeout(&self) -> chrono::Duration {
        i64::try_from(self.inactivity_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl TimelineConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn load() -> TimelineResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SESSION_TIMELINE")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no session could sensibly use.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.storage.key.is_empty() {
            return Err(TimelineError::Config("storage.key must not be empty".into()));
        }
        if self.session.inactivity_timeout_secs == 0 {
            return Err(TimelineError::Config(
                "session.inactivity_timeout_secs must be positive".into(),
            ));
        }
        let in_range = i64::try_from(self.session.inactivity_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .is_some();
        if !in_range {
            return Err(TimelineError::Config(format!(
                "session.inactivity_timeout_secs out of range: {}",
                self.session.inactivity_timeout_secs
            )));
        }
        Ok(())
    }
}
