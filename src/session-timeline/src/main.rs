//! Session Timeline: host for the timeline widget.
//!
//! Each invocation plays one turn of a hosting page: it resolves the active
//! session from the data directory, mounts the widget, applies the requested
//! activity and prints the resulting panel.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use timeline_core::clock::system_clock;
use timeline_core::config::TimelineConfig;
use timeline_web_sdk::storage::{unavailable_storage, KeyValueStore};
use timeline_web_sdk::{FileStorage, SessionStore};
use timeline_widget::markup;
use timeline_widget::{ClickTarget, InputEvent, MemoryDocument, Region, TimelineWidget};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "session-timeline")]
#[command(about = "Record page views and interactions into a local session timeline")]
#[command(version)]
struct Cli {
    /// Directory holding the persisted session (overrides config)
    #[arg(long, env = "SESSION_TIMELINE__STORAGE__DATA_DIR")]
    data_dir: Option<String>,

    /// Storage key the session is persisted under (overrides config)
    #[arg(long, env = "SESSION_TIMELINE__STORAGE__KEY")]
    storage_key: Option<String>,

    /// Inactivity timeout in seconds (overrides config)
    #[arg(long, env = "SESSION_TIMELINE__SESSION__INACTIVITY_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Print the panel as JSON instead of markup
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Render the timeline collapsed
    #[arg(long, default_value_t = false)]
    collapsed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a page view for a URL or path
    Visit { location: String },
    /// Click the page's primary action
    Click,
    /// Submit a form
    Submit {
        #[arg(long)]
        form_id: Option<String>,
    },
    /// Record a free-text interaction
    Interact { description: String },
    /// Print the panel without recording anything
    Show,
    /// Print the derived statistics
    Stats,
    /// Discard the active session and start a new one
    Reset,
    /// Print the persisted session record
    Export,
    /// Run the one-second duration tick a number of times
    Watch {
        #[arg(long, default_value_t = 5)]
        ticks: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "session_timeline=info,timeline_web_sdk=info,timeline_widget=info".into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = TimelineConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        TimelineConfig::default()
    });

    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(key) = cli.storage_key {
        config.storage.key = key;
    }
    if let Some(secs) = cli.timeout_secs {
        config.session.inactivity_timeout_secs = secs;
    }
    config.validate()?;

    info!(
        data_dir = %config.storage.data_dir,
        key = %config.storage.key,
        inactivity_timeout_secs = config.session.inactivity_timeout_secs,
        "Configuration loaded"
    );

    let storage: Arc<dyn KeyValueStore> = match FileStorage::open(&config.storage.data_dir) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(error = %e, "Local storage unavailable, tracking in memory only");
            unavailable_storage()
        }
    };

    let store = SessionStore::new(storage, system_clock(), &config);
    let mut widget = TimelineWidget::new(store, MemoryDocument::new(), &config.widget)
        .with_expanded(!cli.collapsed);
    widget.mount();

    match cli.command {
        Command::Visit { location } => {
            widget.record_page_view(&location);
        }
        Command::Click => {
            widget.handle_input(&InputEvent::click(ClickTarget::PrimaryAction));
        }
        Command::Submit { form_id } => {
            widget.handle_input(&InputEvent::form_submit(form_id));
        }
        Command::Interact { description } => {
            widget.record_interaction(description);
        }
        Command::Show => {}
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&widget.statistics())?);
            return Ok(());
        }
        Command::Reset => widget.reset_session(),
        Command::Export => {
            println!("{}", widget.store().export_json()?);
            return Ok(());
        }
        Command::Watch { ticks } => {
            watch(&mut widget, config.session.tick_interval(), ticks).await;
            return Ok(());
        }
    }

    if widget.store().is_degraded() {
        warn!("Session could not be persisted; changes will be lost on exit");
    }

    let view = widget.view();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", markup::render_widget(&view));
    }

    Ok(())
}

/// Drive the duration tick on a fixed interval and print each refresh.
async fn watch(
    widget: &mut TimelineWidget<MemoryDocument>,
    period: std::time::Duration,
    ticks: u64,
) {
    let mut interval = tokio::time::interval(period);
    for _ in 0..ticks {
        interval.tick().await;
        widget.tick();
        if let Some(elapsed) = widget.document().region(Region::Duration) {
            println!("{elapsed}");
        }
    }
}
