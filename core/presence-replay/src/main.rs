//! presence-replay: debug utility for the presence state core.
//!
//! Replays a JSON-lines script of host events (project/file open, access,
//! close, rename, dispose) against an in-memory host, then prints which
//! project and file would be presented, with every matcher field.
//!
//! Logs go to stderr; set `PRESENCE_DEBUG_LOG=1` for debug output.

mod logging;
mod report;
mod script;

use chrono::{DateTime, Utc};
use clap::Parser;
use fs_err as fs;
use presence_core::{load_settings, load_settings_from, PresenceError, Result, SettingsFile};
use std::path::PathBuf;
use tracing::{info, warn};

use report::Report;
use script::{parse_script, Replayer};

#[derive(Parser)]
#[command(name = "presence-replay")]
#[command(about = "Replays IDE presence events and prints the active context")]
#[command(version)]
struct Cli {
    /// JSON-lines event script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Settings file (defaults to the user's presence settings)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Instant used for the idle check, RFC 3339 (defaults to now)
    #[arg(long, value_name = "TIME")]
    at: Option<DateTime<Utc>>,
}

fn main() {
    let cli = Cli::parse();
    let settings = resolve_settings(cli.settings.as_deref());
    logging::init(
        settings
            .as_ref()
            .ok()
            .and_then(Option::as_ref)
            .is_some_and(|settings| settings.application.debug_logging_enabled),
    );

    let settings = settings.map(|settings| {
        settings.unwrap_or_else(|| {
            warn!("No configuration directory, using default settings");
            SettingsFile::default()
        })
    });
    if let Err(e) = settings.and_then(|settings| run(&cli, settings)) {
        tracing::error!(error = %e, "presence-replay failed");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, settings: SettingsFile) -> Result<()> {
    let content = fs::read_to_string(&cli.script).map_err(|source| PresenceError::Io {
        context: format!("reading script {}", cli.script.display()),
        source,
    })?;
    let events = parse_script(&content)?;
    info!(events = events.len(), script = %cli.script.display(), "Replaying script");

    let mut replayer = Replayer::new(settings);
    for (line, event) in events {
        if let Err(err) = replayer.apply(event) {
            warn!(line, error = %err, "Skipping event");
        }
    }

    let now = cli.at.unwrap_or_else(Utc::now);
    let report = Report::collect(replayer.store(), &replayer.settings().application, now);
    let output = serde_json::to_string_pretty(&report).map_err(|source| PresenceError::Json {
        context: "serializing report".to_string(),
        source,
    })?;
    println!("{}", output);
    Ok(())
}

/// `None` when no path was given and the platform has no configuration directory.
fn resolve_settings(path: Option<&std::path::Path>) -> Result<Option<SettingsFile>> {
    match path {
        Some(path) => load_settings_from(path).map(Some),
        None => match load_settings() {
            Err(PresenceError::ConfigDirNotFound) => Ok(None),
            other => other.map(Some),
        },
    }
}
