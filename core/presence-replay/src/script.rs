//! JSON-lines event scripts and the in-memory host they drive.
//!
//! One event per line, tagged by `event`:
//!
//! ```text
//! {"event":"open_project","project":"p1","name":"demo","at":"2026-01-31T10:00:00Z"}
//! {"event":"open_file","project":"p1","file":"f1","name":"main.rs","path":"/demo/main.rs","at":"2026-01-31T10:00:05Z"}
//! {"event":"access_file","project":"p1","file":"f1","at":"2026-01-31T10:03:00Z"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use presence_core::memory::{MemoryFile, MemoryProject};
use presence_core::{PresenceError, PresenceStore, ProjectSettings, Result, SettingsFile};
use serde::Deserialize;
use tracing::{debug, info};

fn default_writable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    OpenProject {
        project: String,
        name: String,
        at: DateTime<Utc>,
        #[serde(default)]
        settings: Option<ProjectSettings>,
    },
    CloseProject {
        project: String,
    },
    DisposeProject {
        project: String,
    },
    OpenFile {
        project: String,
        file: String,
        name: String,
        path: String,
        at: DateTime<Utc>,
        #[serde(default = "default_writable")]
        writable: bool,
        #[serde(default)]
        title: Option<String>,
    },
    AccessFile {
        project: String,
        file: String,
        at: DateTime<Utc>,
    },
    CloseFile {
        project: String,
        file: String,
    },
    RenameFile {
        file: String,
        name: String,
        path: String,
    },
    ResetOpenTime {
        project: String,
        at: DateTime<Utc>,
    },
}

/// Parses a whole script. Line numbers in errors are 1-based.
pub fn parse_script(content: &str) -> Result<Vec<(usize, ScriptEvent)>> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text)
                .map(|event| (line, event))
                .map_err(|e| PresenceError::ScriptMalformed {
                    line,
                    details: e.to_string(),
                })
        })
        .collect()
}

/// Owns the in-memory host objects and feeds their events into a [`PresenceStore`].
pub struct Replayer {
    store: PresenceStore,
    settings: SettingsFile,
    projects: HashMap<String, Arc<MemoryProject>>,
    files: HashMap<String, Arc<MemoryFile>>,
}

impl Replayer {
    pub fn new(settings: SettingsFile) -> Self {
        Self {
            store: PresenceStore::new(),
            settings,
            projects: HashMap::new(),
            files: HashMap::new(),
        }
    }

    pub fn store(&self) -> &PresenceStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsFile {
        &self.settings
    }

    pub fn apply(&mut self, event: ScriptEvent) -> Result<()> {
        match event {
            ScriptEvent::OpenProject {
                project,
                name,
                at,
                settings,
            } => {
                let host = self
                    .projects
                    .entry(project.clone())
                    .or_insert_with(|| MemoryProject::new(project, name.clone()));
                host.set_settings(settings.unwrap_or_else(|| self.settings.project(&name)));
                self.store.open_project(&host.handle(), at);
            }
            ScriptEvent::CloseProject { project } => {
                let host = self.project(&project)?;
                self.store.close_project(&host.handle());
                self.projects.remove(&project);
            }
            ScriptEvent::DisposeProject { project } => {
                self.project(&project)?.dispose();
            }
            ScriptEvent::OpenFile {
                project,
                file,
                name,
                path,
                at,
                writable,
                title,
            } => {
                let host = self.project(&project)?;
                let file_host = self
                    .files
                    .entry(file.clone())
                    .or_insert_with(|| MemoryFile::new(file.clone(), name.clone(), path.clone()));
                file_host.rename(name, path);
                file_host.set_writable(writable);
                if let Some(title) = title {
                    host.set_title(file, title);
                }

                let file_handle = file_host.handle();
                self.reset_after_inactivity(&host, at);
                self.store.open_file(&host.handle(), Some(&file_handle), at);
            }
            ScriptEvent::AccessFile { project, file, at } => {
                let host = self.project(&project)?;
                let file = self.file(&file)?;
                self.reset_after_inactivity(&host, at);
                self.store
                    .access_file(&host.handle(), Some(&file.handle()), at);
            }
            ScriptEvent::CloseFile { project, file } => {
                let host = self.project(&project)?;
                let file = self.file(&file)?;
                self.store.close_file(&host.handle(), Some(&file.handle()));
            }
            ScriptEvent::RenameFile { file, name, path } => {
                self.file(&file)?.rename(name, path);
            }
            ScriptEvent::ResetOpenTime { project, at } => {
                let host = self.project(&project)?;
                self.store.reset_open_time(&host.handle(), at);
            }
        }
        Ok(())
    }

    /// Restarts the project's clock when it was untouched for longer than the timeout.
    fn reset_after_inactivity(&self, host: &Arc<MemoryProject>, at: DateTime<Utc>) {
        let app = &self.settings.application;
        if !app.reset_open_time_after_inactivity {
            return;
        }
        let handle = host.handle();
        let Some(snapshot) = self.store.project(&handle) else {
            return;
        };
        if at.signed_duration_since(snapshot.accessed_at()) > app.inactivity_timeout() {
            info!(project = %handle.id(), at = %at, "Resetting open time after inactivity");
            self.store.reset_open_time(&handle, at);
        }
    }

    fn project(&self, id: &str) -> Result<Arc<MemoryProject>> {
        self.projects
            .get(id)
            .cloned()
            .ok_or_else(|| PresenceError::UnknownProject(id.to_string()))
    }

    fn file(&self, id: &str) -> Result<Arc<MemoryFile>> {
        let file = self
            .files
            .get(id)
            .cloned()
            .ok_or_else(|| PresenceError::UnknownFile(id.to_string()))?;
        debug!(file = %id, "Resolved script file");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::{FieldProvider, FileData, Target};

    const SCRIPT: &str = r#"
# two projects, the second one wins
{"event":"open_project","project":"p1","name":"alpha","at":"2026-01-31T10:00:00Z"}
{"event":"open_project","project":"p2","name":"beta","at":"2026-01-31T10:00:00Z"}
{"event":"open_file","project":"p1","file":"a","name":"lib.rs","path":"/alpha/src/lib.rs","at":"2026-01-31T10:01:00Z"}
{"event":"open_file","project":"p2","file":"b","name":"archive.tar.gz","path":"C:\\beta\\archive.tar.gz","at":"2026-01-31T10:02:00Z"}

{"event":"access_file","project":"p2","file":"b","at":"2026-01-31T10:03:00Z"}
"#;

    fn replay(content: &str, settings: SettingsFile) -> Replayer {
        let mut replayer = Replayer::new(settings);
        for (_, event) in parse_script(content).expect("parse script") {
            replayer.apply(event).expect("apply event");
        }
        replayer
    }

    #[test]
    fn parses_events_and_skips_comments() {
        let events = parse_script(SCRIPT).expect("parse script");
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].0, 3);
        assert!(matches!(events[4].1, ScriptEvent::AccessFile { .. }));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse_script("\n{\"event\":\"open_project\"}\n").expect_err("malformed");
        assert!(matches!(err, PresenceError::ScriptMalformed { line: 2, .. }));
    }

    #[test]
    fn replay_selects_latest_file() {
        let replayer = replay(SCRIPT, SettingsFile::default());
        let active = replayer
            .store()
            .active(&replayer.settings().application)
            .expect("active context");

        assert_eq!(active.project().name(), "beta");
        let file = active.file().expect("active file");
        assert_eq!(file.get_field(Target::Extension), [".tar.gz", ".gz"]);
        assert_eq!(file.get_field(Target::Path), ["C:/beta/archive.tar.gz"]);
    }

    #[test]
    fn unknown_entities_are_errors() {
        let mut replayer = Replayer::new(SettingsFile::default());
        let err = replayer
            .apply(ScriptEvent::CloseProject {
                project: "ghost".to_string(),
            })
            .expect_err("unknown project");
        assert!(matches!(err, PresenceError::UnknownProject(_)));
    }

    #[test]
    fn inactivity_resets_project_clock() {
        let script = r#"
{"event":"open_project","project":"p1","name":"alpha","at":"2026-01-31T10:00:00Z"}
{"event":"open_file","project":"p1","file":"a","name":"lib.rs","path":"/alpha/lib.rs","at":"2026-01-31T10:01:00Z"}
{"event":"access_file","project":"p1","file":"a","at":"2026-01-31T12:00:00Z"}
"#;
        let replayer = replay(script, SettingsFile::default());
        let active = replayer
            .store()
            .active(&replayer.settings().application)
            .expect("active context");

        let reset_at: DateTime<Utc> = "2026-01-31T12:00:00Z".parse().expect("timestamp");
        assert_eq!(active.project().opened_at(), reset_at);
        assert_eq!(active.file().map(FileData::opened_at), Some(reset_at));
    }

    #[test]
    fn project_settings_come_from_settings_file() {
        let mut settings = SettingsFile::default();
        settings.projects.insert(
            "alpha".to_string(),
            ProjectSettings {
                enabled: false,
                description: None,
            },
        );
        let mut replayer = replay(SCRIPT, settings);

        let newer = r#"{"event":"access_file","project":"p1","file":"a","at":"2026-01-31T10:05:00Z"}"#;
        for (_, event) in parse_script(newer).expect("parse script") {
            replayer.apply(event).expect("apply event");
        }

        let active = replayer
            .store()
            .active(&replayer.settings().application)
            .expect("active context");
        assert_eq!(active.project().name(), "beta");
    }

    #[test]
    fn disposed_project_falls_back_to_plain_name() {
        let script = r#"
{"event":"open_project","project":"p1","name":"alpha","at":"2026-01-31T10:00:00Z"}
{"event":"open_file","project":"p1","file":"a","name":"mod.rs","path":"/alpha/src/mod.rs","title":"src/mod.rs","at":"2026-01-31T10:01:00Z"}
{"event":"dispose_project","project":"p1"}
"#;
        let replayer = replay(script, SettingsFile::default());
        let active = replayer
            .store()
            .active(&replayer.settings().application)
            .expect("active context");
        assert_eq!(active.file().expect("active file").unique_name(), "mod.rs");
    }
}
