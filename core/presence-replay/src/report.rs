//! JSON report of the state left behind by a replay.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use presence_core::{
    ActiveContext, ApplicationSettings, FieldProvider, FileData, PresenceStore, Target,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    /// Whether anything is presented at all.
    pub visible: bool,
    pub active: Option<ActiveReport>,
    pub projects: Vec<ProjectReport>,
}

#[derive(Debug, Serialize)]
pub struct ActiveReport {
    pub project: String,
    pub description: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    /// Seconds since the project was opened, when elapsed time is shown.
    pub elapsed_seconds: Option<i64>,
    pub idle: bool,
    pub file: Option<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub name: String,
    pub unique_name: String,
    pub display_name: String,
    pub activity: Activity,
    pub path: String,
    pub writable: bool,
    pub opened_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub fields: BTreeMap<Target, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Reading,
    Writing,
}

#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub opened_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub files: usize,
}

impl Report {
    pub fn collect(
        store: &PresenceStore,
        settings: &ApplicationSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let projects = store
            .projects()
            .iter()
            .map(|project| ProjectReport {
                name: project.name().to_string(),
                opened_at: project.opened_at(),
                accessed_at: project.accessed_at(),
                files: project.files().len(),
            })
            .collect();

        let active = store
            .active(settings)
            .map(|active| ActiveReport::from_context(&active, settings, now));
        Self {
            visible: active.is_some() || settings.show_ide_when_no_project_is_available,
            active,
            projects,
        }
    }
}

impl ActiveReport {
    fn from_context(
        active: &ActiveContext,
        settings: &ApplicationSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let project = active.project();
        Self {
            project: project.name().to_string(),
            description: project.settings().description,
            opened_at: project.opened_at(),
            accessed_at: active.accessed_at(),
            elapsed_seconds: settings
                .show_elapsed_time
                .then(|| now.signed_duration_since(project.opened_at()).num_seconds()),
            idle: active.is_idle(now, settings),
            file: active
                .file()
                .map(|data| FileReport::from_data(data, settings)),
        }
    }
}

impl FileReport {
    fn from_data(data: &FileData, settings: &ApplicationSettings) -> Self {
        let activity = if settings.show_reading_instead_of_writing && !data.is_writable() {
            Activity::Reading
        } else {
            Activity::Writing
        };
        Self {
            name: data.name().to_string(),
            unique_name: data.unique_name().to_string(),
            display_name: display_name(data.unique_name(), settings.show_file_extensions),
            activity,
            path: data.path().to_string(),
            writable: data.is_writable(),
            opened_at: data.opened_at(),
            accessed_at: data.accessed_at(),
            fields: Target::ALL
                .into_iter()
                .map(|target| (target, data.get_field(target).to_vec()))
                .collect(),
        }
    }
}

/// Drops the last extension unless extensions are shown. Dotfiles keep their name.
fn display_name(name: &str, show_extensions: bool) -> String {
    if show_extensions {
        return name.to_string();
    }
    let base_start = name.rfind('/').map_or(0, |slash| slash + 1);
    match name[base_start..].rfind('.') {
        Some(dot) if dot > 0 => name[..base_start + dot].to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use presence_core::memory::{MemoryFile, MemoryProject};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn report_lists_fields_by_target() {
        let store = PresenceStore::new();
        let project = MemoryProject::new("p1", "demo").handle();
        let file = MemoryFile::new("f1", "index.d.ts", "/demo/index.d.ts").handle();
        store.open_project(&project, t(0));
        store.open_file(&project, Some(&file), t(1));

        let report = Report::collect(&store, &ApplicationSettings::default(), t(2));
        let json = serde_json::to_value(&report).expect("serialize report");

        assert_eq!(json["active"]["project"], "demo");
        assert_eq!(json["active"]["idle"], false);
        assert_eq!(
            json["active"]["file"]["fields"]["extension"],
            serde_json::json!([".d.ts", ".ts"])
        );
        assert_eq!(
            json["active"]["file"]["fields"]["basename"],
            serde_json::json!(["index", "index.d"])
        );
        assert_eq!(json["projects"][0]["files"], 1);
        assert_eq!(json["active"]["elapsed_seconds"], 2);
        assert_eq!(json["active"]["file"]["display_name"], "index.d.ts");
        assert_eq!(json["active"]["file"]["activity"], "writing");
    }

    #[test]
    fn presentation_switches_shape_the_file_report() {
        let store = PresenceStore::new();
        let project = MemoryProject::new("p1", "demo").handle();
        let file = MemoryFile::new("f1", "main.rs", "/demo/main.rs");
        file.set_writable(false);
        store.open_project(&project, t(0));
        store.open_file(&project, Some(&file.handle()), t(1));

        let settings = ApplicationSettings {
            hide_read_only_files: false,
            show_file_extensions: false,
            show_elapsed_time: false,
            ..ApplicationSettings::default()
        };
        let report = Report::collect(&store, &settings, t(2));
        let active = report.active.expect("active context");
        let file = active.file.expect("active file");

        assert_eq!(active.elapsed_seconds, None);
        assert_eq!(file.display_name, "main");
        assert_eq!(file.activity, Activity::Reading);

        let writing = ApplicationSettings {
            show_reading_instead_of_writing: false,
            ..settings
        };
        let report = Report::collect(&store, &writing, t(2));
        let file = report.active.and_then(|active| active.file).expect("active file");
        assert_eq!(file.activity, Activity::Writing);
    }

    #[test]
    fn display_name_keeps_dotfiles() {
        assert_eq!(display_name(".gitignore", false), ".gitignore");
        assert_eq!(display_name("Makefile", false), "Makefile");
        assert_eq!(display_name("src/.env", false), "src/.env");
        assert_eq!(display_name("dir.v2/Makefile", false), "dir.v2/Makefile");
        assert_eq!(display_name("data/mod.rs", false), "data/mod");
        assert_eq!(display_name("archive.tar.gz", false), "archive.tar");
        assert_eq!(display_name("archive.tar.gz", true), "archive.tar.gz");
    }

    #[test]
    fn empty_store_has_no_active_context() {
        let store = PresenceStore::new();
        let report = Report::collect(&store, &ApplicationSettings::default(), t(0));
        assert!(report.active.is_none());
        assert!(report.projects.is_empty());
        assert!(report.visible);

        let settings = ApplicationSettings {
            show_ide_when_no_project_is_available: false,
            ..ApplicationSettings::default()
        };
        assert!(!Report::collect(&store, &settings, t(0)).visible);
    }
}
