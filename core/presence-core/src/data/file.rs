use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::host::{FileHandle, ProjectHandle};
use crate::matcher::{FieldProvider, Target};
use crate::paths::{separators_to_unix, split_name_candidates};
use crate::timestamps::Timestamps;

/// Immutable snapshot of one open file.
///
/// Identity fields are read from the host once, when the builder builds. The
/// derived fields are computed on first use and kept for the snapshot's life.
#[derive(Debug, Clone)]
pub struct FileData {
    file: FileHandle,
    project: ProjectHandle,
    name: String,
    path: String,
    is_writable: bool,
    timestamps: Timestamps,
    relative_path: OnceCell<String>,
    /// (base names, extensions)
    name_candidates: OnceCell<(Vec<String>, Vec<String>)>,
    unique_name: OnceCell<String>,
}

impl FileData {
    pub fn handle(&self) -> &FileHandle {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.is_writable
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.timestamps.opened_at()
    }

    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.timestamps.accessed_at()
    }

    /// Path with separators normalized to `/`.
    pub fn relative_path(&self) -> &str {
        self.relative_path_cell()
    }

    pub fn base_names(&self) -> &[String] {
        &self.candidates().0
    }

    pub fn extensions(&self) -> &[String] {
        &self.candidates().1
    }

    /// Host-disambiguated display title, or [`name`](Self::name) once the project is gone.
    pub fn unique_name(&self) -> &str {
        self.unique_name.get_or_init(|| {
            let project = self.project.host();
            let title = if project.is_disposed() {
                None
            } else {
                project.unique_file_title(self.file.host())
            };
            title.unwrap_or_else(|| {
                debug!(
                    project = %self.project.id(),
                    file = %self.file.id(),
                    "Project disposed, using plain file name as title"
                );
                self.name.clone()
            })
        })
    }

    /// A fresh builder seeded with this snapshot's timestamps.
    pub fn builder(&self) -> FileDataBuilder {
        FileDataBuilder::from_timestamps(self.timestamps)
    }

    fn relative_path_cell(&self) -> &String {
        self.relative_path
            .get_or_init(|| separators_to_unix(&self.path))
    }

    fn candidates(&self) -> &(Vec<String>, Vec<String>) {
        self.name_candidates
            .get_or_init(|| split_name_candidates(&self.name))
    }
}

impl FieldProvider for FileData {
    fn get_field(&self, target: Target) -> &[String] {
        match target {
            Target::Extension => self.extensions(),
            Target::Name => std::slice::from_ref(&self.name),
            Target::Basename => self.base_names(),
            Target::Path => std::slice::from_ref(self.relative_path_cell()),
        }
    }
}

/// Snapshots compare by observable value; the handle and caches are not part of it.
impl PartialEq for FileData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.is_writable == other.is_writable
            && self.timestamps == other.timestamps
    }
}

/// Mutable staging for a file's timestamps.
///
/// Owned by the [`ProjectDataBuilder`](crate::ProjectDataBuilder) that tracks the
/// file. Name, path and writability are not stored here; they are read from the
/// live handle when [`build`](Self::build) runs.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDataBuilder {
    timestamps: Timestamps,
}

impl FileDataBuilder {
    pub fn new(opened_at: DateTime<Utc>) -> Self {
        Self::from_timestamps(Timestamps::new(opened_at))
    }

    pub fn opened_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn from_timestamps(timestamps: Timestamps) -> Self {
        Self { timestamps }
    }

    pub fn timestamps(&self) -> Timestamps {
        self.timestamps
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.timestamps.opened_at()
    }

    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.timestamps.accessed_at()
    }

    pub fn set_opened_at(&mut self, value: DateTime<Utc>) {
        self.timestamps.set_opened_at(value);
    }

    pub fn set_accessed_at(&mut self, value: DateTime<Utc>) {
        self.timestamps.set_accessed_at(value);
    }

    /// Materializes the snapshot, reading identity fields from `file` as it is now.
    pub fn build(self, project: &ProjectHandle, file: FileHandle) -> FileData {
        let host = file.host();
        let name = host.name();
        let path = host.path();
        let is_writable = host.is_writable();

        FileData {
            project: project.clone(),
            file,
            name,
            path,
            is_writable,
            timestamps: self.timestamps,
            relative_path: OnceCell::new(),
            name_candidates: OnceCell::new(),
            unique_name: OnceCell::new(),
        }
    }
}
