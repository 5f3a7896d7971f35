use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::ProjectSettings;
use crate::host::{FileHandle, ProjectHandle};
use crate::matcher::{FieldProvider, Target};

use super::file::{FileData, FileDataBuilder};

/// Immutable snapshot of one open project and its open files.
#[derive(Debug, Clone)]
pub struct ProjectData {
    platform: ProjectHandle,
    name: String,
    opened_at: DateTime<Utc>,
    files: HashMap<FileHandle, FileData>,
}

impl ProjectData {
    pub fn platform(&self) -> &ProjectHandle {
        &self.platform
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Most recent file access, or `opened_at` when no file is open.
    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.files
            .values()
            .map(FileData::accessed_at)
            .max()
            .unwrap_or(self.opened_at)
    }

    pub fn files(&self) -> &HashMap<FileHandle, FileData> {
        &self.files
    }

    pub fn file(&self, file: &FileHandle) -> Option<&FileData> {
        self.files.get(file)
    }

    pub fn contains(&self, file: Option<&FileHandle>) -> bool {
        file.is_some_and(|file| self.files.contains_key(file))
    }

    /// The most recently accessed file accepted by `filter`.
    ///
    /// Ties go to the lexicographically smallest file id so repeated reads agree.
    pub fn most_recent_file<F>(&self, filter: F) -> Option<&FileData>
    where
        F: Fn(&FileData) -> bool,
    {
        self.files
            .values()
            .filter(|data| filter(data))
            .max_by(|left, right| {
                left.accessed_at()
                    .cmp(&right.accessed_at())
                    .then_with(|| right.handle().id().cmp(left.handle().id()))
            })
    }

    /// Reads through to the host project's settings.
    pub fn settings(&self) -> ProjectSettings {
        self.platform.host().settings()
    }

    pub fn builder(&self) -> ProjectDataBuilder {
        ProjectDataBuilder {
            platform: self.platform.clone(),
            opened_at: self.opened_at,
            files: self
                .files
                .iter()
                .map(|(handle, data)| (handle.clone(), data.builder()))
                .collect(),
        }
    }
}

impl FieldProvider for ProjectData {
    fn get_field(&self, target: Target) -> &[String] {
        match target {
            Target::Name => std::slice::from_ref(&self.name),
            Target::Extension | Target::Basename | Target::Path => &[],
        }
    }
}

/// Snapshots compare by observable value; the project handle is not part of it.
impl PartialEq for ProjectData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.opened_at == other.opened_at && self.files == other.files
    }
}

/// Mutable staging for a project snapshot.
///
/// Every tracked file's [`FileDataBuilder`] is owned here until
/// [`build`](Self::build) consumes the whole builder. All file operations take
/// `Option<&FileHandle>`: `None` is always a no-op, because host events can
/// fire for files that are already gone.
#[derive(Debug, Clone)]
pub struct ProjectDataBuilder {
    platform: ProjectHandle,
    opened_at: DateTime<Utc>,
    files: HashMap<FileHandle, FileDataBuilder>,
}

impl ProjectDataBuilder {
    pub fn new(platform: ProjectHandle, opened_at: DateTime<Utc>) -> Self {
        Self {
            platform,
            opened_at,
            files: HashMap::new(),
        }
    }

    pub fn opened_now(platform: ProjectHandle) -> Self {
        Self::new(platform, Utc::now())
    }

    pub fn platform(&self) -> &ProjectHandle {
        &self.platform
    }

    pub fn set_platform(&mut self, platform: ProjectHandle) {
        self.platform = platform;
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Moves the project open time. Files opened before `value` are moved
    /// forward to it; files opened later keep their time.
    pub fn set_opened_at(&mut self, value: DateTime<Utc>) {
        self.opened_at = value;
        for file in self.files.values_mut() {
            if file.opened_at() < value {
                file.set_opened_at(value);
            }
        }
    }

    /// `max(opened_at, latest file access)`.
    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.files
            .values()
            .map(FileDataBuilder::accessed_at)
            .fold(self.opened_at, |latest, accessed| latest.max(accessed))
    }

    /// Tracks `file` (opened now if new) without editing it.
    pub fn add(&mut self, file: Option<&FileHandle>) {
        self.add_at(file, Utc::now(), |_| {});
    }

    /// Tracks `file` (opened now if new) and applies `edit` to its builder.
    pub fn add_with<F>(&mut self, file: Option<&FileHandle>, edit: F)
    where
        F: FnOnce(&mut FileDataBuilder),
    {
        self.add_at(file, Utc::now(), edit);
    }

    /// Tracks `file`, opened at `now` if it was not tracked yet, then applies
    /// `edit` whether the file is new or already present.
    pub fn add_at<F>(&mut self, file: Option<&FileHandle>, now: DateTime<Utc>, edit: F)
    where
        F: FnOnce(&mut FileDataBuilder),
    {
        let Some(file) = file else {
            return;
        };
        let builder = self
            .files
            .entry(file.clone())
            .or_insert_with(|| FileDataBuilder::new(now));
        edit(builder);
    }

    /// Applies `edit` to an already tracked file. Never starts tracking.
    ///
    /// Returns whether the edit ran.
    pub fn update<F>(&mut self, file: Option<&FileHandle>, edit: F) -> bool
    where
        F: FnOnce(&mut FileDataBuilder),
    {
        match file.and_then(|file| self.files.get_mut(file)) {
            Some(builder) => {
                edit(builder);
                true
            }
            None => false,
        }
    }

    /// Stops tracking `file`. Returns whether it was tracked.
    pub fn remove(&mut self, file: Option<&FileHandle>) -> bool {
        file.is_some_and(|file| self.files.remove(file).is_some())
    }

    pub fn contains(&self, file: Option<&FileHandle>) -> bool {
        file.is_some_and(|file| self.files.contains_key(file))
    }

    pub fn file(&self, file: &FileHandle) -> Option<&FileDataBuilder> {
        self.files.get(file)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn build(self) -> ProjectData {
        let platform = self.platform;
        let files = self
            .files
            .into_iter()
            .map(|(handle, builder)| {
                let data = builder.build(&platform, handle.clone());
                (handle, data)
            })
            .collect();

        ProjectData {
            name: platform.host().name(),
            platform,
            opened_at: self.opened_at,
            files,
        }
    }
}
