//! Process-wide publication of project snapshots.
//!
//! Readers load the latest [`ProjectData`] without locking. Writers go
//! through [`PresenceStore::edit`], which turns the current snapshot into a
//! builder, applies the edit, builds, and swaps the result in whole:
//!
//! ```text
//! load() ──▶ builder() ──▶ edit ──▶ build() ──▶ store()
//!   ▲                                              │
//!   └──────────── readers see old or new, never a mix
//! ```
//!
//! # Writer policy
//!
//! Each project has its own writer mutex, so edits to one project are
//! serialized (last build wins) while different projects proceed
//! independently. Opening and closing projects swaps the project map itself
//! under a separate map mutex. An edit racing a close publishes into the
//! detached slot and is dropped with it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::ApplicationSettings;
use crate::data::{FileData, ProjectData, ProjectDataBuilder};
use crate::host::{FileHandle, ProjectHandle};
use crate::matcher::{FieldProvider, Target};

type ProjectMap = HashMap<ProjectHandle, Arc<ProjectSlot>>;

#[derive(Debug)]
struct ProjectSlot {
    current: ArcSwap<ProjectData>,
    writer: Mutex<()>,
}

impl ProjectSlot {
    fn new(snapshot: Arc<ProjectData>) -> Self {
        Self {
            current: ArcSwap::new(snapshot),
            writer: Mutex::new(()),
        }
    }
}

fn lock<'a>(mutex: &'a Mutex<()>, what: &str) -> MutexGuard<'a, ()> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!(lock = what, "Recovering poisoned writer lock");
        poisoned.into_inner()
    })
}

#[derive(Debug)]
pub struct PresenceStore {
    projects: ArcSwap<ProjectMap>,
    map_writer: Mutex<()>,
}

impl Default for PresenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceStore {
    pub fn new() -> Self {
        Self {
            projects: ArcSwap::from_pointee(ProjectMap::new()),
            map_writer: Mutex::new(()),
        }
    }

    /// Starts tracking `project`, opened at `now`. Already tracked projects
    /// are returned unchanged.
    pub fn open_project(&self, project: &ProjectHandle, now: DateTime<Utc>) -> Arc<ProjectData> {
        let _guard = lock(&self.map_writer, "project map");
        let map = self.projects.load();
        if let Some(slot) = map.get(project) {
            return slot.current.load_full();
        }

        let snapshot = Arc::new(ProjectDataBuilder::new(project.clone(), now).build());
        let mut next = ProjectMap::clone(&map);
        next.insert(
            project.clone(),
            Arc::new(ProjectSlot::new(Arc::clone(&snapshot))),
        );
        self.projects.store(Arc::new(next));

        debug!(project = %project.id(), opened_at = %now, "Project opened");
        snapshot
    }

    /// Stops tracking `project` and drops its files. Returns whether it was tracked.
    pub fn close_project(&self, project: &ProjectHandle) -> bool {
        let _guard = lock(&self.map_writer, "project map");
        let map = self.projects.load();
        if !map.contains_key(project) {
            return false;
        }

        let mut next = ProjectMap::clone(&map);
        next.remove(project);
        self.projects.store(Arc::new(next));

        debug!(project = %project.id(), "Project closed");
        true
    }

    /// Applies `edit` to a builder of the current snapshot and publishes the result.
    ///
    /// Returns `None` without running `edit` when `project` is not tracked.
    pub fn edit<F>(&self, project: &ProjectHandle, edit: F) -> Option<Arc<ProjectData>>
    where
        F: FnOnce(&mut ProjectDataBuilder),
    {
        self.edit_if(project, |builder| {
            edit(builder);
            true
        })
    }

    /// Like [`edit`](Self::edit), but only publishes when `edit` returns true.
    fn edit_if<F>(&self, project: &ProjectHandle, edit: F) -> Option<Arc<ProjectData>>
    where
        F: FnOnce(&mut ProjectDataBuilder) -> bool,
    {
        let slot = self.projects.load().get(project).cloned()?;
        let _guard = lock(&slot.writer, "project");

        let mut builder = slot.current.load().builder();
        if !edit(&mut builder) {
            return Some(slot.current.load_full());
        }

        let snapshot = Arc::new(builder.build());
        slot.current.store(Arc::clone(&snapshot));
        debug!(
            project = %project.id(),
            files = snapshot.files().len(),
            accessed_at = %snapshot.accessed_at(),
            "Project snapshot published"
        );
        Some(snapshot)
    }

    /// Tracks `file` in `project` (opened at `now` if new) and records an access at `now`.
    pub fn open_file(
        &self,
        project: &ProjectHandle,
        file: Option<&FileHandle>,
        now: DateTime<Utc>,
    ) -> Option<Arc<ProjectData>> {
        let file = file?;
        self.edit(project, |builder| {
            debug!(project = %project.id(), file = %file.id(), "File opened");
            builder.add_at(Some(file), now, |data| data.set_accessed_at(now));
        })
    }

    /// Records an access at `now` on an already tracked file.
    pub fn access_file(
        &self,
        project: &ProjectHandle,
        file: Option<&FileHandle>,
        now: DateTime<Utc>,
    ) -> Option<Arc<ProjectData>> {
        self.edit_if(project, |builder| {
            builder.update(file, |data| data.set_accessed_at(now))
        })
    }

    pub fn close_file(
        &self,
        project: &ProjectHandle,
        file: Option<&FileHandle>,
    ) -> Option<Arc<ProjectData>> {
        self.edit_if(project, |builder| {
            let removed = builder.remove(file);
            if removed {
                debug!(project = %project.id(), "File closed");
            }
            removed
        })
    }

    /// Moves the project's open time to `now`, dragging earlier files with it.
    pub fn reset_open_time(
        &self,
        project: &ProjectHandle,
        now: DateTime<Utc>,
    ) -> Option<Arc<ProjectData>> {
        self.edit(project, |builder| builder.set_opened_at(now))
    }

    pub fn project(&self, project: &ProjectHandle) -> Option<Arc<ProjectData>> {
        self.projects
            .load()
            .get(project)
            .map(|slot| slot.current.load_full())
    }

    /// Latest snapshot of every tracked project, ordered by project id.
    pub fn projects(&self) -> Vec<Arc<ProjectData>> {
        let map = self.projects.load();
        let mut projects: Vec<_> = map.values().map(|slot| slot.current.load_full()).collect();
        projects.sort_by(|left, right| left.platform().id().cmp(right.platform().id()));
        projects
    }

    /// The most recently accessed enabled project and, inside it, the file to present.
    ///
    /// Returns `None` when presence is disabled or no enabled project is open.
    pub fn active(&self, settings: &ApplicationSettings) -> Option<ActiveContext> {
        if !settings.enabled {
            return None;
        }

        let project = self
            .projects()
            .into_iter()
            .filter(|project| project.settings().enabled)
            .max_by(|left, right| {
                left.accessed_at()
                    .cmp(&right.accessed_at())
                    .then_with(|| right.platform().id().cmp(left.platform().id()))
            })?;

        let file = if settings.show_files {
            project
                .most_recent_file(|data| data.is_writable() || !settings.hide_read_only_files)
                .map(|data| data.handle().clone())
        } else {
            None
        };

        Some(ActiveContext { project, file })
    }
}

/// What the user is working on right now.
#[derive(Debug, Clone)]
pub struct ActiveContext {
    project: Arc<ProjectData>,
    file: Option<FileHandle>,
}

impl ActiveContext {
    pub fn project(&self) -> &ProjectData {
        &self.project
    }

    pub fn file(&self) -> Option<&FileData> {
        self.file
            .as_ref()
            .and_then(|handle| self.project.file(handle))
    }

    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.project.accessed_at()
    }

    /// True when inactivity hiding is on and nothing was touched within the timeout.
    pub fn is_idle(&self, now: DateTime<Utc>, settings: &ApplicationSettings) -> bool {
        settings.hide_after_period_of_inactivity
            && now.signed_duration_since(self.accessed_at()) > settings.inactivity_timeout()
    }
}

/// Fields of the active file, or of the project when no file is presented.
impl FieldProvider for ActiveContext {
    fn get_field(&self, target: Target) -> &[String] {
        match self.file() {
            Some(file) => file.get_field(target),
            None => self.project.get_field(target),
        }
    }
}
