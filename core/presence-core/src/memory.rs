//! In-memory host objects.
//!
//! Used by the replay tool and tests in place of a live IDE. All state sits
//! behind `RwLock`s so a file can be renamed or a project disposed while
//! snapshots referencing it are alive.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::ProjectSettings;
use crate::host::{FileHandle, HostFile, HostProject, ProjectHandle};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
struct FileState {
    name: String,
    path: String,
    writable: bool,
}

#[derive(Debug)]
pub struct MemoryFile {
    id: String,
    state: RwLock<FileState>,
}

impl MemoryFile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            state: RwLock::new(FileState {
                name: name.into(),
                path: path.into(),
                writable: true,
            }),
        })
    }

    pub fn handle(self: &Arc<Self>) -> FileHandle {
        FileHandle::from(Arc::clone(self))
    }

    /// Renames and/or moves the file, keeping its identity.
    pub fn rename(&self, name: impl Into<String>, path: impl Into<String>) {
        let mut state = write(&self.state);
        state.name = name.into();
        state.path = path.into();
    }

    pub fn set_writable(&self, writable: bool) {
        write(&self.state).writable = writable;
    }
}

impl HostFile for MemoryFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> String {
        read(&self.state).name.clone()
    }

    fn path(&self) -> String {
        read(&self.state).path.clone()
    }

    fn is_writable(&self) -> bool {
        read(&self.state).writable
    }
}

#[derive(Debug, Default)]
struct ProjectState {
    name: String,
    disposed: bool,
    /// File id → title override.
    titles: HashMap<String, String>,
    settings: ProjectSettings,
}

#[derive(Debug)]
pub struct MemoryProject {
    id: String,
    state: RwLock<ProjectState>,
}

impl MemoryProject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            state: RwLock::new(ProjectState {
                name: name.into(),
                ..ProjectState::default()
            }),
        })
    }

    pub fn handle(self: &Arc<Self>) -> ProjectHandle {
        ProjectHandle::from(Arc::clone(self))
    }

    pub fn dispose(&self) {
        write(&self.state).disposed = true;
    }

    pub fn set_title(&self, file_id: impl Into<String>, title: impl Into<String>) {
        write(&self.state)
            .titles
            .insert(file_id.into(), title.into());
    }

    pub fn set_settings(&self, settings: ProjectSettings) {
        write(&self.state).settings = settings;
    }
}

impl HostProject for MemoryProject {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> String {
        read(&self.state).name.clone()
    }

    fn is_disposed(&self) -> bool {
        read(&self.state).disposed
    }

    fn unique_file_title(&self, file: &dyn HostFile) -> Option<String> {
        // Held for the whole lookup so a concurrent dispose cannot interleave.
        let state = read(&self.state);
        if state.disposed {
            return None;
        }
        Some(
            state
                .titles
                .get(file.id())
                .cloned()
                .unwrap_or_else(|| file.name()),
        )
    }

    fn settings(&self) -> ProjectSettings {
        read(&self.state).settings.clone()
    }
}
