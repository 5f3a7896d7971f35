//! Boundary with the host IDE's file and project objects.
//!
//! The core only reads from these. Handles are cheap `Arc` clones keyed by the
//! host's stable identifier, so they can sit in maps while the underlying
//! object's name, path or writability changes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::ProjectSettings;

/// A file as the host sees it right now.
pub trait HostFile: Send + Sync + fmt::Debug {
    /// Stable identity, unchanged by renames and moves.
    fn id(&self) -> &str;
    fn name(&self) -> String;
    fn path(&self) -> String;
    fn is_writable(&self) -> bool;
}

/// A project as the host sees it right now.
pub trait HostProject: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;
    fn name(&self) -> String;
    fn is_disposed(&self) -> bool;

    /// Disambiguated display title for `file` inside this project.
    ///
    /// Hosts evaluate this under their own read guard and return `None` once the
    /// project has been disposed, including a disposal racing this call.
    fn unique_file_title(&self, file: &dyn HostFile) -> Option<String>;

    /// Current settings, owned by the host. Never cached by the core.
    fn settings(&self) -> ProjectSettings;
}

/// Map key for a host file.
#[derive(Clone)]
pub struct FileHandle(Arc<dyn HostFile>);

impl FileHandle {
    pub fn new(file: Arc<dyn HostFile>) -> Self {
        Self(file)
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }

    pub fn host(&self) -> &dyn HostFile {
        self.0.as_ref()
    }
}

impl<T: HostFile + 'static> From<Arc<T>> for FileHandle {
    fn from(file: Arc<T>) -> Self {
        Self(file)
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for FileHandle {}

impl Hash for FileHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileHandle").field(&self.id()).finish()
    }
}

/// Map key for a host project.
#[derive(Clone)]
pub struct ProjectHandle(Arc<dyn HostProject>);

impl ProjectHandle {
    pub fn new(project: Arc<dyn HostProject>) -> Self {
        Self(project)
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }

    pub fn host(&self) -> &dyn HostProject {
        self.0.as_ref()
    }
}

impl<T: HostProject + 'static> From<Arc<T>> for ProjectHandle {
    fn from(project: Arc<T>) -> Self {
        Self(project)
    }
}

impl PartialEq for ProjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ProjectHandle {}

impl Hash for ProjectHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ProjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProjectHandle").field(&self.id()).finish()
    }
}
