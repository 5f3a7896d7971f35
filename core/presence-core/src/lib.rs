//! # presence-core
//!
//! Tracks which projects and files are open in a development session, when
//! each was opened and when each was last accessed, so that presence clients
//! can answer "what is the user working on right now".
//!
//! ## Design Principles
//!
//! - **Immutable snapshots**: [`ProjectData`] and [`FileData`] never change once built.
//!   All edits go through [`ProjectDataBuilder`] / [`FileDataBuilder`].
//! - **Synchronous**: No async runtime, no I/O in the snapshot or builder types.
//! - **Graceful degradation**: Absent handles are no-ops, timestamp disorder is
//!   clamped, a disposed project yields the plain file name as its title.
//! - **Copy-and-swap publication**: [`PresenceStore`] replaces whole snapshots so
//!   readers never observe a half-edited project.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use presence_core::{memory::{MemoryFile, MemoryProject}, PresenceStore};
//!
//! let store = PresenceStore::new();
//! let project = MemoryProject::new("p1", "demo").handle();
//! let file = MemoryFile::new("f1", "main.rs", "/demo/src/main.rs").handle();
//!
//! store.open_project(&project, Utc::now());
//! store.open_file(&project, Some(&file), Utc::now());
//! let active = store.active(&ApplicationSettings::default());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod host;
pub mod matcher;
pub mod memory;
pub mod paths;
pub mod store;
pub mod timestamps;

pub use config::*;
pub use data::{FileData, FileDataBuilder, ProjectData, ProjectDataBuilder};
pub use error::{PresenceError, Result};
pub use host::{FileHandle, HostFile, HostProject, ProjectHandle};
pub use matcher::{FieldProvider, Target};
pub use store::{ActiveContext, PresenceStore};
pub use timestamps::Timestamps;
