//! Snapshot/builder model for open projects and files.
//!
//! Snapshots ([`ProjectData`], [`FileData`]) are immutable; the only way to
//! produce one is a builder's `build()`. Builders are obtained from a snapshot
//! with `.builder()` or created fresh, edited privately, then consumed.
//!
//! ```text
//! ProjectData ──builder()──▶ ProjectDataBuilder ──add/update/remove──▶ build() ──▶ ProjectData'
//!   └─ FileData ──builder()──▶   └─ FileDataBuilder                      └─ build(file) ──▶ FileData'
//! ```
//!
//! - [`file`]: one open file and its timestamp-only builder
//! - [`project`]: one open project, its files and its builder

mod file;
mod project;

pub use file::{FileData, FileDataBuilder};
pub use project::{ProjectData, ProjectDataBuilder};
