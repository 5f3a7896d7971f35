//! Field vocabulary exposed to the external rule matcher.
//! Keep this read-only: timestamps and builders never leak through it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kinds of field a matcher rule can test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Extension,
    Name,
    Basename,
    Path,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Extension,
        Target::Name,
        Target::Basename,
        Target::Path,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Name => "name",
            Self::Basename => "basename",
            Self::Path => "path",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("Unknown field target: {}", value))
    }
}

/// Anything the matcher can query for field values.
///
/// Implementations must be pure: no side effects, safe to call from many
/// readers at once.
pub trait FieldProvider {
    fn get_field(&self, target: Target) -> &[String];
}
