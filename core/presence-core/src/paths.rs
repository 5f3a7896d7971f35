//! Path and file-name helpers used by the derived [`FileData`](crate::FileData) fields.
//!
//! Pure string operations, no filesystem access.

/// Converts every Windows separator to `/`.
///
/// ```ignore
/// separators_to_unix(r"C:\work\demo\main.rs") -> "C:/work/demo/main.rs"
/// separators_to_unix("/work/demo/main.rs")    -> "/work/demo/main.rs"
/// ```
pub fn separators_to_unix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Splits a file name at every `.` into overlapping base name / extension candidates.
///
/// Each dot position contributes one pair, so multi-dot names yield several
/// segmentations for the matcher to test against:
///
/// ```ignore
/// split_name_candidates("archive.tar.gz")
///     -> (["archive", "archive.tar"], [".tar.gz", ".gz"])
/// ```
///
/// A name without any dot yields two empty lists.
pub fn split_name_candidates(name: &str) -> (Vec<String>, Vec<String>) {
    name.match_indices('.')
        .map(|(i, _)| (name[..i].to_string(), name[i..].to_string()))
        .unzip()
}
