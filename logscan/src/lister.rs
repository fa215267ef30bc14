//! Directory enumeration.
//!
//! Listing is non-recursive: the scanner treats the root as a flat directory
//! of log files. The result of one call is sorted by file name, so workers
//! can rely on stable, indexable slicing of that call's vector; nothing is
//! assumed about filesystem ordering across calls.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{ScanError, ScanResult};

/// An immutable reference to one discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path as discovered (root joined with the entry name)
    pub path: PathBuf,
    /// Base name, used in match records and output
    pub name: String,
}

/// Lists every regular file directly under `dir`, optionally filtered to
/// names starting with `prefix`.
///
/// Returns `DirectoryNotFound` if `dir` does not exist or is not a directory.
/// Entries whose names are not valid UTF-8 are skipped.
pub fn list_files(dir: &Path, prefix: Option<&str>) -> ScanResult<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Err(ScanError::directory_not_found(dir));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            trace!("Skipping non-file entry: {}", entry.path().display());
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            debug!(
                "Skipping entry with non-UTF-8 name: {}",
                entry.path().display()
            );
            continue;
        };
        if let Some(prefix) = prefix {
            if !name.starts_with(prefix) {
                continue;
            }
        }
        entries.push(FileEntry {
            path: entry.path(),
            name,
        });
    }

    // Stable order for deterministic chunk assignment within this listing.
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("Listed {} files in {}", entries.len(), dir.display());
    Ok(entries)
}
