//! Local filesystem traversal and path helpers

use crate::Filter;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Notebook autosave folders, never listed
pub const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

/// List `root` and every directory below it
///
/// Each path ends with the platform separator. Subtrees rooted at a
/// [`CHECKPOINT_DIR`] are skipped.
pub fn list_subdirectories(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != CHECKPOINT_DIR);

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            // Joining an empty component appends the separator
            dirs.push(entry.path().join(""));
        }
    }

    tracing::debug!(
        "Found {} directories under: {}",
        dirs.len(),
        root.display()
    );

    Ok(dirs)
}

/// Lazily list entries (files and directories) whose base name passes `filter`
///
/// Without `recursive` only the immediate children of `root` are produced.
/// With it, the immediate children of every directory from
/// [`list_subdirectories`] are produced, `root` first. Each directory is read
/// when the iterator reaches it, and its entries come out sorted by name.
pub fn list_files(root: &Path, filter: Filter, recursive: bool) -> io::Result<ListFiles> {
    let directories = if recursive {
        list_subdirectories(root)?
    } else {
        vec![root.to_path_buf()]
    };

    Ok(ListFiles {
        filter,
        directories: directories.into_iter(),
        entries: Vec::new().into_iter(),
    })
}

/// Iterator returned by [`list_files`]
pub struct ListFiles {
    filter: Filter,
    directories: std::vec::IntoIter<PathBuf>,
    entries: std::vec::IntoIter<PathBuf>,
}

impl Iterator for ListFiles {
    type Item = io::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.entries.next() {
                return Some(Ok(path));
            }

            let directory = self.directories.next()?;
            match read_matching_entries(&directory, &self.filter) {
                Ok(entries) => self.entries = entries.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn read_matching_entries(directory: &Path, filter: &Filter) -> io::Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Hidden entries are not listed, the same as shell globbing
        if name.starts_with('.') {
            continue;
        }

        if filter.matches(&name) {
            results.push(entry.path());
        }
    }

    results.sort();
    Ok(results)
}

/// `User/project/file.txt` -> `file.txt`
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn basenames<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths.iter().map(|p| basename(p.as_ref())).collect()
}

/// `User/project/file.txt` -> `User/project/`
///
/// A bare file name has an empty parent, which is returned as is.
pub fn dirname(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(""),
        None => PathBuf::new(),
    }
}

/// Unique parent directories of `paths`, in no particular order
pub fn dirnames<P: AsRef<Path>>(paths: &[P]) -> HashSet<PathBuf> {
    paths.iter().map(|p| dirname(p.as_ref())).collect()
}

/// Octal mode for the owner, group and everyone triads
pub fn permission_mode(allow_read: bool, allow_write: bool) -> u32 {
    match (allow_read, allow_write) {
        (true, true) => 0o770,
        (true, false) => 0o550,
        (false, true) => 0o330,
        // Execute only
        (false, false) => 0o110,
    }
}

#[cfg(unix)]
pub fn set_permissions(path: &Path, allow_read: bool, allow_write: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = permission_mode(allow_read, allow_write);
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    tracing::debug!("Set mode {:o} on: {}", mode, path.display());
    Ok(())
}

/// Without Unix modes only the read-only flag can be expressed
#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _allow_read: bool, allow_write: bool) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(!allow_write);
    fs::set_permissions(path, permissions)
}

/// Remove a file if it exists
///
/// Returns `false` (and logs a warning) when there was nothing to remove.
pub fn delete(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        tracing::warn!("The file does not exist: {}", path.display());
        return Ok(false);
    }

    fs::remove_file(path)?;
    tracing::info!("Deleted: {}", path.display());
    Ok(true)
}
