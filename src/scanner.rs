use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

use crate::pattern::guess_pattern;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }

    /// Extension without the leading dot, empty if there is none
    pub fn extension(&self) -> &str {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }
}

/// Patterns guessed from the media files of a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternScan {
    /// Unique guesses in first-seen order
    pub patterns: Vec<String>,
    pub has_media: bool,
    pub total_files: usize,
}

/// Whether `ext` is one of `formats` (case-insensitive). An empty list accepts everything.
pub fn is_media_extension(ext: &str, formats: &[String]) -> bool {
    formats.is_empty()
        || formats
            .iter()
            .any(|f| f.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// List the regular, non-hidden files of `target` sorted by name, keeping
/// only extensions listed in `formats`
pub fn scan_files(target: &Path, formats: &[String]) -> Result<Vec<FileEntry>, ScannerError> {
    debug!(path = ?target, "Scanning directory");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let mut entries = Vec::new();

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        trace!(entry = ?path, "Examining entry");

        if !path.is_file() {
            trace!(path = ?path, "Skipping non-file");
            continue;
        }

        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };

        if name.starts_with('.') {
            trace!(name = %name, "Skipping hidden file");
            continue;
        }

        let file = FileEntry::new(name, path);
        if !is_media_extension(file.extension(), formats) {
            trace!(name = %file.name, "Skipping unsupported format");
            continue;
        }

        debug!(name = %file.name, "Found file");
        entries.push(file);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = entries.len(), "Scan complete");

    Ok(entries)
}

/// Guess input templates for every media file in `target`
pub fn detect_patterns(target: &Path, formats: &[String]) -> Result<PatternScan, ScannerError> {
    let files = scan_files(target, formats)?;

    let mut scan = PatternScan {
        has_media: !files.is_empty(),
        total_files: files.len(),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    for file in &files {
        let guess = guess_pattern(&file.name);
        if guess.is_empty() {
            debug!(name = %file.name, "No pattern detected");
            continue;
        }
        if seen.insert(guess.clone()) {
            debug!(name = %file.name, pattern = %guess, "Detected pattern");
            scan.patterns.push(guess);
        }
    }

    Ok(scan)
}
