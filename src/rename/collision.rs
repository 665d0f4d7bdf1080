use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Highest numeric suffix tried before giving up
pub const MAX_DISAMBIGUATION: usize = 999;

/// Paths already handed out during one run
#[derive(Debug, Default)]
pub struct ClaimedPaths(HashSet<String>);

impl ClaimedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, path: &Path) {
        self.0.insert(path_key(path));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains(&path_key(path))
    }
}

// Case-insensitive filesystems treat "A.mkv" and "a.mkv" as one file
fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// `"<stem> (<n>).<ext>"` next to `path`
pub fn numbered_path(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
        None => format!("{} ({})", stem, n),
    };

    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// First of `desired`, `desired (1)`, `desired (2)`, ... accepted by `is_free`
pub fn disambiguate(desired: &Path, is_free: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    if is_free(desired) {
        return Some(desired.to_path_buf());
    }

    (1..=MAX_DISAMBIGUATION)
        .map(|n| numbered_path(desired, n))
        .find(|candidate| is_free(candidate))
}

/// Pick a target that neither overwrites an existing file nor repeats a
/// target claimed earlier in the run. The source itself counts as free, so a
/// file already carrying a disambiguated name keeps it on later runs.
pub fn resolve_target(desired: &Path, source: &Path, claimed: &ClaimedPaths) -> Option<PathBuf> {
    disambiguate(desired, |candidate| {
        if claimed.contains(candidate) {
            return false;
        }
        candidate == source || !exists(candidate)
    })
}
