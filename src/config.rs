use std::env;
use std::path::PathBuf;

/// Environment variable names for runtime configuration
pub const ENV_FORMATS: &str = "AUTOTITLE_FORMATS";
pub const ENV_BACKUP_DIR: &str = "AUTOTITLE_BACKUP_DIR";
pub const ENV_EVENT_BUFFER: &str = "AUTOTITLE_EVENT_BUFFER";
pub const ENV_WORKERS: &str = "AUTOTITLE_WORKERS";

pub const DEFAULT_FORMATS: &[&str] = &["mkv", "mp4", "avi", "webm"];
pub const DEFAULT_BACKUP_DIR: &str = ".autotitle-backup";
pub const DEFAULT_EVENT_BUFFER: usize = 64;
pub const DEFAULT_WORKERS: usize = 4;

/// Settings that CLI flags fall back on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Media extensions considered by the scanner
    pub formats: Vec<String>,
    /// Backup directory used when `--backup` is given without a path
    pub backup_dir: PathBuf,
    /// Capacity of the event queue between the renamer and the terminal
    pub event_buffer: usize,
    /// Worker threads for multi-target runs
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            formats: DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            event_buffer: DEFAULT_EVENT_BUFFER,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Load configuration from environment variables
///
/// Unset or unparseable values keep their defaults. These can be set in a
/// `.env` file in the working directory.
pub fn config_from_env() -> Config {
    let defaults = Config::default();

    let formats = env::var(ENV_FORMATS)
        .ok()
        .map(|v| parse_formats(&v))
        .filter(|f| !f.is_empty())
        .unwrap_or(defaults.formats);

    let backup_dir = env::var(ENV_BACKUP_DIR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or(defaults.backup_dir);

    Config {
        formats,
        backup_dir,
        event_buffer: positive_from_env(ENV_EVENT_BUFFER).unwrap_or(defaults.event_buffer),
        workers: positive_from_env(ENV_WORKERS).unwrap_or(defaults.workers),
    }
}

/// Split a comma list like `"mkv, .MP4"` into normalized extensions
pub fn parse_formats(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|f| f.trim().trim_start_matches('.').to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

fn positive_from_env(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|n: &usize| *n > 0)
}
