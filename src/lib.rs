pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod media;
pub mod output;
pub mod pattern;
pub mod progress;
pub mod rename;
pub mod scanner;
pub mod target;

pub use config::{config_from_env, Config};
pub use error::{AppError, ExitCode};
pub use events::{CancelToken, ChannelSink, Event, EventKind, EventSink, NullSink};
pub use media::{load_media, Episode, Media, MediaError};
pub use pattern::{compile, guess_pattern, Captures, Pattern, PatternError, Placeholder};
pub use rename::{
    compose, rename_targets, Field, FieldToken, FieldValues, FileError, OutputSpec, RenameError,
    RenameJob, RenameOperation, RenameOptions, RenameResult, RenameStatus, Renamer,
};
pub use scanner::{detect_patterns, scan_files, FileEntry, PatternScan, ScannerError};
pub use target::{PatternRule, Target};
