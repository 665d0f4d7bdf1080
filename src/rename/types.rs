use std::path::PathBuf;
use thiserror::Error;

/// Lifecycle of a single file rename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStatus {
    /// Planned; dry runs stop here
    Pending,
    Success,
    Failed,
    /// Nothing to do, the file already has its target name
    Skipped,
}

impl RenameStatus {
    pub fn description(&self) -> &'static str {
        match self {
            RenameStatus::Pending => "pending",
            RenameStatus::Success => "renamed",
            RenameStatus::Failed => "failed",
            RenameStatus::Skipped => "unchanged",
        }
    }
}

/// Why a single file could not be renamed
#[derive(Error, Debug)]
pub enum FileError {
    #[error("no free name for {name} after {attempts} attempts")]
    CollisionUnresolved { name: String, attempts: usize },

    #[error("backup failed: {source}")]
    Backup {
        #[source]
        source: std::io::Error,
    },

    #[error("{source}")]
    Filesystem {
        #[source]
        source: std::io::Error,
    },
}

/// A single file rename
#[derive(Debug)]
pub struct RenameOperation {
    /// Full path to the source file
    pub source_path: PathBuf,
    /// Original file name
    pub source_name: String,
    /// Full path to the destination
    pub target_path: PathBuf,
    /// New file name
    pub target_name: String,
    /// Episode number after applying the offset
    pub episode: i64,
    pub status: RenameStatus,
    pub error: Option<FileError>,
}

impl RenameOperation {
    pub fn new(source_path: PathBuf, target_name: String, episode: i64) -> Self {
        let source_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let target_path = source_path
            .parent()
            .map(|p| p.join(&target_name))
            .unwrap_or_else(|| PathBuf::from(&target_name));

        Self {
            source_path,
            source_name,
            target_path,
            target_name,
            episode,
            status: RenameStatus::Pending,
            error: None,
        }
    }

    /// Point the operation at a different destination
    pub fn retarget(&mut self, target_path: PathBuf) {
        self.target_name = target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.target_path = target_path;
    }

    pub fn succeed(&mut self) {
        self.status = RenameStatus::Success;
    }

    pub fn skip(&mut self) {
        self.status = RenameStatus::Skipped;
    }

    pub fn fail(&mut self, error: FileError) {
        self.status = RenameStatus::Failed;
        self.error = Some(error);
    }
}

/// Result of renaming one target
#[derive(Debug)]
pub struct RenameResult {
    /// Operations in file-processing order
    pub operations: Vec<RenameOperation>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Whether the run stopped early on request
    pub cancelled: bool,
    /// Matched files dropped before an operation existed
    /// (unparseable episode number, episode missing from metadata)
    pub skipped_files: usize,
}

impl RenameResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            dry_run,
            cancelled: false,
            skipped_files: 0,
        }
    }

    pub fn add_operation(&mut self, op: RenameOperation) {
        self.operations.push(op);
    }

    pub fn count(&self, status: RenameStatus) -> usize {
        self.operations.iter().filter(|op| op.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(RenameStatus::Failed) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}
