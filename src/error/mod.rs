mod codes;

pub use codes::ExitCode;

use crate::media::MediaError;
use crate::pattern::PatternError;
use crate::rename::RenameError;
use crate::scanner::ScannerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Target directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Invalid pattern '{template}': {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: PatternError,
    },

    #[error("Media error: {message}")]
    MediaError {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("{failed} of {total} renames failed")]
    RenamesFailed { failed: usize, total: usize },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::InvalidPattern { .. } => ExitCode::InvalidPattern,
            AppError::MediaError { .. } => ExitCode::MediaError,
            AppError::RenamesFailed { .. } => ExitCode::RenameFailed,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::InvalidPattern { template, source } => {
                let mut msg = format!("Invalid input pattern:\n  {}\n  {}\n\n", template, source);
                msg.push_str("Supported placeholders:\n");
                for placeholder in crate::pattern::Placeholder::ALL {
                    msg.push_str(&format!("  {}\n", placeholder));
                }
                msg
            }

            AppError::MediaError { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Could not load episode metadata:\n  {}\n{}\n\
                     Expected JSON like {{\"title\": \"...\", \"episodes\": \
                     [{{\"number\": 1, \"title\": \"...\", \"filler\": false}}]}}",
                    message, path_info
                )
            }

            AppError::RenamesFailed { failed, total } => {
                format!(
                    "{} of {} renames failed.\n\n\
                     Check file permissions and ensure no files are open.",
                    failed, total
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<RenameError> for AppError {
    fn from(err: RenameError) -> Self {
        match err {
            RenameError::Scan(e) => e.into(),
            RenameError::WorkerPool(e) => AppError::Other(e.to_string()),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        let path = match &err {
            MediaError::Io { path, .. } | MediaError::Parse { path, .. } => Some(path.clone()),
        };
        AppError::MediaError {
            path,
            message: err.to_string(),
        }
    }
}
