use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::events::{CancelToken, Event, EventSink, NullSink};
use crate::media::Media;
use crate::pattern::{compile, Captures, Pattern, Placeholder};
use crate::scanner::{scan_files, FileEntry, ScannerError};
use crate::target::Target;

use super::collision::{disambiguate, resolve_target, ClaimedPaths, MAX_DISAMBIGUATION};
use super::name_builder::{compose, FieldValues, OutputSpec};
use super::types::{FileError, RenameOperation, RenameResult};

/// Errors that abort a whole target
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Failed to read target directory: {0}")]
    Scan(#[from] ScannerError),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Options for a rename run
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub dry_run: bool,
    /// Copy each source here before moving it; relative paths are resolved
    /// against the target directory
    pub backup_dir: Option<PathBuf>,
    /// Extensions considered media; empty accepts every file
    pub formats: Vec<String>,
}

struct CompiledRule<'a> {
    patterns: Vec<Pattern>,
    output: &'a OutputSpec,
}

/// Renames the files of a target directory using episode metadata
pub struct Renamer {
    options: RenameOptions,
    events: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl Renamer {
    pub fn new(options: RenameOptions) -> Self {
        Self {
            options,
            events: Arc::new(NullSink),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_dry_run(mut self) -> Self {
        self.options.dry_run = true;
        self
    }

    pub fn with_events(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Arc::new(sink);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn emit(&self, event: Event) {
        self.events.emit(event);
    }

    /// Rename every matching file in `target.path`.
    ///
    /// Only a failure to list the directory is returned as an error; per-file
    /// problems are recorded on the operations and reported as events.
    pub fn execute(&self, target: &Target, media: &Media) -> Result<RenameResult, RenameError> {
        info!(path = ?target.path, dry_run = self.options.dry_run, "Renaming target");

        let files = scan_files(&target.path, &self.options.formats)?;
        let rules = self.compile_rules(target);

        let mut result = RenameResult::new(self.options.dry_run);
        let mut claimed = ClaimedPaths::new();

        for (i, file) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                let remaining = files.len() - i;
                warn!(remaining, "Rename cancelled");
                self.emit(
                    Event::warning(format!("Cancelled: {} file(s) not processed", remaining))
                        .with_source(&target.path),
                );
                result.cancelled = true;
                break;
            }

            let Some((captures, output)) = find_rule(&rules, &file.name) else {
                trace!(name = %file.name, "No pattern matched");
                continue;
            };

            debug!(name = %file.name, "Matched");
            self.emit(Event::info(format!("Matched: {}", file.name)).with_source(&file.path));

            match self.plan(file, &captures, output, media) {
                Some(op) => result.add_operation(self.apply(op, &target.path, &mut claimed)),
                None => result.skipped_files += 1,
            }
        }

        info!(
            operations = result.len(),
            skipped = result.skipped_files,
            "Target complete"
        );

        Ok(result)
    }

    fn compile_rules<'a>(&self, target: &'a Target) -> Vec<CompiledRule<'a>> {
        target
            .patterns
            .iter()
            .map(|rule| {
                let patterns = rule
                    .input
                    .iter()
                    .filter_map(|template| match compile(template) {
                        Ok(pattern) => Some(pattern),
                        Err(e) => {
                            error!(template = %template, "Invalid pattern: {}", e);
                            self.emit(
                                Event::error(format!("Invalid pattern: {} ({})", template, e))
                                    .with_source(&target.path),
                            );
                            None
                        }
                    })
                    .collect();

                CompiledRule {
                    patterns,
                    output: &rule.output,
                }
            })
            .collect()
    }

    /// Resolve the episode and build the operation, or `None` if the file is skipped
    fn plan(
        &self,
        file: &FileEntry,
        captures: &Captures,
        output: &OutputSpec,
        media: &Media,
    ) -> Option<RenameOperation> {
        let parsed = match captures
            .get(Placeholder::EpNum)
            .and_then(|n| n.parse::<i64>().ok())
        {
            Some(n) => n,
            None => {
                warn!(name = %file.name, "Unparseable episode number");
                self.emit(
                    Event::warning(format!(
                        "Skipped: {} (unparseable episode number)",
                        file.name
                    ))
                    .with_source(&file.path),
                );
                return None;
            }
        };

        let Some(lookup) = parsed.checked_add(output.offset) else {
            warn!(name = %file.name, offset = output.offset, "Episode number out of range");
            self.emit(
                Event::warning(format!("Skipped: {} (episode number out of range)", file.name))
                    .with_source(&file.path),
            );
            return None;
        };

        let Some(episode) = media.episode(lookup) else {
            warn!(name = %file.name, episode = lookup, "Episode not found");
            self.emit(
                Event::warning(format!("Skipped: {} (episode {} not found)", file.name, lookup))
                    .with_source(&file.path),
            );
            return None;
        };

        let values = FieldValues {
            series: non_empty_or(&media.title, captures.get(Placeholder::Series)),
            series_en: captured_or(captures.get(Placeholder::SeriesEn), &media.title),
            series_jp: captured_or(captures.get(Placeholder::SeriesJp), &media.title),
            episode_number: Some(parsed),
            episode_name: episode.title.clone(),
            filler: episode.filler,
            resolution: captures.get(Placeholder::Res).unwrap_or_default().to_string(),
        };

        let extension = match file.extension() {
            "" => captures.extension().unwrap_or_default(),
            ext => ext,
        };

        let name = compose(output, &values, extension);
        debug!(from = %file.name, to = %name, episode = lookup, "Composed name");

        Some(RenameOperation::new(file.path.clone(), name, lookup))
    }

    /// Collision check, then backup and move unless this is a dry run
    fn apply(
        &self,
        mut op: RenameOperation,
        target_dir: &Path,
        claimed: &mut ClaimedPaths,
    ) -> RenameOperation {
        let Some(resolved) = resolve_target(&op.target_path, &op.source_path, claimed) else {
            let err = FileError::CollisionUnresolved {
                name: op.target_name.clone(),
                attempts: MAX_DISAMBIGUATION,
            };
            error!(from = %op.source_name, "{}", err);
            self.emit(
                Event::error(format!(
                    "Rename failed: {} → {} ({})",
                    op.source_name, op.target_name, err
                ))
                .with_source(&op.source_path),
            );
            op.fail(err);
            return op;
        };

        if resolved != op.target_path {
            let desired = op.target_name.clone();
            op.retarget(resolved);
            if op.target_path != op.source_path {
                warn!(desired = %desired, actual = %op.target_name, "Target name taken");
                self.emit(
                    Event::warning(format!("Collision: {} → {}", desired, op.target_name))
                        .with_source(&op.source_path),
                );
            }
        }

        // Only names that end up in use are claimed; a failed operation frees its name
        if op.target_path == op.source_path {
            debug!(name = %op.source_name, "Already named");
            self.emit(
                Event::info(format!("Unchanged: {}", op.source_name)).with_source(&op.source_path),
            );
            claimed.claim(&op.target_path);
            op.skip();
            return op;
        }

        if self.options.dry_run {
            claimed.claim(&op.target_path);
            self.emit(
                Event::info(format!("Would rename: {} → {}", op.source_name, op.target_name))
                    .with_source(&op.source_path),
            );
            return op;
        }

        if let Some(backup_dir) = &self.options.backup_dir {
            match backup_file(&op.source_path, &target_dir.join(backup_dir)) {
                Ok(path) => {
                    debug!(backup = ?path, "Backed up");
                    self.emit(
                        Event::info(format!("Backed up: {}", op.source_name))
                            .with_source(&op.source_path),
                    );
                }
                Err(source) => {
                    error!(name = %op.source_name, "Backup failed: {}", source);
                    self.emit(
                        Event::error(format!("Backup failed: {} ({})", op.source_name, source))
                            .with_source(&op.source_path),
                    );
                    op.fail(FileError::Backup { source });
                    return op;
                }
            }
        }

        match fs::rename(&op.source_path, &op.target_path) {
            Ok(()) => {
                info!("Renamed: {} -> {}", op.source_name, op.target_name);
                self.emit(
                    Event::success(format!("Renamed: {} → {}", op.source_name, op.target_name))
                        .with_source(&op.source_path),
                );
                claimed.claim(&op.target_path);
                op.succeed();
            }
            Err(source) => {
                error!(from = %op.source_name, to = %op.target_name, "Rename failed: {}", source);
                self.emit(
                    Event::error(format!(
                        "Rename failed: {} → {} ({})",
                        op.source_name, op.target_name, source
                    ))
                    .with_source(&op.source_path),
                );
                op.fail(FileError::Filesystem { source });
            }
        }

        op
    }
}

fn find_rule<'r, 'a>(
    rules: &'r [CompiledRule<'a>],
    filename: &str,
) -> Option<(Captures, &'a OutputSpec)> {
    rules.iter().find_map(|rule| {
        rule.patterns
            .iter()
            .find_map(|p| p.matches(filename))
            .map(|captures| (captures, rule.output))
    })
}

fn non_empty_or(value: &str, fallback: Option<&str>) -> String {
    if value.is_empty() {
        fallback.unwrap_or_default().to_string()
    } else {
        value.to_string()
    }
}

fn captured_or(captured: Option<&str>, fallback: &str) -> String {
    captured.unwrap_or(fallback).to_string()
}

/// Copy `source` into `backup_dir` without overwriting earlier backups
fn backup_file(source: &Path, backup_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(backup_dir)?;

    let file_name = source.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "source has no file name")
    })?;

    let destination = disambiguate(&backup_dir.join(file_name), |p| !p.exists()).ok_or_else(
        || std::io::Error::new(std::io::ErrorKind::AlreadyExists, "no free backup name"),
    )?;

    fs::copy(source, &destination)?;
    Ok(destination)
}
