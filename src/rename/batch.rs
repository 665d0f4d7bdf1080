use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::media::Media;
use crate::target::Target;

use super::executor::{RenameError, Renamer};
use super::types::RenameResult;

/// One directory together with the metadata used to rename it
#[derive(Debug, Clone)]
pub struct RenameJob {
    pub target: Target,
    pub media: Media,
}

impl RenameJob {
    pub fn new(target: Target, media: Media) -> Self {
        Self { target, media }
    }
}

/// Run independent targets on a pool of `workers` threads.
///
/// Each target is still processed file by file; results come back in job
/// order whatever order the workers finish in.
pub fn rename_targets(
    renamer: &Renamer,
    jobs: &[RenameJob],
    workers: usize,
) -> Result<Vec<Result<RenameResult, RenameError>>, RenameError> {
    let workers = workers.max(1).min(jobs.len().max(1));
    info!(jobs = jobs.len(), workers, "Renaming targets");

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("autotitle-worker-{}", i))
        .build()?;

    let results = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                debug!(path = ?job.target.path, "Worker picked up target");
                renamer.execute(&job.target, &job.media)
            })
            .collect()
    });

    Ok(results)
}
