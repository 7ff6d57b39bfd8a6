// ABOUTME: Coordinator: partitions files, spawns one worker per share, aggregates fail-fast.
// ABOUTME: The first failed or vanished worker decides the outcome; others are not cancelled.

use super::batch::{BatchSize, WorkerStats};
use super::error::UploadError;
use super::partition::partition;
use super::worker::{WorkAssignment, WorkerResult, run_worker};
use crate::files::DeployFile;
use crate::hosting::HostingApi;
use crate::types::{BearerToken, VersionHandle};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use nonempty::NonEmpty;
use std::num::NonZeroUsize;
use tokio::sync::oneshot;
use tracing::Instrument;

/// Tuning for a parallel upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSettings {
    /// Number of shares the file list is split into.
    pub workers: NonZeroUsize,
    pub batch_size: BatchSize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            batch_size: BatchSize::default(),
        }
    }
}

/// Totals across every worker of a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Workers actually started (shares that had files).
    pub workers: usize,
    pub stats: WorkerStats,
}

/// Runs the parallel upload of one file list into one version.
pub struct Coordinator<A> {
    api: A,
    settings: UploadSettings,
}

impl<A> Coordinator<A>
where
    A: HostingApi + Clone + 'static,
{
    pub fn new(api: A, settings: UploadSettings) -> Self {
        Self { api, settings }
    }

    /// Upload `files` into `version`, one worker per non-empty share.
    ///
    /// Succeeds only if every worker succeeds. Returns as soon as any worker
    /// fails or stops without reporting; workers still running are left to
    /// finish on their own.
    pub async fn run(
        &self,
        token: BearerToken,
        version: VersionHandle,
        files: Vec<DeployFile>,
    ) -> Result<UploadSummary, UploadError> {
        let total = files.len();
        let mut pending = FuturesUnordered::new();

        for (worker, share) in partition(files, self.settings.workers)
            .into_iter()
            .enumerate()
        {
            let Some(files) = NonEmpty::from_vec(share) else {
                continue;
            };

            let (assign_tx, assign_rx) = oneshot::channel();
            let (result_tx, result_rx) = oneshot::channel();

            tokio::spawn(
                run_worker(
                    self.api.clone(),
                    self.settings.batch_size,
                    assign_rx,
                    result_tx,
                )
                .instrument(tracing::info_span!("worker", id = worker)),
            );

            let assignment = WorkAssignment {
                token: token.clone(),
                version: version.clone(),
                files,
            };
            if assign_tx.send(assignment).is_err() {
                return Err(UploadError::WorkerAborted { worker });
            }

            pending.push(async move { (worker, result_rx.await) });
        }

        tracing::debug!(files = total, workers = pending.len(), "workers started");

        let mut summary = UploadSummary {
            workers: pending.len(),
            stats: WorkerStats::default(),
        };

        while let Some((worker, result)) = pending.next().await {
            match result {
                Ok(WorkerResult::Success(stats)) => summary.stats.merge(&stats),
                Ok(WorkerResult::Failure(source)) => {
                    return Err(UploadError::WorkerFailed { worker, source });
                }
                Err(_) => return Err(UploadError::WorkerAborted { worker }),
            }
        }

        Ok(summary)
    }
}
