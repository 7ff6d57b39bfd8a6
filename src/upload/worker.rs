// ABOUTME: Worker task: receives one assignment, runs the batch loop, reports once.
// ABOUTME: Workers share no mutable state; they talk to the coordinator over channels.

use super::batch::{BatchProcessor, BatchSize, WorkerStats};
use super::error::PipelineError;
use crate::files::DeployFile;
use crate::hosting::HostingApi;
use crate::types::{BearerToken, VersionHandle};
use nonempty::NonEmpty;
use tokio::sync::oneshot;

/// Everything one worker needs; moved to it and never shared.
#[derive(Debug)]
pub struct WorkAssignment {
    pub token: BearerToken,
    pub version: VersionHandle,
    pub files: NonEmpty<DeployFile>,
}

/// Terminal status of one worker.
#[derive(Debug)]
pub enum WorkerResult {
    Success(WorkerStats),
    Failure(PipelineError),
}

/// Body of a worker task.
///
/// Returns without reporting if the coordinator drops the assignment sender.
pub(crate) async fn run_worker<A: HostingApi>(
    api: A,
    batch_size: BatchSize,
    assignment: oneshot::Receiver<WorkAssignment>,
    result: oneshot::Sender<WorkerResult>,
) {
    let Ok(assignment) = assignment.await else {
        tracing::debug!("no assignment received");
        return;
    };

    let files: Vec<DeployFile> = assignment.files.into();
    tracing::debug!(files = files.len(), "worker started");

    let processor = BatchProcessor::new(api, assignment.token, assignment.version, batch_size);
    let outcome = match processor.run(&files).await {
        Ok(stats) => {
            tracing::info!(
                files = stats.files,
                sub_batches = stats.sub_batches,
                uploaded = stats.uploaded_blobs,
                "worker finished"
            );
            WorkerResult::Success(stats)
        }
        Err(e) => {
            tracing::error!("worker failed: {}", e);
            WorkerResult::Failure(e)
        }
    };

    if result.send(outcome).is_err() {
        tracing::debug!("coordinator no longer listening");
    }
}
