// ABOUTME: Parallel, content-addressed upload pipeline.
// ABOUTME: Partitions files across workers that hash, negotiate, and upload in sub-batches.

mod batch;
mod coordinator;
mod error;
mod hasher;
mod negotiate;
mod partition;
mod uploader;
mod worker;

#[cfg(test)]
mod fake;

pub use batch::{BatchProcessor, BatchSize, BatchSizeError, MAX_BATCH_SIZE, WorkerStats};
pub use coordinator::{Coordinator, UploadSettings, UploadSummary};
pub use error::{PipelineError, PipelineErrorKind, UploadError};
pub use hasher::{HashedBlob, hash_content, hash_file};
pub use negotiate::{Negotiation, negotiate};
pub use partition::partition;
pub use uploader::{BlobCache, UploadOutcome, upload_required};
pub use worker::{WorkAssignment, WorkerResult};
