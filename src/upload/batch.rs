// ABOUTME: Per-worker batch loop: hash, negotiate, and upload one sub-batch at a time.
// ABOUTME: Bounds resident blob memory to a single sub-batch's distinct blobs.

use super::error::PipelineError;
use super::hasher::hash_file;
use super::negotiate::negotiate;
use super::uploader::{BlobCache, upload_required};
use crate::files::DeployFile;
use crate::hosting::{HostingApi, Manifest};
use crate::types::{BearerToken, VersionHandle};
use std::fmt;
use thiserror::Error;

/// Largest sub-batch the pipeline will ever negotiate.
pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchSizeError {
    #[error("batch size must be at least 1")]
    Zero,

    #[error("batch size {0} exceeds the maximum of 1000")]
    TooLarge(usize),
}

/// Maximum number of files per sub-batch, in `1..=MAX_BATCH_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(value: usize) -> Result<Self, BatchSizeError> {
        match value {
            0 => Err(BatchSizeError::Zero),
            v if v > MAX_BATCH_SIZE => Err(BatchSizeError::TooLarge(v)),
            v => Ok(Self(v)),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(MAX_BATCH_SIZE)
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters from one worker's run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub sub_batches: usize,
    pub files: usize,
    /// Distinct digests summed over sub-batches.
    pub distinct_blobs: usize,
    pub uploaded_blobs: usize,
    pub skipped_blobs: usize,
    /// Largest blob cache held at once.
    pub peak_cached_blobs: usize,
}

impl WorkerStats {
    pub fn merge(&mut self, other: &WorkerStats) {
        self.sub_batches += other.sub_batches;
        self.files += other.files;
        self.distinct_blobs += other.distinct_blobs;
        self.uploaded_blobs += other.uploaded_blobs;
        self.skipped_blobs += other.skipped_blobs;
        self.peak_cached_blobs = self.peak_cached_blobs.max(other.peak_cached_blobs);
    }
}

/// Drives the hash → negotiate → upload protocol over a worker's files.
pub struct BatchProcessor<A> {
    api: A,
    token: BearerToken,
    version: VersionHandle,
    batch_size: BatchSize,
}

impl<A: HostingApi> BatchProcessor<A> {
    pub fn new(api: A, token: BearerToken, version: VersionHandle, batch_size: BatchSize) -> Self {
        Self {
            api,
            token,
            version,
            batch_size,
        }
    }

    /// Process `files` in order, one sub-batch at a time.
    ///
    /// The first error ends the run; nothing after the failing sub-batch is
    /// attempted.
    pub async fn run(&self, files: &[DeployFile]) -> Result<WorkerStats, PipelineError> {
        let mut stats = WorkerStats::default();

        for (index, sub_batch) in files.chunks(self.batch_size.get()).enumerate() {
            tracing::debug!(index, files = sub_batch.len(), "processing sub-batch");
            self.process_sub_batch(sub_batch, &mut stats).await?;
        }

        Ok(stats)
    }

    async fn process_sub_batch(
        &self,
        sub_batch: &[DeployFile],
        stats: &mut WorkerStats,
    ) -> Result<(), PipelineError> {
        let mut manifest = Manifest::new();
        let mut cache = BlobCache::with_capacity(sub_batch.len());

        for file in sub_batch {
            let blob = hash_file(&file.local_path).await?;
            manifest.insert(file.site_path.clone(), blob.digest.clone());
            cache.entry(blob.digest).or_insert(blob.compressed);
        }

        let negotiation = negotiate(&self.api, &self.token, &self.version, &manifest).await?;
        let outcome = upload_required(&self.api, &self.token, &negotiation, &cache).await?;

        stats.sub_batches += 1;
        stats.files += sub_batch.len();
        stats.distinct_blobs += cache.len();
        stats.uploaded_blobs += outcome.uploaded;
        stats.skipped_blobs += outcome.skipped;
        stats.peak_cached_blobs = stats.peak_cached_blobs.max(cache.len());

        // The cache is dropped here, before the next sub-batch is hashed.
        Ok(())
    }
}
