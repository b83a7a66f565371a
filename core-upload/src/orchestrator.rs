//! Upload orchestrator
//!
//! Drives a batch of queued photos into the resolved photos folder. The
//! destination is created lazily with exactly one call per batch; items are
//! submitted fully concurrently and settle independently.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_traits::storage::FolderStore;
use bytes::Bytes;
use core_imaging::{NormalizedImage, TranscodePipeline};
use core_nav::TargetFolder;
use core_runtime::events::{CoreEvent, EventBus, UploadEvent};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{Result, UploadError};
use crate::queue::IntakeQueue;
use crate::types::PhotoStatus;

/// Aggregate result of a settled batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchReport {
    /// Classify the batch for the user: three distinct outcomes, never a
    /// single boolean.
    pub fn outcome(&self) -> BatchOutcome {
        if self.failed == 0 {
            BatchOutcome::AllSucceeded
        } else if self.succeeded == 0 {
            BatchOutcome::AllFailed
        } else {
            BatchOutcome::Partial {
                succeeded: self.succeeded,
                failed: self.failed,
            }
        }
    }
}

/// User-visible batch classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    AllFailed,
    Partial { succeeded: usize, failed: usize },
}

/// One photo's data snapshot taken before the concurrent submission
struct UploadJob {
    index: usize,
    source: Bytes,
    normalized: Option<NormalizedImage>,
    display_name: String,
    original_extension: String,
}

/// Upload orchestrator
///
/// # Example
///
/// ```ignore
/// let orchestrator = UploadOrchestrator::new(store, pipeline, event_bus);
/// let (report, resolved) = orchestrator.upload_batch(&mut queue, &target).await?;
/// match report.outcome() {
///     BatchOutcome::AllSucceeded => { /* clear form */ }
///     _ => { /* failed photos stayed queued */ }
/// }
/// ```
pub struct UploadOrchestrator {
    store: Arc<dyn FolderStore>,
    pipeline: TranscodePipeline,
    event_bus: Arc<EventBus>,
}

impl UploadOrchestrator {
    pub fn new(
        store: Arc<dyn FolderStore>,
        pipeline: TranscodePipeline,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            pipeline,
            event_bus,
        }
    }

    /// Upload every queued photo into the target folder.
    ///
    /// When the target does not exist yet, exactly one create-folder call is
    /// issued and its id serves the whole batch. All uploadable photos are
    /// submitted together; each settles independently and one failure never
    /// cancels or delays the others. Successful photos leave the queue;
    /// failures stay queued for a repeat submission.
    ///
    /// Returns the batch report and the resolved target (with the concrete
    /// folder id when it was just created).
    ///
    /// # Errors
    ///
    /// Only the lazy folder creation can fail the batch as a whole; from
    /// that point on failures are captured per photo.
    #[instrument(skip(self, queue, target), fields(total = queue.len(), target_exists = target.exists))]
    pub async fn upload_batch(
        &self,
        queue: &mut IntakeQueue,
        target: &TargetFolder,
    ) -> Result<(BatchReport, TargetFolder)> {
        let total = queue.len();
        if total == 0 {
            return Ok((
                BatchReport {
                    succeeded: 0,
                    failed: 0,
                    total: 0,
                },
                target.clone(),
            ));
        }

        // Resolve the concrete destination id; the creation happens at most
        // once per batch, never per photo.
        let resolved = if target.exists {
            target.clone()
        } else {
            let created = self
                .store
                .create_folder(&target.id, &target.name)
                .await
                .map_err(UploadError::Destination)?;
            info!(folder_id = %created.id, "Created photos folder");
            TargetFolder {
                name: created.name,
                id: created.id,
                exists: true,
            }
        };

        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::BatchStarted { total }))
            .ok();

        // Snapshot jobs and mark every queued photo as uploading. Photos
        // whose normalization failed are re-attempted; corrupt input fails
        // again per item without touching its siblings.
        let mut jobs = Vec::new();
        for index in 0..total {
            queue.set_status(index, PhotoStatus::Uploading);
            let photo = &queue.photos()[index];
            jobs.push(UploadJob {
                index,
                source: photo.source.clone(),
                normalized: photo.normalized.clone(),
                display_name: photo.display_name.clone(),
                original_extension: photo.original_extension.clone(),
            });
        }

        // Fully concurrent submission with no throttling; the batch
        // completes when every item has individually settled.
        let results = join_all(jobs.into_iter().map(|job| {
            let store = Arc::clone(&self.store);
            let pipeline = self.pipeline.clone();
            let destination = resolved.id.clone();
            async move {
                let index = job.index;
                let outcome = Self::upload_one(store, pipeline, destination, job).await;
                (index, outcome)
            }
        }))
        .await;

        let mut succeeded = 0usize;
        for (index, outcome) in results {
            match outcome {
                Ok(()) => {
                    succeeded += 1;
                    queue.set_status(index, PhotoStatus::Done);
                }
                Err(message) => {
                    warn!(index, error = %message, "Photo upload failed");
                    queue.photo_mut(index).error = Some(message);
                    queue.set_status(index, PhotoStatus::Error);
                }
            }
        }

        // Done photos leave the queue, releasing their previews; failures
        // remain eligible for re-submission.
        queue.remove_completed();

        let report = BatchReport {
            succeeded,
            failed: total - succeeded,
            total,
        };

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            total = report.total,
            "Upload batch settled"
        );
        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::BatchCompleted {
                succeeded: report.succeeded,
                failed: report.failed,
                total: report.total,
            }))
            .ok();

        Ok((report, resolved))
    }

    /// Normalize (when intake has not), encode and submit a single photo.
    async fn upload_one(
        store: Arc<dyn FolderStore>,
        pipeline: TranscodePipeline,
        destination: String,
        job: UploadJob,
    ) -> std::result::Result<(), String> {
        let normalized = match job.normalized {
            Some(normalized) => normalized,
            None => {
                let data = job.source.clone();
                tokio::task::spawn_blocking(move || pipeline.normalize(&data))
                    .await
                    .map_err(|e| e.to_string())?
                    .map_err(|e| e.to_string())?
            }
        };

        let extension = normalized.effective_extension(&job.original_extension);
        let trimmed = job.display_name.trim();
        let file_name = if extension.is_empty() {
            trimmed.to_string()
        } else {
            format!("{}.{}", trimmed, extension)
        };

        let payload = BASE64.encode(&normalized.data);
        store
            .upload_file(&destination, &file_name, &payload)
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}
