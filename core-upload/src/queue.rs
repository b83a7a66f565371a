//! Photo intake queue
//!
//! Stages captured photos before upload. Photos are normalized eagerly on
//! intake so oversized captures fail fast and previews are available
//! immediately; a normalization failure marks only that photo and never
//! aborts its siblings.

use core_imaging::TranscodePipeline;
use core_nav::FileItem;
use core_runtime::events::{CoreEvent, EventBus, UploadEvent};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Result, UploadError};
use crate::types::{IntakePhoto, PhotoStatus, SourcePhoto};

/// Parse a file name whose stem is a bare integer (`"17.jpg"`, `"17"`)
fn file_number(name: &str) -> Option<u32> {
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    let stem = stem.trim();
    if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Ordered set of photos staged client-side before upload
pub struct IntakeQueue {
    photos: Vec<IntakePhoto>,
    pipeline: TranscodePipeline,
    event_bus: Arc<EventBus>,
}

impl IntakeQueue {
    pub fn new(pipeline: TranscodePipeline, event_bus: Arc<EventBus>) -> Self {
        Self {
            photos: Vec::new(),
            pipeline,
            event_bus,
        }
    }

    pub fn photos(&self) -> &[IntakePhoto] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Stage captured photos, assigning default names and normalizing each.
    ///
    /// Default names are contiguous integers strictly greater than the
    /// highest number already observed among `existing_files` (the current
    /// photos-folder listing) and the queue itself at the moment of
    /// addition.
    ///
    /// Returns the indices of the added photos.
    pub async fn add_photos(
        &mut self,
        sources: Vec<SourcePhoto>,
        existing_files: &[FileItem],
    ) -> Vec<usize> {
        let mut next = self.next_default_number(existing_files);
        let mut added = Vec::with_capacity(sources.len());

        for source in sources {
            let index = self.photos.len();
            self.photos.push(IntakePhoto {
                source: source.data,
                display_name: next.to_string(),
                original_extension: source.extension,
                status: PhotoStatus::Pending,
                normalized: None,
                preview: None,
                error: None,
            });
            next += 1;
            added.push(index);

            self.set_status(index, PhotoStatus::Converting);

            let pipeline = self.pipeline.clone();
            let data = self.photos[index].source.clone();
            let normalized =
                tokio::task::spawn_blocking(move || pipeline.normalize(&data)).await;

            match normalized {
                Ok(Ok(normalized)) => {
                    debug!(
                        index,
                        bytes = normalized.data.len(),
                        altered = normalized.altered,
                        "Photo normalized on intake"
                    );
                    self.photos[index].preview = Some(normalized.data.clone());
                    self.photos[index].normalized = Some(normalized);
                    self.set_status(index, PhotoStatus::Pending);
                }
                Ok(Err(e)) => {
                    warn!(index, error = %e, "Photo normalization failed");
                    self.photos[index].error = Some(e.to_string());
                    self.set_status(index, PhotoStatus::Error);
                }
                Err(e) => {
                    warn!(index, error = %e, "Photo normalization task failed");
                    self.photos[index].error = Some(e.to_string());
                    self.set_status(index, PhotoStatus::Error);
                }
            }
        }

        added
    }

    /// Rename a queued photo (extension is managed separately).
    pub fn rename_photo(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let photo = self
            .photos
            .get_mut(index)
            .ok_or(UploadError::InvalidIndex(index))?;
        photo.display_name = name.into();
        Ok(())
    }

    /// Remove a queued photo, releasing its preview.
    pub fn remove_photo(&mut self, index: usize) -> Result<()> {
        if index >= self.photos.len() {
            return Err(UploadError::InvalidIndex(index));
        }
        // Dropping the record releases the preview and source buffers
        self.photos.remove(index);
        Ok(())
    }

    /// Drop the whole queue, releasing every preview.
    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Remove photos that uploaded successfully, keeping failures queued
    /// for a repeat submission.
    pub(crate) fn remove_completed(&mut self) {
        self.photos.retain(|p| p.status != PhotoStatus::Done);
    }

    pub(crate) fn photo_mut(&mut self, index: usize) -> &mut IntakePhoto {
        &mut self.photos[index]
    }

    pub(crate) fn set_status(&mut self, index: usize, status: PhotoStatus) {
        self.photos[index].status = status;
        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::PhotoStatusChanged {
                index,
                status: status.as_str().to_string(),
            }))
            .ok();
    }

    /// First free default number: one more than the highest number among the
    /// existing remote files and the queue itself.
    fn next_default_number(&self, existing_files: &[FileItem]) -> u32 {
        let remote_max = existing_files
            .iter()
            .filter_map(|f| file_number(&f.name))
            .max()
            .unwrap_or(0);

        let queued_max = self
            .photos
            .iter()
            .filter_map(|p| file_number(p.display_name.trim()))
            .max()
            .unwrap_or(0);

        remote_max.max(queued_max) + 1
    }
}
