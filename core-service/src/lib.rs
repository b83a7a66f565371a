//! Core service facade and bootstrap helpers.
//!
//! This crate wires the bridge implementations (HTTP, settings storage,
//! clock) into the Field Photo Core and exposes [`PhotoSession`], the single
//! entry point host applications drive. Desktop apps typically enable the
//! `desktop-shims` feature for a reqwest-backed HTTP default and construct a
//! `SqliteSettingsStore` from `bridge-desktop`.
//!
//! A session owns one navigation state machine, one intake queue, the
//! upload orchestrator and the last-location cache; every successful
//! navigation snapshot is persisted so the next session resumes in place.

pub mod config;
pub mod error;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, Result};

use bridge_traits::storage::{CreatedItem, FolderStore, SettingsStore};
use bridge_traits::time::Clock;
use core_imaging::{TranscodeConfig, TranscodePipeline};
use core_nav::{FolderItem, LocationCache, NavView, Navigator};
use core_runtime::events::EventBus;
use core_upload::{BatchReport, IntakePhoto, IntakeQueue, SourcePhoto, UploadOrchestrator};
use provider_drive::DriveClient;
use std::sync::Arc;
use tracing::instrument;

/// Primary facade exposed to host applications.
///
/// # Example
///
/// ```ignore
/// use core_service::{CoreConfig, PhotoSession};
///
/// let config = CoreConfig::builder()
///     .endpoint_url("https://hook.example/folders")
///     .settings_store(settings_store)
///     .build()?;
///
/// let mut session = PhotoSession::new(config);
/// let view = session.start().await?;
/// ```
pub struct PhotoSession {
    store: Arc<dyn FolderStore>,
    navigator: Navigator,
    queue: IntakeQueue,
    orchestrator: UploadOrchestrator,
    cache: LocationCache,
    clock: Arc<dyn Clock>,
    event_bus: Arc<EventBus>,
}

impl PhotoSession {
    /// Create a session against the configured drive endpoint.
    pub fn new(config: CoreConfig) -> Self {
        let store: Arc<dyn FolderStore> = Arc::new(DriveClient::new(
            config.http_client.clone(),
            config.endpoint_url.clone(),
        ));
        Self::with_store(
            store,
            config.settings_store,
            config.clock,
            config.event_bus,
            config.transcode,
        )
    }

    /// Create a session over an explicit folder store.
    ///
    /// Used by tests and by hosts that bring their own provider.
    pub fn with_store(
        store: Arc<dyn FolderStore>,
        settings_store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        event_bus: Arc<EventBus>,
        transcode: TranscodeConfig,
    ) -> Self {
        let pipeline = TranscodePipeline::new(transcode);
        Self {
            navigator: Navigator::new(store.clone(), event_bus.clone()),
            queue: IntakeQueue::new(pipeline.clone(), event_bus.clone()),
            orchestrator: UploadOrchestrator::new(store.clone(), pipeline, event_bus.clone()),
            cache: LocationCache::new(settings_store, clock.clone()),
            store,
            clock,
            event_bus,
        }
    }

    /// Event bus carrying navigation and upload events.
    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    /// Photos currently staged for upload.
    pub fn queued_photos(&self) -> &[IntakePhoto] {
        self.queue.photos()
    }

    /// Current navigation state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Start the session: resume the saved location when a fresh snapshot
    /// exists, otherwise enter the root folder.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<NavView> {
        let view = match self.cache.load().await {
            Some(saved) => self.navigator.restore(saved).await?,
            None => self.navigator.enter_root().await?,
        };
        self.save_location().await;
        Ok(view)
    }

    /// Enter a folder at the current level.
    pub async fn select_folder(
        &mut self,
        folder_id: impl Into<String>,
        folder_name: impl Into<String>,
    ) -> Result<NavView> {
        let view = self.navigator.select(folder_id, folder_name).await?;
        self.save_location().await;
        Ok(view)
    }

    /// Jump backward to a breadcrumb.
    pub async fn jump_to(&mut self, index: usize) -> Result<NavView> {
        let view = self.navigator.jump_to(index).await?;
        self.save_location().await;
        Ok(view)
    }

    /// Retry the failed load of the current folder.
    pub async fn retry(&mut self) -> Result<NavView> {
        let view = self.navigator.retry().await?;
        self.save_location().await;
        Ok(view)
    }

    /// Filter the folder list.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.navigator.set_search_query(query);
    }

    /// Whether a search box is worth showing at the current level.
    pub fn search_visible(&self) -> bool {
        self.navigator.search_visible()
    }

    /// Folders at the current level, filtered by the search query.
    pub fn visible_folders(&self) -> Vec<&FolderItem> {
        self.navigator.visible_folders()
    }

    /// Create a visit folder with the next generated name under the current
    /// folder and navigate into it.
    #[instrument(skip(self))]
    pub async fn create_visit_folder(&mut self) -> Result<NavView> {
        let name = self.navigator.next_visit_name(self.clock.now());
        let parent_id = self.navigator.current_folder_id().to_string();
        let created = self.store.create_folder(&parent_id, &name).await?;
        let view = self.navigator.select(created.id, created.name).await?;
        self.save_location().await;
        Ok(view)
    }

    // ------------------------------------------------------------------
    // Intake and upload
    // ------------------------------------------------------------------

    /// Stage captured photos for upload.
    ///
    /// Default names continue the numbering of the files already visible in
    /// the current folder. Returns the queue indices of the added photos.
    pub async fn stage_photos(&mut self, photos: Vec<SourcePhoto>) -> Vec<usize> {
        let existing = self.navigator.files().to_vec();
        self.queue.add_photos(photos, &existing).await
    }

    /// Rename a staged photo.
    pub fn rename_photo(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        Ok(self.queue.rename_photo(index, name)?)
    }

    /// Remove a staged photo, releasing its preview.
    pub fn remove_photo(&mut self, index: usize) -> Result<()> {
        Ok(self.queue.remove_photo(index)?)
    }

    /// Drop the whole intake queue.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Upload the staged photos into the resolved photos destination.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoUploadTarget`] when the current path resolves
    /// no photos destination.
    #[instrument(skip(self))]
    pub async fn upload(&mut self) -> Result<BatchReport> {
        let target = self
            .navigator
            .target_folder()
            .cloned()
            .ok_or(CoreError::NoUploadTarget)?;

        let (report, resolved) = self.orchestrator.upload_batch(&mut self.queue, &target).await?;

        // The lazily created folder becomes the concrete target
        self.navigator.confirm_target(resolved);
        self.save_location().await;
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Item mutations
    // ------------------------------------------------------------------

    /// Rename a remote item.
    ///
    /// A name collision surfaces as
    /// [`BridgeError::NameConflict`](bridge_traits::error::BridgeError::NameConflict),
    /// distinct from generic failures.
    pub async fn rename_item(&self, item_id: &str, new_name: &str) -> Result<CreatedItem> {
        Ok(self.store.rename_item(item_id, new_name).await?)
    }

    /// Delete a remote item.
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        Ok(self.store.delete_item(item_id).await?)
    }

    /// Fetch a displayable thumbnail reference for a remote item.
    pub async fn thumbnail(&self, item_id: &str) -> Result<String> {
        Ok(self.store.fetch_thumbnail(item_id).await?)
    }

    /// Persist the current location; failures are silent by design.
    async fn save_location(&self) {
        self.cache
            .save(self.navigator.breadcrumbs(), self.navigator.target_folder())
            .await;
    }
}
