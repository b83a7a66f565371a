//! Navigation state machine
//!
//! Owns the breadcrumb stack, loads folder children, runs the automatic
//! folder-selection cascade and resolves the photos destination for the
//! current path. All mutation funnels through the transition methods; the
//! presentation layer only observes [`NavView`] snapshots and the event bus.

use bridge_traits::storage::FolderStore;
use core_runtime::events::{CoreEvent, EventBus, NavEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::cache::SavedLocation;
use crate::conventions::{
    self, CONTROL_FOLDER_NAME, PHOTOS_FOLDER_NAME, REPORTS_PREFIX,
};
use crate::error::{NavError, Result};
use crate::types::{partition_children, Breadcrumb, FileItem, FolderItem, NavView, TargetFolder};

/// Upper bound on automatic redirects (photos-folder redirects and
/// auto-selections) within a single load pass. A cyclic remote structure
/// would otherwise loop forever.
const MAX_REDIRECT_DEPTH: usize = 8;

/// Folder-list size above which the search box is worth showing
const SEARCH_LIST_THRESHOLD: usize = 15;

/// One queued automatic selection check
///
/// Seeded once per project selection, each check is popped and consumed by
/// exactly one load pass, whether or not it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoCheck {
    /// Enter the control folder when a child carries its exact name
    ControlFolder,
    /// Enter the reports folder when exactly one child starts with the
    /// reports prefix
    ReportsFolder,
}

/// Navigation state machine
///
/// # Example
///
/// ```ignore
/// let mut navigator = Navigator::new(store, event_bus);
/// let view = navigator.enter_root().await?;
/// let view = navigator.select("p1", "פרויקט א").await?;
/// ```
pub struct Navigator {
    store: Arc<dyn FolderStore>,
    event_bus: Arc<EventBus>,

    breadcrumbs: Vec<Breadcrumb>,
    pending_auto_checks: VecDeque<AutoCheck>,
    auto_messages: Vec<String>,
    target_folder: Option<TargetFolder>,
    search_query: String,
    folders: Vec<FolderItem>,
    files: Vec<FileItem>,
}

impl Navigator {
    pub fn new(store: Arc<dyn FolderStore>, event_bus: Arc<EventBus>) -> Self {
        Self {
            store,
            event_bus,
            breadcrumbs: vec![Breadcrumb::root()],
            pending_auto_checks: VecDeque::new(),
            auto_messages: Vec::new(),
            target_folder: None,
            search_query: String::new(),
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Current breadcrumb stack, root first
    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    /// Resolved photos destination for the current path, if any
    pub fn target_folder(&self) -> Option<&TargetFolder> {
        self.target_folder.as_ref()
    }

    /// Folders at the current level
    pub fn folders(&self) -> &[FolderItem] {
        &self.folders
    }

    /// Files at the current level
    pub fn files(&self) -> &[FileItem] {
        &self.files
    }

    fn current(&self) -> &Breadcrumb {
        self.breadcrumbs
            .last()
            .expect("breadcrumb stack is never empty")
    }

    /// Id of the current (deepest) crumb
    pub fn current_folder_id(&self) -> &str {
        &self.current().id
    }

    /// Replace the target after its folder was lazily created.
    ///
    /// The upload path creates the photos folder on first upload; the
    /// navigation state must then point at the concrete folder id.
    pub fn confirm_target(&mut self, target: TargetFolder) {
        self.target_folder = Some(target);
    }

    /// Reset to the root folder and load its children.
    #[instrument(skip(self))]
    pub async fn enter_root(&mut self) -> Result<NavView> {
        self.breadcrumbs = vec![Breadcrumb::root()];
        self.pending_auto_checks.clear();
        self.auto_messages.clear();
        self.target_folder = None;
        self.search_query.clear();
        self.run_load_pass().await
    }

    /// Enter a folder at the current level.
    ///
    /// Choosing a top-level project seeds the two-step auto-selection
    /// cascade; it runs once per project selection and is never re-triggered
    /// by manual navigation.
    #[instrument(skip_all)]
    pub async fn select(
        &mut self,
        folder_id: impl Into<String>,
        folder_name: impl Into<String>,
    ) -> Result<NavView> {
        let folder_id = folder_id.into();
        let folder_name = folder_name.into();
        debug!(folder_id = %folder_id, folder_name = %folder_name, "Entering folder");

        let is_project_selection = self.breadcrumbs.len() == 1;
        self.breadcrumbs
            .push(Breadcrumb::new(folder_name, folder_id));

        if is_project_selection {
            self.pending_auto_checks =
                VecDeque::from([AutoCheck::ControlFolder, AutoCheck::ReportsFolder]);
            self.auto_messages.clear();
        }

        self.target_folder = None;
        self.search_query.clear();
        self.run_load_pass().await
    }

    /// Jump backward to a breadcrumb, discarding deeper history and any
    /// pending auto checks.
    ///
    /// Jumping to the current (deepest) crumb is a no-op returning the
    /// current view.
    #[instrument(skip(self))]
    pub async fn jump_to(&mut self, index: usize) -> Result<NavView> {
        if index >= self.breadcrumbs.len() {
            return Err(NavError::InvalidBreadcrumb(index));
        }
        if index == self.breadcrumbs.len() - 1 {
            return Ok(self.view());
        }

        self.breadcrumbs.truncate(index + 1);
        self.pending_auto_checks.clear();
        self.auto_messages.clear();
        self.target_folder = None;
        self.search_query.clear();
        self.run_load_pass().await
    }

    /// Re-issue the load for the current breadcrumb after a failure.
    #[instrument(skip(self))]
    pub async fn retry(&mut self) -> Result<NavView> {
        self.run_load_pass().await
    }

    /// Restore a previously saved location.
    ///
    /// Re-issues a fresh load for the deepest saved crumb to confirm it
    /// still exists; a location the remote rejects falls back to the root.
    #[instrument(skip(self, saved))]
    pub async fn restore(&mut self, saved: SavedLocation) -> Result<NavView> {
        if saved.breadcrumbs.is_empty() {
            return self.enter_root().await;
        }

        self.breadcrumbs = saved.breadcrumbs;
        self.pending_auto_checks.clear();
        self.auto_messages.clear();
        self.target_folder = None;
        self.search_query.clear();

        match self.run_load_pass().await {
            Ok(view) => {
                info!(depth = view.breadcrumbs.len(), "Restored saved location");
                self.event_bus
                    .emit(CoreEvent::Nav(NavEvent::LocationRestored {
                        depth: view.breadcrumbs.len(),
                    }))
                    .ok();
                Ok(view)
            }
            Err(e) => {
                warn!(error = %e, "Saved location rejected, falling back to root");
                self.event_bus
                    .emit(CoreEvent::Nav(NavEvent::LocationRestoreRejected))
                    .ok();
                self.enter_root().await
            }
        }
    }

    /// Set the folder search query.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Whether showing a search box is worthwhile at the current level.
    pub fn search_visible(&self) -> bool {
        self.breadcrumbs.len() == 1 || self.folders.len() > SEARCH_LIST_THRESHOLD
    }

    /// Folders at the current level filtered by the search query.
    pub fn visible_folders(&self) -> Vec<&FolderItem> {
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return self.folders.iter().collect();
        }

        self.folders
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Name for the next visit folder at the current level.
    pub fn next_visit_name(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        conventions::next_visit_name(self.folders.iter().map(|f| f.name.as_str()), now)
    }

    /// The single load pass, run as an explicit trampoline.
    ///
    /// Each iteration loads the current crumb's children and applies, in
    /// order: the photos-folder hard redirect, target resolution, then at
    /// most one queued auto check. Auto navigation loops instead of
    /// recursing, bounded by `MAX_REDIRECT_DEPTH`.
    async fn run_load_pass(&mut self) -> Result<NavView> {
        let mut redirects = 0usize;

        loop {
            let current_id = self.current().id.clone();

            let children = match self.store.list_children(&current_id).await {
                Ok(children) => children,
                Err(e) => {
                    warn!(folder_id = %current_id, error = %e, "Folder load failed");
                    self.event_bus
                        .emit(CoreEvent::Nav(NavEvent::LoadFailed {
                            message: e.to_string(),
                        }))
                        .ok();
                    return Err(e.into());
                }
            };

            let (folders, files) = partition_children(children);
            self.folders = folders;
            self.files = files;

            // A photos folder among the children is a hard redirect, applied
            // before any other rule.
            if let Some(photos) = self
                .folders
                .iter()
                .find(|f| f.name == PHOTOS_FOLDER_NAME)
                .cloned()
            {
                if redirects >= MAX_REDIRECT_DEPTH {
                    warn!(redirects, "Redirect depth guard tripped");
                    return Err(NavError::TooManyRedirects(redirects));
                }
                redirects += 1;

                debug!(folder_id = %photos.id, "Redirecting into photos folder");
                self.breadcrumbs
                    .push(Breadcrumb::new(photos.name, photos.id.clone()));
                self.event_bus
                    .emit(CoreEvent::Nav(NavEvent::RedirectedToPhotos {
                        folder_id: photos.id,
                    }))
                    .ok();
                continue;
            }

            // Target resolution, recomputed from scratch on every pass.
            let current = self.current();
            self.target_folder = if current.name == PHOTOS_FOLDER_NAME {
                Some(TargetFolder {
                    name: PHOTOS_FOLDER_NAME.to_string(),
                    id: current.id.clone(),
                    exists: true,
                })
            } else if conventions::is_visit_folder(&current.name) {
                // The photos folder will be created lazily on first upload
                Some(TargetFolder {
                    name: PHOTOS_FOLDER_NAME.to_string(),
                    id: current.id.clone(),
                    exists: false,
                })
            } else {
                None
            };

            // At most one queued check is consumed per pass. A check that
            // matches nothing (or ambiguously) is still consumed.
            if let Some(check) = self.pending_auto_checks.pop_front() {
                let auto_pick = match check {
                    AutoCheck::ControlFolder => self
                        .folders
                        .iter()
                        .find(|f| f.name == CONTROL_FOLDER_NAME)
                        .cloned(),
                    AutoCheck::ReportsFolder => {
                        let mut matches = self
                            .folders
                            .iter()
                            .filter(|f| f.name.starts_with(REPORTS_PREFIX));
                        match (matches.next(), matches.next()) {
                            (Some(only), None) => Some(only.clone()),
                            // Zero or ambiguous: leave for manual choice
                            _ => None,
                        }
                    }
                };

                if let Some(folder) = auto_pick {
                    if redirects >= MAX_REDIRECT_DEPTH {
                        warn!(redirects, "Redirect depth guard tripped");
                        return Err(NavError::TooManyRedirects(redirects));
                    }
                    redirects += 1;

                    debug!(folder_id = %folder.id, name = %folder.name, "Auto-selected folder");
                    self.auto_messages.push(folder.name.clone());
                    self.breadcrumbs
                        .push(Breadcrumb::new(folder.name, folder.id));
                    continue;
                }
            }

            // No redirect occurred: surface accumulated auto-selection
            // messages and publish the pass result.
            if !self.auto_messages.is_empty() {
                self.event_bus
                    .emit(CoreEvent::Nav(NavEvent::AutoSelected {
                        names: self.auto_messages.clone(),
                    }))
                    .ok();
            }

            info!(
                depth = self.breadcrumbs.len(),
                folders = self.folders.len(),
                files = self.files.len(),
                "Published navigation view"
            );
            return Ok(self.view());
        }
    }

    fn view(&mut self) -> NavView {
        NavView {
            breadcrumbs: self.breadcrumbs.clone(),
            folders: self.folders.clone(),
            files: self.files.clone(),
            target_folder: self.target_folder.clone(),
            auto_selected: std::mem::take(&mut self.auto_messages),
        }
    }
}
