//! End-to-end tests for the photo session facade
//!
//! These tests drive the full workflow against a stateful in-memory remote:
//! - Start at root, project selection with the auto-selection cascade
//! - Staging and uploading photos with lazy folder creation
//! - Location persistence, resume and TTL expiry
//! - Numbering continuity across sessions

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{ChildItem, CreatedItem, FolderStore, SettingsStore};
use bridge_traits::time::Clock;
use chrono::{DateTime, TimeZone, Utc};
use core_imaging::TranscodeConfig;
use core_nav::LOCATION_TTL_MILLIS;
use core_runtime::events::EventBus;
use core_service::{CoreError, PhotoSession};
use core_upload::{BatchOutcome, SourcePhoto};
use image::{DynamicImage, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

// ============================================================================
// Stateful in-memory remote
// ============================================================================

/// Remote folder tree that mutates on create/upload, like the real service
struct FakeRemote {
    children: Mutex<HashMap<String, Vec<ChildItem>>>,
    next_id: Mutex<u32>,
}

impl FakeRemote {
    fn new() -> Self {
        Self {
            children: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    fn seed(&self, folder_id: &str, children: Vec<ChildItem>) {
        self.children
            .lock()
            .unwrap()
            .insert(folder_id.to_string(), children);
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        let id = format!("{}-{}", prefix, *next);
        *next += 1;
        id
    }
}

#[async_trait]
impl FolderStore for FakeRemote {
    async fn list_children(&self, folder_id: &str) -> BridgeResult<Vec<ChildItem>> {
        self.children
            .lock()
            .unwrap()
            .get(folder_id)
            .cloned()
            .ok_or_else(|| BridgeError::Remote {
                status: 404,
                message: format!("unknown folder {}", folder_id),
            })
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> BridgeResult<CreatedItem> {
        let id = self.allocate_id("folder");
        let mut children = self.children.lock().unwrap();
        children
            .get_mut(parent_id)
            .ok_or_else(|| BridgeError::Remote {
                status: 404,
                message: format!("unknown parent {}", parent_id),
            })?
            .push(ChildItem::folder(id.clone(), name, 0));
        children.insert(id.clone(), Vec::new());
        Ok(CreatedItem {
            id,
            name: name.to_string(),
        })
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        content_base64: &str,
    ) -> BridgeResult<CreatedItem> {
        BASE64
            .decode(content_base64)
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        let id = self.allocate_id("file");
        self.children
            .lock()
            .unwrap()
            .get_mut(folder_id)
            .ok_or_else(|| BridgeError::Remote {
                status: 404,
                message: format!("unknown folder {}", folder_id),
            })?
            .push(ChildItem::file(id.clone(), file_name));
        Ok(CreatedItem {
            id,
            name: file_name.to_string(),
        })
    }

    async fn rename_item(&self, item_id: &str, new_name: &str) -> BridgeResult<CreatedItem> {
        let mut children = self.children.lock().unwrap();
        for items in children.values_mut() {
            if let Some(pos) = items.iter().position(|i| i.id == item_id) {
                if items.iter().any(|i| i.name == new_name && i.id != item_id) {
                    return Err(BridgeError::NameConflict(new_name.to_string()));
                }
                items[pos].name = new_name.to_string();
                return Ok(CreatedItem {
                    id: item_id.to_string(),
                    name: new_name.to_string(),
                });
            }
        }
        Err(BridgeError::Remote {
            status: 404,
            message: format!("unknown item {}", item_id),
        })
    }

    async fn delete_item(&self, item_id: &str) -> BridgeResult<()> {
        let mut children = self.children.lock().unwrap();
        for items in children.values_mut() {
            if let Some(pos) = items.iter().position(|i| i.id == item_id) {
                items.remove(pos);
                return Ok(());
            }
        }
        Err(BridgeError::Remote {
            status: 404,
            message: format!("unknown item {}", item_id),
        })
    }

    async fn fetch_thumbnail(&self, item_id: &str) -> BridgeResult<String> {
        Ok(format!("https://thumbs.example/{}", item_id))
    }
}

// ============================================================================
// Settings store and clock
// ============================================================================

struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> BridgeResult<Vec<String>> {
        Ok(self.values.lock().unwrap().keys().cloned().collect())
    }

    async fn clear_all(&self) -> BridgeResult<()> {
        self.values.lock().unwrap().clear();
        Ok(())
    }
}

struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()),
        }
    }

    fn advance_millis(&self, millis: i64) {
        *self.now.lock().unwrap() += chrono::Duration::milliseconds(millis);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn tiny_jpeg() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([90, 60, 30])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Jpeg)
        .unwrap();
    buffer
}

/// Project tree: root / פרויקט א / בקרת ביצוע / דוחות 2024 / ביקור 1
fn seeded_remote() -> Arc<FakeRemote> {
    let remote = Arc::new(FakeRemote::new());
    remote.seed("root", vec![ChildItem::folder("p1", "פרויקט א", 1)]);
    remote.seed("p1", vec![ChildItem::folder("c1", "בקרת ביצוע", 1)]);
    remote.seed("c1", vec![ChildItem::folder("d1", "דוחות 2024", 1)]);
    remote.seed("d1", vec![ChildItem::folder("v1", "ביקור 1", 0)]);
    remote.seed("v1", vec![]);
    remote
}

fn session(
    remote: Arc<FakeRemote>,
    settings: Arc<MemorySettings>,
    clock: Arc<FixedClock>,
) -> PhotoSession {
    PhotoSession::with_store(
        remote,
        settings,
        clock,
        Arc::new(EventBus::new(100)),
        TranscodeConfig::default(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn full_flow_from_root_to_uploaded_photos() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());
    let mut session = session(remote.clone(), settings, clock);

    // Fresh start: no snapshot, so the session lands on root
    let view = session.start().await.unwrap();
    assert_eq!(view.breadcrumbs.len(), 1);

    // Project selection cascades through the control and reports folders
    let view = session.select_folder("p1", "פרויקט א").await.unwrap();
    assert_eq!(view.breadcrumbs.len(), 4);
    assert_eq!(view.auto_selected, vec!["בקרת ביצוע", "דוחות 2024"]);

    // Enter the visit: the photos folder does not exist yet
    let view = session.select_folder("v1", "ביקור 1").await.unwrap();
    let target = view.target_folder.expect("target expected");
    assert!(!target.exists);
    assert_eq!(target.id, "v1");

    // Stage and upload two photos
    session
        .stage_photos(vec![
            SourcePhoto::new(tiny_jpeg(), "jpg"),
            SourcePhoto::new(tiny_jpeg(), "jpg"),
        ])
        .await;
    assert_eq!(session.queued_photos().len(), 2);

    let report = session.upload().await.unwrap();
    assert_eq!(report.outcome(), BatchOutcome::AllSucceeded);
    assert!(session.queued_photos().is_empty());

    // The lazily created folder is now the concrete target
    let target = session.navigator().target_folder().expect("target expected");
    assert!(target.exists);
    assert!(target.id.starts_with("folder-"));

    // And the remote actually holds both photos
    let photos = remote.list_children(&target.id).await.unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].name, "1.jpg");
    assert_eq!(photos[1].name, "2.jpg");
}

#[tokio::test]
async fn upload_without_a_target_is_rejected() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());
    let mut session = session(remote, settings, clock);

    session.start().await.unwrap();
    let result = session.upload().await;

    assert!(matches!(result, Err(CoreError::NoUploadTarget)));
}

#[tokio::test]
async fn second_session_resumes_inside_the_photos_folder() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());

    // First session navigates and uploads
    {
        let mut first = session(remote.clone(), settings.clone(), clock.clone());
        first.start().await.unwrap();
        first.select_folder("p1", "פרויקט א").await.unwrap();
        first.select_folder("v1", "ביקור 1").await.unwrap();
        first
            .stage_photos(vec![SourcePhoto::new(tiny_jpeg(), "jpg")])
            .await;
        first.upload().await.unwrap();
    }

    // One hour later, the second session resumes at the saved visit and is
    // redirected straight into the now-existing photos folder.
    clock.advance_millis(60 * 60 * 1000);
    let mut second = session(remote, settings, clock);
    let view = second.start().await.unwrap();

    let current = view.breadcrumbs.last().unwrap();
    assert_eq!(current.name, "תמונות");
    let target = view.target_folder.expect("target expected");
    assert!(target.exists);

    // The existing photo is visible, so numbering continues at 2
    assert_eq!(view.files.len(), 1);
    second
        .stage_photos(vec![SourcePhoto::new(tiny_jpeg(), "jpg")])
        .await;
    assert_eq!(second.queued_photos()[0].display_name, "2");
}

#[tokio::test]
async fn expired_snapshot_starts_back_at_root() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());

    {
        let mut first = session(remote.clone(), settings.clone(), clock.clone());
        first.start().await.unwrap();
        first.select_folder("p1", "פרויקט א").await.unwrap();
    }

    clock.advance_millis(LOCATION_TTL_MILLIS + 1);
    let mut second = session(remote, settings, clock);
    let view = second.start().await.unwrap();

    assert_eq!(view.breadcrumbs.len(), 1);
}

#[tokio::test]
async fn deleted_remote_folder_falls_back_to_root_on_resume() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());

    {
        let mut first = session(remote.clone(), settings.clone(), clock.clone());
        first.start().await.unwrap();
        first.select_folder("p1", "פרויקט א").await.unwrap();
        first.select_folder("v1", "ביקור 1").await.unwrap();
    }

    // The visit folder disappears server-side
    remote.children.lock().unwrap().remove("v1");

    let mut second = session(remote, settings, clock);
    let view = second.start().await.unwrap();

    assert_eq!(view.breadcrumbs.len(), 1);
    assert_eq!(view.folders.len(), 1);
}

#[tokio::test]
async fn create_visit_folder_numbers_past_existing_visits() {
    let remote = seeded_remote();
    remote.seed(
        "d1",
        vec![
            ChildItem::folder("v1", "ביקור 1", 0),
            ChildItem::folder("v5", "דוח ביקור מס' 5", 0),
        ],
    );
    remote.seed("v5", vec![]);
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());
    let mut session = session(remote.clone(), settings, clock);

    session.start().await.unwrap();
    // The cascade lands inside דוחות 2024 where the visits live
    session.select_folder("p1", "פרויקט א").await.unwrap();

    let view = session.create_visit_folder().await.unwrap();

    let crumb = view.breadcrumbs.last().unwrap();
    assert_eq!(crumb.name, "ביקור 6 01-06-2025");
    // The new visit resolves a lazy photos target immediately
    let target = view.target_folder.expect("target expected");
    assert!(!target.exists);
}

#[tokio::test]
async fn rename_conflicts_surface_distinctly() {
    let remote = seeded_remote();
    remote.seed(
        "d1",
        vec![
            ChildItem::folder("v1", "ביקור 1", 0),
            ChildItem::folder("v2", "ביקור 2", 0),
        ],
    );
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());
    let session = session(remote, settings, clock);

    let result = session.rename_item("v2", "ביקור 1").await;
    match result {
        Err(CoreError::Bridge(BridgeError::NameConflict(name))) => {
            assert_eq!(name, "ביקור 1");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    let renamed = session.rename_item("v2", "ביקור 3").await.unwrap();
    assert_eq!(renamed.name, "ביקור 3");
}

#[tokio::test]
async fn delete_and_thumbnail_pass_through() {
    let remote = seeded_remote();
    let settings = Arc::new(MemorySettings::new());
    let clock = Arc::new(FixedClock::new());
    let session = session(remote.clone(), settings, clock);

    session.delete_item("v1").await.unwrap();
    assert!(remote.list_children("d1").await.unwrap().is_empty());

    let url = session.thumbnail("p1").await.unwrap();
    assert_eq!(url, "https://thumbs.example/p1");
}
