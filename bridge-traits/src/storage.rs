//! Remote Folder Store and Local Settings Abstractions
//!
//! Provides the contract for the remote hierarchical folder store and for
//! platform-local key-value persistence.

use async_trait::async_trait;

use crate::error::Result;

/// An item inside a remote folder, as returned by a listing.
///
/// Items are tagged folder-or-file; `child_count` is only meaningful for
/// folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildItem {
    pub id: String,
    pub name: String,
    pub is_folder: bool,
    pub child_count: u32,
}

impl ChildItem {
    pub fn folder(id: impl Into<String>, name: impl Into<String>, child_count: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: true,
            child_count,
        }
    }

    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: false,
            child_count: 0,
        }
    }
}

/// Identity of an item created or updated by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedItem {
    pub id: String,
    pub name: String,
}

/// Remote hierarchical folder store
///
/// The store is opaque to the core: every operation is a request/response
/// pair over a JSON transport, and any non-2xx response surfaces as
/// [`BridgeError::Remote`](crate::error::BridgeError::Remote). A 409 on
/// rename maps to [`BridgeError::NameConflict`](crate::error::BridgeError::NameConflict).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FolderStore;
///
/// async fn count_folders(store: &dyn FolderStore) -> Result<usize> {
///     let children = store.list_children("root").await?;
///     Ok(children.iter().filter(|c| c.is_folder).count())
/// }
/// ```
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// List the children of a folder.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildItem>>;

    /// Create a folder under `parent_id`.
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<CreatedItem>;

    /// Upload a file into `folder_id`.
    ///
    /// `content_base64` is the payload already encoded for the text-safe
    /// transport.
    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        content_base64: &str,
    ) -> Result<CreatedItem>;

    /// Rename an item.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NameConflict` when the remote reports the new
    /// name is already taken (409).
    async fn rename_item(&self, item_id: &str, new_name: &str) -> Result<CreatedItem>;

    /// Delete an item.
    async fn delete_item(&self, item_id: &str) -> Result<()>;

    /// Fetch a displayable thumbnail reference (URL) for an item.
    async fn fetch_thumbnail(&self, item_id: &str) -> Result<String>;
}

/// Key-value settings storage trait
///
/// Abstracts platform-specific local persistence. Values are plain strings;
/// callers serialize structured state themselves.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn save_snapshot(store: &dyn SettingsStore, json: &str) -> Result<()> {
///     store.set_string("last_location", json).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    async fn clear_all(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_item_constructors() {
        let folder = ChildItem::folder("f1", "תמונות", 12);
        assert!(folder.is_folder);
        assert_eq!(folder.child_count, 12);

        let file = ChildItem::file("d1", "1.jpg");
        assert!(!file.is_folder);
        assert_eq!(file.child_count, 0);
    }

    #[test]
    fn test_child_item_equality_includes_id() {
        let a = ChildItem::folder("f1", "x", 0);
        let b = ChildItem::folder("f2", "x", 0);
        assert_ne!(a, b);
    }
}
