//! Navigation domain types

use bridge_traits::storage::ChildItem;
use serde::{Deserialize, Serialize};

use crate::conventions::{ROOT_FOLDER_ID, ROOT_FOLDER_NAME};

/// One step of the current path. Index 0 is always the synthetic root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub id: String,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The synthetic root crumb
    pub fn root() -> Self {
        Self::new(ROOT_FOLDER_NAME, ROOT_FOLDER_ID)
    }
}

/// A remote folder at the current level
///
/// Identity (and therefore equality) is the remote id; names are not unique.
#[derive(Debug, Clone, Eq)]
pub struct FolderItem {
    pub id: String,
    pub name: String,
    pub child_count: u32,
}

impl PartialEq for FolderItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A remote non-folder item at the current level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub id: String,
    pub name: String,
}

/// The resolved photos destination for the current path
///
/// `exists == false` means the folder must be created lazily on first
/// upload; `id` is then the parent (visit) folder id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFolder {
    pub name: String,
    pub id: String,
    pub exists: bool,
}

/// Published navigation snapshot for the presentation layer
#[derive(Debug, Clone)]
pub struct NavView {
    pub breadcrumbs: Vec<Breadcrumb>,
    pub folders: Vec<FolderItem>,
    pub files: Vec<FileItem>,
    pub target_folder: Option<TargetFolder>,
    /// Names of folders chosen automatically during this pass, in order
    pub auto_selected: Vec<String>,
}

/// Partition a child listing into folders and files, preserving order
pub fn partition_children(children: Vec<ChildItem>) -> (Vec<FolderItem>, Vec<FileItem>) {
    let mut folders = Vec::new();
    let mut files = Vec::new();

    for child in children {
        if child.is_folder {
            folders.push(FolderItem {
                id: child.id,
                name: child.name,
                child_count: child.child_count,
            });
        } else {
            files.push(FileItem {
                id: child.id,
                name: child.name,
            });
        }
    }

    (folders, files)
}
