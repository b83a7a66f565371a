//! Drive webhook wire types
//!
//! Data structures for the JSON bodies exchanged with the remote folder
//! endpoint. The endpoint accepts action-tagged POST bodies and answers
//! either with a raw item array or an envelope of the form `{"value": [...]}`.

use serde::{Deserialize, Serialize};

/// Folder facet carried by folder items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of children inside the folder
    #[serde(default)]
    pub child_count: u32,
}

/// An item as returned by a listing
///
/// Items carrying a `folder` facet are folders; all others are files.
/// `id` and `name` are optional on the wire; items missing either are
/// skipped during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Present when the item is a folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
}

/// Listing response, in either of the two shapes the endpoint produces
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    /// Raw array of items
    Items(Vec<RemoteItem>),
    /// OneDrive-style envelope
    Wrapped { value: Vec<RemoteItem> },
}

impl ListEnvelope {
    /// Unwrap to the item list regardless of envelope shape
    pub fn into_items(self) -> Vec<RemoteItem> {
        match self {
            ListEnvelope::Items(items) => items,
            ListEnvelope::Wrapped { value } => value,
        }
    }
}

/// Identity of an item returned by create/upload/rename
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
}

/// Thumbnail reference response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailResponse {
    pub url: String,
}

/// List-children request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest<'a> {
    pub action: &'static str,
    pub folder_id: &'a str,
}

/// Create-folder request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest<'a> {
    pub action: &'static str,
    pub parent_id: &'a str,
    pub name: &'a str,
}

/// Upload request body; `content` is the base64-encoded payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest<'a> {
    pub action: &'static str,
    pub folder_id: &'a str,
    pub file_name: &'a str,
    pub content: &'a str,
}

/// Rename request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest<'a> {
    pub action: &'static str,
    pub item_id: &'a str,
    pub name: &'a str,
}

/// Delete request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest<'a> {
    pub action: &'static str,
    pub item_id: &'a str,
}

/// Thumbnail request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest<'a> {
    pub action: &'static str,
    pub item_id: &'a str,
}
