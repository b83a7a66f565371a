//! Drive webhook client implementation
//!
//! Implements the `FolderStore` trait against the remote folder endpoint.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::storage::{ChildItem, CreatedItem, FolderStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{DriveError, Result};
use crate::types::{
    CreateFolderRequest, DeleteRequest, ItemResponse, ListEnvelope, ListRequest, RemoteItem,
    RenameRequest, ThumbnailRequest, ThumbnailResponse, UploadRequest,
};

/// Request timeout for folder metadata operations
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Request timeout for payload uploads (large base64 bodies on slow links)
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Drive webhook client
///
/// Implements [`FolderStore`] over a single JSON endpoint that accepts
/// action-tagged POST bodies, the transport used by the site-visit folder
/// service.
///
/// # Example
///
/// ```ignore
/// use provider_drive::DriveClient;
/// use bridge_traits::storage::FolderStore;
///
/// let client = DriveClient::new(http_client, endpoint_url);
/// let children = client.list_children("root").await?;
/// ```
pub struct DriveClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Webhook endpoint URL
    endpoint: String,
}

impl DriveClient {
    /// Create a new drive client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `endpoint` - Webhook endpoint URL
    pub fn new(http_client: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    /// POST a JSON body to the endpoint and require a 2xx response
    async fn post<B: Serialize>(&self, body: &B, timeout: Duration) -> Result<HttpResponse> {
        self.post_with_policy(body, timeout, RetryPolicy::default())
            .await
    }

    /// POST with an explicit transport retry policy.
    ///
    /// Uploads pass `RetryPolicy::none()`: a failed photo stays queued and
    /// is only resubmitted when the user asks for it.
    async fn post_with_policy<B: Serialize>(
        &self,
        body: &B,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, self.endpoint.clone())
            .json(body)?
            .timeout(timeout);

        let response = self.http_client.execute_with_retry(request, policy).await?;

        if response.is_success() {
            debug!(status = response.status, "Drive request succeeded");
            Ok(response)
        } else {
            warn!(status = response.status, "Drive request failed");
            Err(DriveError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            })
        }
    }

    /// Parse a response body into a typed value
    fn parse<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| DriveError::Parse(format!("Failed to parse {}: {}", what, e)))
    }

    /// Convert wire items to `ChildItem`s, skipping items without id or name
    fn convert_items(items: Vec<RemoteItem>) -> Vec<ChildItem> {
        items
            .into_iter()
            .filter_map(|item| {
                let (id, name) = match (item.id, item.name) {
                    (Some(id), Some(name)) => (id, name),
                    _ => {
                        debug!("Skipping listing item without id or name");
                        return None;
                    }
                };
                Some(match item.folder {
                    Some(facet) => ChildItem::folder(id, name, facet.child_count),
                    None => ChildItem::file(id, name),
                })
            })
            .collect()
    }
}

#[async_trait]
impl FolderStore for DriveClient {
    #[instrument(skip(self), fields(folder_id = %folder_id))]
    async fn list_children(&self, folder_id: &str) -> bridge_traits::error::Result<Vec<ChildItem>> {
        let body = ListRequest {
            action: "list",
            folder_id,
        };

        let response = self.post(&body, METADATA_TIMEOUT).await?;
        let envelope: ListEnvelope = Self::parse(&response, "listing response")?;
        let children = Self::convert_items(envelope.into_items());

        info!(count = children.len(), "Listed folder children");
        Ok(children)
    }

    #[instrument(skip(self), fields(parent_id = %parent_id, name = %name))]
    async fn create_folder(
        &self,
        parent_id: &str,
        name: &str,
    ) -> bridge_traits::error::Result<CreatedItem> {
        let body = CreateFolderRequest {
            action: "createFolder",
            parent_id,
            name,
        };

        let response = self.post(&body, METADATA_TIMEOUT).await?;
        let item: ItemResponse = Self::parse(&response, "created folder")?;

        info!(id = %item.id, "Created folder");
        Ok(CreatedItem {
            id: item.id,
            name: item.name,
        })
    }

    #[instrument(skip(self, content_base64), fields(folder_id = %folder_id, file_name = %file_name))]
    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        content_base64: &str,
    ) -> bridge_traits::error::Result<CreatedItem> {
        let body = UploadRequest {
            action: "upload",
            folder_id,
            file_name,
            content: content_base64,
        };

        let response = self
            .post_with_policy(&body, UPLOAD_TIMEOUT, RetryPolicy::none())
            .await?;
        let item: ItemResponse = Self::parse(&response, "uploaded file")?;

        info!(id = %item.id, bytes = content_base64.len(), "Uploaded file");
        Ok(CreatedItem {
            id: item.id,
            name: item.name,
        })
    }

    #[instrument(skip(self), fields(item_id = %item_id, new_name = %new_name))]
    async fn rename_item(
        &self,
        item_id: &str,
        new_name: &str,
    ) -> bridge_traits::error::Result<CreatedItem> {
        let body = RenameRequest {
            action: "rename",
            item_id,
            name: new_name,
        };

        let response = match self.post(&body, METADATA_TIMEOUT).await {
            Ok(response) => response,
            // 409 means the name is taken, a distinct user-facing condition
            Err(DriveError::Api { status: 409, .. }) => {
                return Err(DriveError::NameConflict {
                    name: new_name.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        let item: ItemResponse = Self::parse(&response, "renamed item")?;

        info!(id = %item.id, "Renamed item");
        Ok(CreatedItem {
            id: item.id,
            name: item.name,
        })
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn delete_item(&self, item_id: &str) -> bridge_traits::error::Result<()> {
        let body = DeleteRequest {
            action: "delete",
            item_id,
        };

        self.post(&body, METADATA_TIMEOUT).await?;

        info!("Deleted item");
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn fetch_thumbnail(&self, item_id: &str) -> bridge_traits::error::Result<String> {
        let body = ThumbnailRequest {
            action: "thumbnail",
            item_id,
        };

        let response = self.post(&body, METADATA_TIMEOUT).await?;
        let thumbnail: ThumbnailResponse = Self::parse(&response, "thumbnail reference")?;

        Ok(thumbnail.url)
    }
}
