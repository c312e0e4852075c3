//! Box file operations (get, delete, rename, move, copy, share).
//!
//! Every call needs only the file id up front; the returned [`File`] is
//! the full representation Box sends back.

use log::debug;

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};
use crate::sharing::{self, ItemKind};
use crate::types::{File, ItemUpdate, SharedLinkRequest};

fn require_id(id: &str, op: &str) -> BoxResult<()> {
    if id.is_empty() {
        return Err(BoxError::empty_id(op));
    }
    Ok(())
}

/// Get file metadata by id.
pub async fn get_file(client: &BoxClient, file_id: &str) -> BoxResult<File> {
    require_id(file_id, "Get")?;
    let url = client.api_url(&["files", file_id])?;
    client.get_json(url).await
}

/// Delete a file (moves it to the trash).
pub async fn delete_file(client: &BoxClient, file_id: &str) -> BoxResult<()> {
    require_id(file_id, "Delete")?;
    debug!("Deleting file {}", file_id);
    let url = client.api_url(&["files", file_id])?;
    client.delete(url).await
}

/// Rename a file in place.
pub async fn rename_file(client: &BoxClient, file_id: &str, new_name: &str) -> BoxResult<File> {
    require_id(file_id, "Rename")?;
    if new_name.is_empty() {
        return Err(BoxError::invalid("Empty name while using Rename"));
    }
    let url = client.api_url(&["files", file_id])?;
    client.put_json(url, &ItemUpdate::rename(new_name)).await
}

/// Move a file under another folder.
pub async fn move_file(client: &BoxClient, file_id: &str, parent_id: &str) -> BoxResult<File> {
    require_id(file_id, "Move")?;
    require_id(parent_id, "Move")?;
    let url = client.api_url(&["files", file_id])?;
    client.put_json(url, &ItemUpdate::reparent(parent_id)).await
}

/// Copy a file under `parent_id`, optionally under a new name. Returns the copy.
pub async fn copy_file(
    client: &BoxClient,
    file_id: &str,
    parent_id: &str,
    new_name: Option<&str>,
) -> BoxResult<File> {
    require_id(file_id, "Copy")?;
    require_id(parent_id, "Copy")?;
    let mut body = ItemUpdate::reparent(parent_id);
    body.name = new_name.map(String::from);
    let url = client.api_url(&["files", file_id, "copy"])?;
    client.post_json(url, &body).await
}

/// Create or update the file's shared link.
pub async fn share_file(
    client: &BoxClient,
    file_id: &str,
    request: &SharedLinkRequest,
) -> BoxResult<File> {
    sharing::share_item(client, ItemKind::File, file_id, request).await
}

/// Remove the file's shared link.
pub async fn unshare_file(client: &BoxClient, file_id: &str) -> BoxResult<File> {
    sharing::unshare_item(client, ItemKind::File, file_id).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
