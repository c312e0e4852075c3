//! Box folder operations.
//!
//! Same shape as the file operations plus `create_folder` and
//! `list_items`. Deleting a folder always deletes its contents too.

use log::debug;

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};
use crate::sharing::{self, ItemKind};
use crate::types::{Entity, Folder, ItemUpdate, SharedLinkRequest};

fn require_id(id: &str, op: &str) -> BoxResult<()> {
    if id.is_empty() {
        return Err(BoxError::empty_id(op));
    }
    Ok(())
}

/// Get folder metadata (including the first page of its items).
pub async fn get_folder(client: &BoxClient, folder_id: &str) -> BoxResult<Folder> {
    require_id(folder_id, "Get")?;
    let url = client.api_url(&["folders", folder_id])?;
    client.get_json(url).await
}

/// Items directly under `folder`. Fetches the folder first when its item
/// collection has not been populated yet, and stores the result in it.
pub async fn list_items(client: &BoxClient, folder: &mut Folder) -> BoxResult<Vec<Entity>> {
    if folder.item_collection.is_none() {
        let id = folder.id.clone().unwrap_or_default();
        *folder = get_folder(client, &id).await?;
    }
    Ok(folder.items().map(<[Entity]>::to_vec).unwrap_or_default())
}

/// Create a sub-folder named `name` under `parent_id`.
pub async fn create_folder(client: &BoxClient, parent_id: &str, name: &str) -> BoxResult<Folder> {
    require_id(parent_id, "Create")?;
    if name.is_empty() {
        return Err(BoxError::invalid("Empty name while using Create"));
    }
    debug!("Creating folder '{}' under {}", name, parent_id);
    let url = client.api_url(&["folders"])?;
    client.post_json(url, &ItemUpdate::named_in(name, parent_id)).await
}

/// Delete a folder and everything in it.
pub async fn delete_folder(client: &BoxClient, folder_id: &str) -> BoxResult<()> {
    require_id(folder_id, "Delete")?;
    debug!("Deleting folder {} recursively", folder_id);
    let url = client.api_url(&["folders", folder_id])?;
    client.delete_with_query(url, &[("recursive", "true")]).await
}

/// Rename a folder in place.
pub async fn rename_folder(client: &BoxClient, folder_id: &str, new_name: &str) -> BoxResult<Folder> {
    require_id(folder_id, "Rename")?;
    if new_name.is_empty() {
        return Err(BoxError::invalid("Empty name while using Rename"));
    }
    let url = client.api_url(&["folders", folder_id])?;
    client.put_json(url, &ItemUpdate::rename(new_name)).await
}

/// Move a folder under another folder.
pub async fn move_folder(client: &BoxClient, folder_id: &str, parent_id: &str) -> BoxResult<Folder> {
    require_id(folder_id, "Move")?;
    require_id(parent_id, "Move")?;
    let url = client.api_url(&["folders", folder_id])?;
    client.put_json(url, &ItemUpdate::reparent(parent_id)).await
}

/// Copy a folder under `parent_id`, optionally under a new name. Returns the copy.
pub async fn copy_folder(
    client: &BoxClient,
    folder_id: &str,
    parent_id: &str,
    new_name: Option<&str>,
) -> BoxResult<Folder> {
    require_id(folder_id, "Copy")?;
    require_id(parent_id, "Copy")?;
    let mut body = ItemUpdate::reparent(parent_id);
    body.name = new_name.map(String::from);
    let url = client.api_url(&["folders", folder_id, "copy"])?;
    client.post_json(url, &body).await
}

/// Create or update the folder's shared link.
pub async fn share_folder(
    client: &BoxClient,
    folder_id: &str,
    request: &SharedLinkRequest,
) -> BoxResult<Folder> {
    sharing::share_item(client, ItemKind::Folder, folder_id, request).await
}

/// Remove the folder's shared link.
pub async fn unshare_folder(client: &BoxClient, folder_id: &str) -> BoxResult<Folder> {
    sharing::unshare_item(client, ItemKind::Folder, folder_id).await
}
