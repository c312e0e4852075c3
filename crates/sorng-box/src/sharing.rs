//! Shared-link management for files and folders.
//!
//! Box has no dedicated shared-link endpoint: a link is created by PUTting
//! a `shared_link` object onto the item, and removed by PUTting
//! `"shared_link": null`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};
use crate::types::SharedLinkRequest;

/// Which collection an item id lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Folder,
}

impl ItemKind {
    /// Path segment of the collection (`files` / `folders`).
    pub fn segment(&self) -> &'static str {
        match self {
            Self::File => "files",
            Self::Folder => "folders",
        }
    }
}

#[derive(Serialize)]
struct ShareBody<'a> {
    shared_link: &'a SharedLinkRequest,
}

/// Create or update the shared link on an item; returns the updated item.
pub async fn share_item<T: DeserializeOwned>(
    client: &BoxClient,
    kind: ItemKind,
    item_id: &str,
    request: &SharedLinkRequest,
) -> BoxResult<T> {
    if item_id.is_empty() {
        return Err(BoxError::empty_id("Share"));
    }
    let url = client.api_url(&[kind.segment(), item_id])?;
    client
        .put_json(url, &ShareBody {
            shared_link: request,
        })
        .await
}

/// Remove the shared link from an item; returns the updated item.
pub async fn unshare_item<T: DeserializeOwned>(
    client: &BoxClient,
    kind: ItemKind,
    item_id: &str,
) -> BoxResult<T> {
    if item_id.is_empty() {
        return Err(BoxError::empty_id("Unshare"));
    }
    let url = client.api_url(&[kind.segment(), item_id])?;
    client.put_json(url, &json!({ "shared_link": null })).await
}
