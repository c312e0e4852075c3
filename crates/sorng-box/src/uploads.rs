//! File uploads to Box.
//!
//! Box takes uploads on a separate host as `multipart/form-data`: an
//! `attributes` JSON part (name + parent folder) that must precede the
//! `file` part. Content is buffered in memory before sending.

use std::path::Path;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};
use crate::types::{Entity, File, UploadAttributes, UploadResponse};

const DEFAULT_MIME: &str = "application/octet-stream";

/// Upload in-memory content as a new file named `name` under `parent_id`.
pub async fn upload_bytes(
    client: &BoxClient,
    parent_id: &str,
    name: &str,
    data: Vec<u8>,
) -> BoxResult<File> {
    if name.is_empty() {
        return Err(BoxError::invalid("Empty name while using Upload"));
    }
    if parent_id.is_empty() {
        return Err(BoxError::invalid("Empty parent id while using Upload"));
    }

    let size = data.len();
    debug!("Uploading '{}' ({} bytes) into folder {}", name, size, parent_id);
    let form = build_form(name, parent_id, data)?;
    let url = client.upload_url(&["files", "content"])?;
    let resp: UploadResponse = client.post_multipart(url, form).await?;
    let file = single_entry(resp)?;

    info!(
        "Uploaded '{}' ({} bytes) as file {}",
        name,
        size,
        file.id.as_deref().unwrap_or("?")
    );
    Ok(file)
}

/// Read `reader` to the end and upload it as `name` under `parent_id`.
pub async fn upload_reader<R>(
    client: &BoxClient,
    parent_id: &str,
    name: &str,
    reader: &mut R,
) -> BoxResult<File>
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    upload_bytes(client, parent_id, name, data).await
}

/// Upload a local file. The Box name defaults to the file's base name.
pub async fn upload_path(
    client: &BoxClient,
    parent_id: &str,
    path: impl AsRef<Path>,
    name: Option<&str>,
) -> BoxResult<File> {
    let path = path.as_ref();
    let name = match name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => base_name(path)?,
    };
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| BoxError::io(format!("Cannot read '{}': {}", path.display(), e)))?;
    upload_bytes(client, parent_id, &name, data).await
}

fn base_name(path: &Path) -> BoxResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| {
            BoxError::invalid(format!("Cannot derive a file name from '{}'", path.display()))
        })
}

fn build_form(name: &str, parent_id: &str, data: Vec<u8>) -> BoxResult<Form> {
    let attributes = serde_json::to_string(&UploadAttributes {
        name: name.to_string(),
        parent: Entity::with_id(parent_id),
    })?;
    let mime = mime_guess::from_path(name).first_raw().unwrap_or(DEFAULT_MIME);
    let part = Part::bytes(data)
        .file_name(name.to_string())
        .mime_str(mime)
        .map_err(|e| BoxError::invalid(format!("Invalid MIME type: {e}")))?;

    Ok(Form::new().text("attributes", attributes).part("file", part))
}

/// Box wraps the new file in `{"total_count":1,"entries":[...]}`.
fn single_entry(resp: UploadResponse) -> BoxResult<File> {
    let count = resp.entries.len();
    let mut entries = resp.entries.into_iter();
    match (entries.next(), count) {
        (Some(file), 1) => Ok(file),
        _ => Err(BoxError::unexpected(format!(
            "Upload response carried {} entries, expected exactly one",
            count
        ))),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
