//! File content downloads.
//!
//! `GET files/{id}/content` answers with a redirect to Box's content host;
//! reqwest follows it and the body arrives from there.

use std::path::Path;

use log::{debug, info};
use reqwest::Response;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};

fn require_id(file_id: &str) -> BoxResult<()> {
    if file_id.is_empty() {
        return Err(BoxError::empty_id("Download"));
    }
    Ok(())
}

/// Download a file's content into memory.
pub async fn download_bytes(client: &BoxClient, file_id: &str) -> BoxResult<Vec<u8>> {
    let resp = open_content(client, file_id).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Stream a file's content into `writer`. Returns the byte count.
pub async fn download_to_writer<W>(
    client: &BoxClient,
    file_id: &str,
    writer: &mut W,
) -> BoxResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let resp = open_content(client, file_id).await?;
    copy_body(resp, writer).await
}

/// Download a file to `destination`, creating or overwriting it.
///
/// The destination is only touched once Box has answered with a success
/// status, so a failed request leaves an existing file as it was.
pub async fn download_to_path(
    client: &BoxClient,
    file_id: &str,
    destination: impl AsRef<Path>,
) -> BoxResult<u64> {
    let resp = open_content(client, file_id).await?;
    let destination = destination.as_ref();
    let mut file = tokio::fs::File::create(destination).await.map_err(|e| {
        BoxError::io(format!(
            "Cannot create file '{}': {}",
            destination.display(),
            e
        ))
    })?;

    let size = copy_body(resp, &mut file).await?;
    info!("Downloaded {} bytes to {}", size, destination.display());
    Ok(size)
}

async fn open_content(client: &BoxClient, file_id: &str) -> BoxResult<Response> {
    require_id(file_id)?;
    debug!("Downloading file {}", file_id);
    let url = client.api_url(&["files", file_id, "content"])?;
    client.get_response(url).await
}

async fn copy_body<W>(mut resp: Response, writer: &mut W) -> BoxResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = resp.chunk().await? {
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}
