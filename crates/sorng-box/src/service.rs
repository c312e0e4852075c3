//! Central service façade for Box operations.
//!
//! Owns one [`BoxClient`] and exposes the auth flow and every file,
//! folder, upload and download operation as methods, so a connection can
//! be shared across tasks as `Arc<Mutex<BoxService>>`.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};
use tokio::sync::Mutex;

use crate::auth;
use crate::client::BoxClient;
use crate::downloads;
use crate::error::BoxResult;
use crate::files;
use crate::folders;
use crate::types::*;
use crate::uploads;

/// Thread-safe service handle.
pub type BoxServiceState = Arc<Mutex<BoxService>>;

/// A Box connection: client plus its token.
#[derive(Debug)]
pub struct BoxService {
    client: BoxClient,
}

impl BoxService {
    pub fn new(config: BoxConfig) -> BoxResult<Self> {
        Ok(Self {
            client: BoxClient::new(config)?,
        })
    }

    /// Service against the public Box endpoints.
    pub fn with_access_token(access_token: &str) -> BoxResult<Self> {
        let mut service = Self::new(BoxConfig::default())?;
        service.set_access_token(access_token);
        Ok(service)
    }

    /// Wrap in `Arc<Mutex<_>>`.
    pub fn into_state(self) -> BoxServiceState {
        Arc::new(Mutex::new(self))
    }

    pub fn client(&self) -> &BoxClient {
        &self.client
    }

    // ── Configuration ────────────────────────────────────────────

    /// Current credentials with the secret masked.
    pub fn credentials_summary(&self) -> OAuthCredentials {
        let creds = &self.client.config().credentials;
        OAuthCredentials {
            client_id: creds.client_id.clone(),
            client_secret: if creds.client_secret.is_empty() {
                String::new()
            } else {
                "***".into()
            },
            redirect_uri: creds.redirect_uri.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    pub fn connection_summary(&self) -> BoxConnectionSummary {
        BoxConnectionSummary {
            name: self.client.config().name.clone(),
            authenticated: self.is_authenticated(),
            api_url: self.client.config().api_url.clone(),
            token_expires_at: self.client.token().and_then(|t| t.expires_at),
        }
    }

    // ── Auth ─────────────────────────────────────────────────────

    pub fn build_auth_url(&self, state: Option<&str>) -> BoxResult<String> {
        auth::build_auth_url(self.client.config(), state)
    }

    /// Exchange an authorization code and keep the resulting token.
    pub async fn exchange_code(&mut self, code: &str) -> BoxResult<()> {
        let token = auth::exchange_code(&self.client, code).await?;
        self.client.set_token(token);
        Ok(())
    }

    /// Prompt on `output`, read the code from `input` and keep the token.
    pub async fn authorize_interactive<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> BoxResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        auth::authorize_interactive(&mut self.client, input, output).await
    }

    pub fn set_token(&mut self, token: OAuthToken) {
        self.client.set_token(token);
    }

    pub fn set_access_token(&mut self, access_token: &str) {
        self.client.set_access_token(access_token);
    }

    /// Current token (for persistence by the caller).
    pub fn get_token(&self) -> Option<OAuthToken> {
        self.client.token().cloned()
    }

    pub fn logout(&mut self) {
        self.client.clear_token();
    }

    // ── Files ────────────────────────────────────────────────────

    pub async fn get_file(&self, file_id: &str) -> BoxResult<File> {
        files::get_file(&self.client, file_id).await
    }

    pub async fn delete_file(&self, file_id: &str) -> BoxResult<()> {
        files::delete_file(&self.client, file_id).await
    }

    pub async fn rename_file(&self, file_id: &str, new_name: &str) -> BoxResult<File> {
        files::rename_file(&self.client, file_id, new_name).await
    }

    pub async fn move_file(&self, file_id: &str, parent_id: &str) -> BoxResult<File> {
        files::move_file(&self.client, file_id, parent_id).await
    }

    pub async fn copy_file(
        &self,
        file_id: &str,
        parent_id: &str,
        new_name: Option<&str>,
    ) -> BoxResult<File> {
        files::copy_file(&self.client, file_id, parent_id, new_name).await
    }

    pub async fn share_file(&self, file_id: &str, request: &SharedLinkRequest) -> BoxResult<File> {
        files::share_file(&self.client, file_id, request).await
    }

    pub async fn unshare_file(&self, file_id: &str) -> BoxResult<File> {
        files::unshare_file(&self.client, file_id).await
    }

    // ── Folders ──────────────────────────────────────────────────

    pub async fn get_folder(&self, folder_id: &str) -> BoxResult<Folder> {
        folders::get_folder(&self.client, folder_id).await
    }

    pub async fn list_items(&self, folder: &mut Folder) -> BoxResult<Vec<Entity>> {
        folders::list_items(&self.client, folder).await
    }

    pub async fn create_folder(&self, parent_id: &str, name: &str) -> BoxResult<Folder> {
        folders::create_folder(&self.client, parent_id, name).await
    }

    pub async fn delete_folder(&self, folder_id: &str) -> BoxResult<()> {
        folders::delete_folder(&self.client, folder_id).await
    }

    pub async fn rename_folder(&self, folder_id: &str, new_name: &str) -> BoxResult<Folder> {
        folders::rename_folder(&self.client, folder_id, new_name).await
    }

    pub async fn move_folder(&self, folder_id: &str, parent_id: &str) -> BoxResult<Folder> {
        folders::move_folder(&self.client, folder_id, parent_id).await
    }

    pub async fn copy_folder(
        &self,
        folder_id: &str,
        parent_id: &str,
        new_name: Option<&str>,
    ) -> BoxResult<Folder> {
        folders::copy_folder(&self.client, folder_id, parent_id, new_name).await
    }

    pub async fn share_folder(
        &self,
        folder_id: &str,
        request: &SharedLinkRequest,
    ) -> BoxResult<Folder> {
        folders::share_folder(&self.client, folder_id, request).await
    }

    pub async fn unshare_folder(&self, folder_id: &str) -> BoxResult<Folder> {
        folders::unshare_folder(&self.client, folder_id).await
    }

    // ── Transfers ────────────────────────────────────────────────

    pub async fn upload_bytes(&self, parent_id: &str, name: &str, data: Vec<u8>) -> BoxResult<File> {
        uploads::upload_bytes(&self.client, parent_id, name, data).await
    }

    pub async fn upload_reader<R>(
        &self,
        parent_id: &str,
        name: &str,
        reader: &mut R,
    ) -> BoxResult<File>
    where
        R: AsyncRead + Unpin,
    {
        uploads::upload_reader(&self.client, parent_id, name, reader).await
    }

    pub async fn upload_path(
        &self,
        parent_id: &str,
        path: impl AsRef<Path>,
        name: Option<&str>,
    ) -> BoxResult<File> {
        uploads::upload_path(&self.client, parent_id, path, name).await
    }

    pub async fn download_bytes(&self, file_id: &str) -> BoxResult<Vec<u8>> {
        downloads::download_bytes(&self.client, file_id).await
    }

    pub async fn download_to_writer<W>(&self, file_id: &str, writer: &mut W) -> BoxResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        downloads::download_to_writer(&self.client, file_id, writer).await
    }

    pub async fn download_to_path(
        &self,
        file_id: &str,
        destination: impl AsRef<Path>,
    ) -> BoxResult<u64> {
        downloads::download_to_path(&self.client, file_id, destination).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_service_not_authenticated() {
        let svc = BoxService::new(BoxConfig::default()).unwrap();
        assert!(!svc.is_authenticated());
        assert!(svc.get_token().is_none());
        let summary = svc.connection_summary();
        assert_eq!(summary.name, "default");
        assert!(!summary.authenticated);
        assert!(summary.token_expires_at.is_none());
    }

    #[test]
    fn access_token_and_logout() {
        let mut svc = BoxService::with_access_token("abc").unwrap();
        assert!(svc.is_authenticated());
        assert_eq!(svc.get_token().unwrap().access_token, "abc");
        svc.logout();
        assert!(!svc.is_authenticated());
    }

    #[test]
    fn credentials_summary_masks_secret() {
        let cfg = BoxConfig::default().with_credentials(OAuthCredentials {
            client_id: "id".into(),
            client_secret: "very-secret".into(),
            redirect_uri: None,
        });
        let svc = BoxService::new(cfg).unwrap();
        let summary = svc.credentials_summary();
        assert_eq!(summary.client_id, "id");
        assert_eq!(summary.client_secret, "***");
    }

    #[test]
    fn auth_url_via_service() {
        let cfg = BoxConfig::default().with_credentials(OAuthCredentials {
            client_id: "id".into(),
            ..Default::default()
        });
        let svc = BoxService::new(cfg).unwrap();
        let url = svc.build_auth_url(Some("s1")).unwrap();
        assert!(url.contains("client_id=id"));
        assert!(url.contains("state=s1"));
    }

    #[tokio::test]
    async fn shared_state() {
        let state = BoxService::with_access_token("abc").unwrap().into_state();
        let cloned = Arc::clone(&state);
        cloned.lock().await.logout();
        assert!(!state.lock().await.is_authenticated());
    }
}
