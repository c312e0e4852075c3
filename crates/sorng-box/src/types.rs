//! Core types for the Box integration.
//!
//! Resource structs mirror the Box API v2.0 JSON shapes one-to-one
//! (snake_case keys). Every field is optional and absent fields are
//! omitted when serializing, so a sparsely-filled struct doubles as a
//! request body for update calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, BoxResult};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Endpoints
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Base URL for Box API v2.0 metadata endpoints.
pub const API_BASE: &str = "https://api.box.com/2.0";
/// Base URL for Box API v2.0 upload endpoints.
pub const UPLOAD_BASE: &str = "https://upload.box.com/api/2.0";
/// Box OAuth2 authorization endpoint.
pub const AUTH_URL: &str = "https://app.box.com/api/oauth2/authorize";
/// Box OAuth2 token endpoint.
pub const TOKEN_URL: &str = "https://app.box.com/api/oauth2/token";

/// Id of the account's root folder ("All Files").
pub const ROOT_FOLDER_ID: &str = "0";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OAuth2
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// OAuth2 application credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCredentials {
    /// Client ID from the Box developer console.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Redirect URI registered for the app. Box falls back to the app's
    /// configured URI when this is absent.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// OAuth2 token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthToken {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, kept for callers; this crate never refreshes.
    pub refresh_token: Option<String>,
    /// Token type (always "Bearer" for Box).
    pub token_type: String,
    /// Expiry time.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for OAuthToken {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_at: None,
        }
    }
}

impl OAuthToken {
    /// Token with just an access token (no expiry information).
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => Utc::now() >= exp,
            None => false,
        }
    }
}

/// Raw JSON response from Box's token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Shared building blocks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Minimal reference to a file, folder, web link or user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// A unique ID for use with the /events endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Identifies the version of this entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// `file`, `folder`, `web_link`, `user`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl Entity {
    /// Reference carrying only an id, as used for `parent` in request bodies.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.item_type.as_deref() == Some("folder")
    }

    pub fn is_file(&self) -> bool {
        self.item_type.as_deref() == Some("file")
    }
}

/// Permissions the current user has on an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "can_download", default, skip_serializing_if = "Option::is_none")]
    pub download: Option<bool>,
    #[serde(rename = "can_preview", default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
    #[serde(rename = "can_upload", default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<bool>,
    #[serde(rename = "can_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<bool>,
    #[serde(rename = "can_rename", default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<bool>,
    #[serde(rename = "can_delete", default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
    #[serde(rename = "can_share", default, skip_serializing_if = "Option::is_none")]
    pub share: Option<bool>,
    #[serde(
        rename = "can_set_share_access",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub set_share_access: Option<bool>,
}

/// A list of mini entities (path collections, folder contents).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "total_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(rename = "entries", default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Lock held on a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxLock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "is_download_prevented",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_prevented: Option<bool>,
}

/// Shared link attached to a file or folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vanity_url: Option<String>,
    #[serde(
        rename = "is_password_enabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub has_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unshared_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_count: Option<u64>,
    /// `open`, `company` or `collaborators`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(rename = "permissions", default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

/// Upload-by-email address of a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadEmail {
    /// `open` or `collaborators`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Files
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Box file resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Folders from the root down to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_collection: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_link: Option<SharedObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Entity>,
    /// `active`, `trashed` or `deleted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<BoxLock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl File {
    /// Mini reference to this file.
    pub fn as_entity(&self) -> Entity {
        Entity {
            sequence_id: self.sequence_id.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            etag: self.etag.clone(),
            item_type: Some("file".into()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Folders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Box folder resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Total size of the folder contents in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_collection: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<Entity>,
    /// Null when the folder has no shared link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_link: Option<SharedObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_collaborations: Option<bool>,
    /// Whether Box Sync clients sync this folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<String>,
    /// Mini files and folders directly inside this folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_collection: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_upload_email: Option<UploadEmail>,
}

impl Folder {
    /// Folder value carrying only an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Entries of the item collection, if it has been fetched.
    pub fn items(&self) -> Option<&[Entity]> {
        self.item_collection.as_ref().map(|c| c.entries.as_slice())
    }

    pub fn as_entity(&self) -> Entity {
        Entity {
            sequence_id: self.sequence_id.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            etag: self.etag.clone(),
            item_type: Some("folder".into()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Request bodies
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Body for rename / move / copy / create calls on files and folders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Entity>,
}

impl ItemUpdate {
    pub fn rename(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            parent: None,
        }
    }

    pub fn reparent(parent_id: &str) -> Self {
        Self {
            name: None,
            parent: Some(Entity::with_id(parent_id)),
        }
    }

    pub fn named_in(name: &str, parent_id: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            parent: Some(Entity::with_id(parent_id)),
        }
    }
}

/// Who can open a shared link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedLinkAccess {
    /// Anyone with the link.
    Open,
    /// Anyone in the owner's enterprise.
    Company,
    /// Only collaborators on the item.
    Collaborators,
}

impl std::fmt::Display for SharedLinkAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Company => write!(f, "company"),
            Self::Collaborators => write!(f, "collaborators"),
        }
    }
}

/// Permission switches on a shared link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLinkPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_download: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_preview: Option<bool>,
}

/// Settings for creating or updating a shared link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLinkRequest {
    /// Box applies the enterprise default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<SharedLinkAccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unshared_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<SharedLinkPermissions>,
}

impl SharedLinkRequest {
    pub fn with_access(access: SharedLinkAccess) -> Self {
        Self {
            access: Some(access),
            ..Default::default()
        }
    }
}

/// `attributes` part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UploadAttributes {
    pub name: String,
    pub parent: Entity,
}

/// Upload responses wrap the new file in a collection.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub entries: Vec<File>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxConfig {
    /// Display name for this connection.
    pub name: String,
    /// OAuth2 app credentials.
    pub credentials: OAuthCredentials,
    pub api_url: String,
    pub upload_url: String,
    pub auth_url: String,
    pub token_url: String,
    /// Request timeout (seconds).
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            credentials: OAuthCredentials::default(),
            api_url: API_BASE.to_string(),
            upload_url: UPLOAD_BASE.to_string(),
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            timeout_seconds: 30,
            user_agent: concat!("sorng-box/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BoxConfig {
    pub fn with_credentials(mut self, credentials: OAuthCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Check that every endpoint parses and the timeout is non-zero.
    pub fn validate(&self) -> BoxResult<()> {
        for (label, value) in [
            ("api_url", &self.api_url),
            ("upload_url", &self.upload_url),
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
        ] {
            if value.trim().is_empty() {
                return Err(BoxError::invalid(format!("{label} is empty")));
            }
            url::Url::parse(value)
                .map_err(|e| BoxError::invalid(format!("{label} is not a valid URL: {e}")))?;
        }
        if self.timeout_seconds == 0 {
            return Err(BoxError::invalid("timeout_seconds must be greater than zero"));
        }
        Ok(())
    }
}

/// Non-sensitive view of a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxConnectionSummary {
    pub name: String,
    pub authenticated: bool,
    pub api_url: String,
    pub token_expires_at: Option<DateTime<Utc>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
