//! # SortOfRemote NG – Box Integration
//!
//! Box API v2.0 client for cloud file management.
//!
//! ## Features
//!
//! - **OAuth2 Authentication** – authorization URL, code exchange,
//!   interactive prompt, or a pre-issued access token
//! - **Files** – get, delete, rename, move, copy
//! - **Folders** – get, list items, create, delete (recursive), rename,
//!   move, copy
//! - **Shared links** – share / unshare files and folders
//! - **Uploads** – multipart upload from bytes, readers, or local paths
//! - **Downloads** – into memory, any async writer, or a local path
//!
//! Every operation sends one request. Non-2xx responses map to
//! [`error::BoxErrorKind`] through a fixed status table and are returned
//! as-is.

pub mod error;
pub mod types;
pub mod client;
pub mod auth;
pub mod sharing;
pub mod files;
pub mod folders;
pub mod uploads;
pub mod downloads;
pub mod service;

pub use client::BoxClient;
pub use error::{BoxError, BoxErrorKind, BoxResult};
pub use service::{BoxService, BoxServiceState};
pub use types::{
    BoxConfig, BoxLock, Collection, Entity, File, Folder, OAuthCredentials, OAuthToken,
    Permission, SharedLinkAccess, SharedLinkRequest, SharedObject, UploadEmail,
};
