//! Error types for the Box integration.
//!
//! All public API surfaces in this crate return `BoxResult<T>`. HTTP
//! failures are mapped through a fixed status table; anything the table
//! does not know becomes `BoxErrorKind::Unknown(status)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convenience alias.
pub type BoxResult<T> = Result<T, BoxError>;

/// Error kinds for Box operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxErrorKind {
    /// HTTP 302.
    Redirect,
    /// HTTP 304.
    NotModified,
    /// HTTP 401, authorization failed.
    Unauthorized,
    /// HTTP 403, not enough permission for the operation.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 405, method not allowed.
    NotAllowed,
    /// HTTP 409, an item with the same name already exists.
    Conflict,
    /// HTTP 412, an `If-Match` precondition failed.
    PreconditionFailed,
    /// HTTP 429.
    TooManyRequests,
    /// HTTP 500.
    ServerError,
    /// HTTP 503.
    Unavailable,
    /// Any status code outside the table.
    Unknown(u16),
    /// A required argument (usually an id) was empty or malformed.
    InvalidParameter,
    /// No access token has been set on the client.
    NotAuthenticated,
    /// The access token is past its expiry time.
    TokenExpired,
    /// Connectivity / transport failure.
    Network,
    /// JSON (de)serialization failure.
    Serialization,
    /// Local filesystem or stream failure.
    Io,
    /// The API answered 2xx but with a body we cannot use.
    UnexpectedResponse,
}

impl BoxErrorKind {
    /// Map an HTTP status code to its fixed error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            302 => Self::Redirect,
            304 => Self::NotModified,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::NotAllowed,
            409 => Self::Conflict,
            412 => Self::PreconditionFailed,
            429 => Self::TooManyRequests,
            500 => Self::ServerError,
            503 => Self::Unavailable,
            other => Self::Unknown(other),
        }
    }

    /// The HTTP status this kind stands for, if it is an HTTP kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Redirect => Some(302),
            Self::NotModified => Some(304),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::NotAllowed => Some(405),
            Self::Conflict => Some(409),
            Self::PreconditionFailed => Some(412),
            Self::TooManyRequests => Some(429),
            Self::ServerError => Some(500),
            Self::Unavailable => Some(503),
            Self::Unknown(code) => Some(*code),
            _ => None,
        }
    }

    /// Canonical message text for this kind.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Redirect => "Redirect",
            Self::NotModified => "Not Modified",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::NotAllowed => "Not allowed",
            Self::Conflict => "Conflict",
            Self::PreconditionFailed => "Precondition failed",
            Self::TooManyRequests => "Too many requests",
            Self::ServerError => "Internal server error",
            Self::Unavailable => "Unavailable",
            Self::Unknown(_) => "Unknown error",
            Self::InvalidParameter => "Invalid parameter",
            Self::NotAuthenticated => "Not authenticated",
            Self::TokenExpired => "Token expired",
            Self::Network => "Network error",
            Self::Serialization => "Serialization error",
            Self::Io => "I/O error",
            Self::UnexpectedResponse => "Unexpected response",
        }
    }
}

impl fmt::Display for BoxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "HTTP {}", code),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Structured error returned by every public function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxError {
    pub kind: BoxErrorKind,
    pub message: String,
    /// HTTP status, when the error came from a response.
    pub status: Option<u16>,
    /// Box's machine-readable error code (`not_found`, `item_name_in_use`, ...).
    pub box_code: Option<String>,
    pub request_id: Option<String>,
}

impl fmt::Display for BoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {} : {}", self.kind, status, self.message)?,
            None => write!(f, "[{}] {}", self.kind, self.message)?,
        }
        if let Some(ref code) = self.box_code {
            write!(f, " (box: {})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for BoxError {}

impl BoxError {
    pub fn new(kind: BoxErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.status(),
            box_code: None,
            request_id: None,
        }
    }

    /// Bare status error with the table's canonical message.
    pub fn from_status(status: u16) -> Self {
        let kind = BoxErrorKind::from_status(status);
        Self {
            kind,
            message: kind.default_message().to_string(),
            status: Some(status),
            box_code: None,
            request_id: None,
        }
    }

    /// Build an error from a non-2xx response, reading Box's error envelope
    /// `{"type":"error","status":404,"code":"not_found","message":"...","request_id":"..."}`
    /// when the body carries one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut err = Self::from_status(status);
        let (code, message, request_id) = Self::parse_error_body(body);
        if let Some(msg) = message {
            err.message = msg;
        }
        err.box_code = code;
        err.request_id = request_id;
        err
    }

    fn parse_error_body(body: &str) -> (Option<String>, Option<String>, Option<String>) {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(body) else {
            return (None, None, None);
        };
        let code = v["code"].as_str().map(String::from);
        let msg = v["message"]
            .as_str()
            .filter(|m| !m.is_empty())
            .map(String::from);
        let req_id = v["request_id"].as_str().map(String::from);
        (code, msg, req_id)
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(BoxErrorKind::InvalidParameter, msg)
    }

    /// "Empty id while using <op>".
    pub fn empty_id(op: &str) -> Self {
        Self::invalid(format!("Empty id while using {}", op))
    }

    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(BoxErrorKind::NotAuthenticated, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(BoxErrorKind::Network, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(BoxErrorKind::Io, msg)
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::new(BoxErrorKind::UnexpectedResponse, msg)
    }

    /// Whether this error came from the given HTTP status.
    pub fn is_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }
}

impl From<reqwest::Error> for BoxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::new(BoxErrorKind::Serialization, format!("Decode error: {}", err))
        } else {
            Self::network(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for BoxError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(BoxErrorKind::Serialization, format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for BoxError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid(format!("URL parse error: {}", err))
    }
}

impl From<std::io::Error> for BoxError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
