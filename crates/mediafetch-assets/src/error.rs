//! Error types for the fetch pipeline.

use std::fmt;

use crate::kind::AssetKind;

/// Errors that can end a fetch request.
///
/// There is no cancellation variant: a cancelled request reports nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    Transport {
        /// The URL being fetched.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The server answered with a non-success status.
    Status {
        /// The URL being fetched.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: Option<String>,
    },

    /// The body arrived but could not be turned into the requested kind.
    Decode {
        /// The URL being fetched.
        url: String,
        /// The kind the body was decoded as.
        kind: AssetKind,
        /// Description of the failure.
        message: String,
    },
}

impl FetchError {
    /// Build a transport error.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        FetchError::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Build a decode error from a decoder failure.
    pub fn decode(url: impl Into<String>, kind: AssetKind, err: DecodeError) -> Self {
        FetchError::Decode {
            url: url.into(),
            kind,
            message: err.message,
        }
    }

    /// The URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }

    /// Returns `true` for HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, message } => {
                write!(f, "Request to '{}' failed: {}", url, message)
            }
            FetchError::Status {
                url,
                status,
                reason,
            } => match reason {
                Some(reason) => write!(f, "HTTP/1.1 {} {} ({})", status, reason, url),
                None => write!(f, "HTTP/1.1 {} ({})", status, url),
            },
            FetchError::Decode { url, kind, message } => {
                write!(f, "Failed to load {} from '{}': {}", kind, url, message)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// A decoder or importer rejected its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Create a decode error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DecodeError {}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        DecodeError::new(format!("Image decode failed: {}", err))
    }
}

impl From<gltf::Error> for DecodeError {
    fn from(err: gltf::Error) -> Self {
        DecodeError::new(format!("glTF import failed: {}", err))
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::new(format!("Invalid JSON: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for DecodeError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DecodeError::new(format!("Invalid UTF-8: {}", err))
    }
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

static_assertions::assert_impl_all!(FetchError: Send, Sync, Clone);
static_assertions::assert_impl_all!(DecodeError: Send, Sync);
