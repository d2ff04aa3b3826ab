//
//  tfgit
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! Shared types used by every Git resource module: the library error type,
//! the list envelope, the wrapped service exception and its per-client
//! translation table, and small reference types that appear in many models.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ErrorKind`] - Category of an [`ApiError`], used for translation and exit codes
//! - [`ListResponse`] - The `{count, value}` envelope of collection endpoints
//! - [`WrappedException`] / [`ErrorTranslations`] - Service error bodies
//! - [`IdentityRef`] - Lightweight user reference
//! - [`ReferenceLinks`] - `_links` map attached to most resources
//!
//! # Example
//!
//! ```rust,ignore
//! use tfgit::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Unauthorized(_)) => println!("Please authenticate first"),
//!         Err(ApiError::NotFound(resource)) => println!("Not found: {}", resource),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod pagination;
mod wrapped;

pub use pagination::*;
pub use wrapped::*;

/// Unified error type for all Git API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `InvalidIdentity` | Empty name or nil id, raised before any request | N/A |
/// | `Unauthorized` | Missing, invalid or expired credentials | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `Conflict` | Resource already exists or was modified | 409 |
/// | `RateLimited` | Too many requests | 429 |
/// | `BadRequest` | Invalid request parameters | 400 |
/// | `ProxyAuthRequired` | The HTTP proxy rejected the request | 407 |
/// | `Server` | Internal server error | 5xx |
/// | `UnknownLocation` | The server does not expose the resource | N/A |
/// | `Network` | Connectivity issues | N/A |
/// | `Decode` | Body could not be (de)serialized | N/A |
/// | `Unknown` | Anything else | other |
#[derive(Error, Debug)]
pub enum ApiError {
    /// An identity component can never address a resource.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Authentication failed or was not provided.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The requested resource was not found.
    ///
    /// # Parameters
    ///
    /// - `0` - Description of the resource that was not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource already exists, or was changed by someone else.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// API rate limit has been exceeded.
    ///
    /// `retry_after` carries the `Retry-After` header in seconds when the
    /// service sent one. The client never retries on its own.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Proxy authentication required")]
    ProxyAuthRequired,

    /// An internal server error occurred.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server has no location for the id, or retired the resource
    /// below the requested API version.
    #[error("Unknown resource location {location_id}: {reason}")]
    UnknownLocation { location_id: Uuid, reason: String },

    #[error("Invalid API version: {0}")]
    InvalidApiVersion(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// An unknown or unexpected error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Category of an [`ApiError`].
///
/// The translation table maps service exception type keys to a kind, and
/// the binary maps kinds to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentity,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    BadRequest,
    ProxyAuthRequired,
    Server,
    UnknownLocation,
    Network,
    Decode,
    Unknown,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentity(_) => ErrorKind::InvalidIdentity,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::BadRequest(_) | Self::InvalidApiVersion(_) | Self::Url(_) => {
                ErrorKind::BadRequest
            }
            Self::ProxyAuthRequired => ErrorKind::ProxyAuthRequired,
            Self::Server { .. } => ErrorKind::Server,
            Self::UnknownLocation { .. } => ErrorKind::UnknownLocation,
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Builds an error of `kind` carrying `message`.
    ///
    /// Kinds that wrap foreign errors (`Network`, `Decode`) have no message
    /// form and become [`ApiError::Unknown`].
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::InvalidIdentity => Self::InvalidIdentity(message),
            ErrorKind::Unauthorized => Self::Unauthorized(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::RateLimited => Self::RateLimited {
                message,
                retry_after: None,
            },
            ErrorKind::BadRequest => Self::BadRequest(message),
            ErrorKind::ProxyAuthRequired => Self::ProxyAuthRequired,
            ErrorKind::Server => Self::Server { status, message },
            ErrorKind::UnknownLocation => Self::UnknownLocation {
                location_id: Uuid::nil(),
                reason: message,
            },
            ErrorKind::Network | ErrorKind::Decode | ErrorKind::Unknown => Self::Unknown(message),
        }
    }
}

/// Lightweight user reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Account name, `DOMAIN\user` on premises or an email in the cloud.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl IdentityRef {
    /// Returns the best human-readable name available.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.unique_name.as_deref())
            .unwrap_or("-")
    }
}

/// A single hyperlink in a `_links` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// The `_links` map attached to most resources, keyed by relation name
/// (`self`, `web`, `repository`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLinks {
    #[serde(flatten)]
    pub links: BTreeMap<String, Link>,
}

impl ReferenceLinks {
    pub fn get(&self, relation: &str) -> Option<&str> {
        self.links.get(relation).map(|link| link.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_from_kind() {
        for kind in [
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::RateLimited,
            ErrorKind::BadRequest,
            ErrorKind::Server,
        ] {
            assert_eq!(ApiError::from_kind(kind, "boom", 500).kind(), kind);
        }
        assert_eq!(
            ApiError::from_kind(ErrorKind::Network, "boom", 0).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_reference_links_deserialize() {
        let json = r#"{"self": {"href": "https://x/_apis/git/repositories/1"}, "web": {"href": "https://x/_git/r"}}"#;
        let links: ReferenceLinks = serde_json::from_str(json).unwrap();
        assert_eq!(links.get("web"), Some("https://x/_git/r"));
        assert_eq!(links.get("missing"), None);
    }

    #[test]
    fn test_identity_label_prefers_display_name() {
        let identity = IdentityRef {
            display_name: Some("Jamal Hartnett".to_string()),
            unique_name: Some("fabrikamfiber4@hotmail.com".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.label(), "Jamal Hartnett");
        assert_eq!(IdentityRef::default().label(), "-");
    }
}
