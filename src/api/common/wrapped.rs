//
//  tfgit
//  api/common/wrapped.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Service Exceptions
//!
//! A failed request usually carries a JSON body describing the server-side
//! exception:
//!
//! ```json
//! {
//!   "$id": "1",
//!   "innerException": null,
//!   "message": "TF401019: The Git repository with name or identifier widgets does not exist...",
//!   "typeName": "Microsoft.TeamFoundation.Git.Server.GitRepositoryNotFoundException, ...",
//!   "typeKey": "GitRepositoryNotFoundException",
//!   "errorCode": 0,
//!   "eventId": 3000
//! }
//! ```
//!
//! The `typeKey` is looked up in an [`ErrorTranslations`] table owned by the
//! client. The table is built once when the client is built and never
//! changes afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ApiError, ErrorKind};

/// The JSON body of a failed request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedException {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub type_key: Option<String>,

    #[serde(default)]
    pub type_name: Option<String>,

    #[serde(default)]
    pub error_code: Option<i32>,

    #[serde(default)]
    pub event_id: Option<i32>,

    #[serde(default)]
    pub inner_exception: Option<Box<WrappedException>>,
}

impl WrappedException {
    /// Translates this exception into an [`ApiError`] when its type key is
    /// known to `translations`.
    pub fn translate(&self, translations: &ErrorTranslations, status: u16) -> Option<ApiError> {
        let key = self.type_key.as_deref()?;
        let kind = translations.lookup(key)?;
        let message = self
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| key.to_string());
        Some(ApiError::from_kind(kind, message, status))
    }
}

/// Maps service exception type keys to error categories.
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslations {
    entries: HashMap<String, ErrorKind>,
}

impl ErrorTranslations {
    /// An empty table; every failure is classified by status code.
    pub fn new() -> Self {
        Self::default()
    }

    /// The type keys raised by the Git service.
    pub fn git_defaults() -> Self {
        let mut table = Self::new();
        for key in [
            "GitRepositoryNotFoundException",
            "GitItemNotFoundException",
            "GitObjectNotFoundException",
            "GitCommitDoesNotExistException",
            "GitPullRequestNotFoundException",
            "GitUnresolvableToCommitException",
            "ProjectDoesNotExistWithNameException",
            "ProjectDoesNotExistException",
            "IdentityNotFoundException",
        ] {
            table = table.with(key, ErrorKind::NotFound);
        }
        for key in [
            "GitRepositoryNameAlreadyExistsException",
            "GitPullRequestExistsException",
            "GitReferenceStaleException",
        ] {
            table = table.with(key, ErrorKind::Conflict);
        }
        table
            .with("UnauthorizedRequestException", ErrorKind::Unauthorized)
            .with("GitNeedsPermissionException", ErrorKind::Forbidden)
            .with("AccessCheckException", ErrorKind::Forbidden)
            .with("InvalidArgumentValueException", ErrorKind::BadRequest)
            .with("ArgumentNullException", ErrorKind::BadRequest)
            .with("ArgumentException", ErrorKind::BadRequest)
            .with("RequestBlockedException", ErrorKind::RateLimited)
    }

    /// Adds or replaces one entry.
    pub fn with(mut self, type_key: impl Into<String>, kind: ErrorKind) -> Self {
        self.entries.insert(type_key.into(), kind);
        self
    }

    pub fn lookup(&self, type_key: &str) -> Option<ErrorKind> {
        self.entries.get(type_key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exception(type_key: &str, message: &str) -> WrappedException {
        WrappedException {
            message: Some(message.to_string()),
            type_key: Some(type_key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_known_key_translates() {
        let translations = ErrorTranslations::git_defaults();
        let err = exception("GitRepositoryNotFoundException", "TF401019: missing")
            .translate(&translations, 404)
            .unwrap();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "TF401019: missing"));
    }

    #[test]
    fn test_unknown_key_is_left_to_status() {
        let translations = ErrorTranslations::git_defaults();
        assert!(exception("SomethingElseException", "x")
            .translate(&translations, 500)
            .is_none());
        assert!(WrappedException::default()
            .translate(&translations, 500)
            .is_none());
    }

    #[test]
    fn test_tables_are_independent() {
        let custom = ErrorTranslations::new().with("GitRepositoryNotFoundException", ErrorKind::Forbidden);
        let defaults = ErrorTranslations::git_defaults();
        assert_eq!(
            custom.lookup("GitRepositoryNotFoundException"),
            Some(ErrorKind::Forbidden)
        );
        assert_eq!(
            defaults.lookup("GitRepositoryNotFoundException"),
            Some(ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_deserialize_service_body() {
        let json = r#"{"$id":"1","innerException":null,"message":"TF401019","typeName":"X, Y","typeKey":"GitRepositoryNotFoundException","errorCode":0,"eventId":3000}"#;
        let wrapped: WrappedException = serde_json::from_str(json).unwrap();
        assert_eq!(wrapped.type_key.as_deref(), Some("GitRepositoryNotFoundException"));
        assert_eq!(wrapped.event_id, Some(3000));
        assert!(wrapped.inner_exception.is_none());
    }
}
