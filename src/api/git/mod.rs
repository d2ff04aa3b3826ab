//
//  tfgit
//  api/git/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Resources
//!
//! One module per resource family. Each module holds the serde models, a
//! pure `*_request` builder per operation that returns a [`RequestSpec`],
//! and the matching async method on [`GitClient`].
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`repositories`] | list, get, create, update, delete |
//! | [`refs`] | list, update |
//! | [`commits`] | get, list, batch, changes |
//! | [`pushes`] | get, list, create |
//! | [`pullrequests`] | get, list, create, update, reviewers, commits |
//! | [`items`] | item metadata, content, text, zip, listing, batch |
//! | [`trees`] | tree metadata and zip |
//! | [`blobs`] | blob metadata, content, zip, multi-blob zip |
//!
//! Builders are public so callers can inspect exactly what would be sent.
//!
//! [`RequestSpec`]: crate::api::routing::RequestSpec
//! [`GitClient`]: crate::api::GitClient

pub mod blobs;
pub mod commits;
pub mod items;
pub mod pullrequests;
pub mod pushes;
pub mod refs;
pub mod repositories;
pub mod trees;

pub use blobs::*;
pub use commits::*;
pub use items::*;
pub use pullrequests::*;
pub use pushes::*;
pub use refs::*;
pub use repositories::*;
pub use trees::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::routing::ProjectRef;

/// How [`GitVersionDescriptor::version`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GitVersionType {
    Branch,
    Tag,
    Commit,
}

impl GitVersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Tag => "tag",
            Self::Commit => "commit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GitVersionOptions {
    None,
    PreviousChange,
    FirstParent,
}

/// Selects a version of the repository: a branch, a tag or a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitVersionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_type: Option<GitVersionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_options: Option<GitVersionOptions>,
}

impl GitVersionDescriptor {
    pub fn branch(name: impl Into<String>) -> Self {
        Self::of(GitVersionType::Branch, name)
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::of(GitVersionType::Tag, name)
    }

    pub fn commit(id: impl Into<String>) -> Self {
        Self::of(GitVersionType::Commit, id)
    }

    fn of(version_type: GitVersionType, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            version_type: Some(version_type),
            version_options: None,
        }
    }
}

/// How deep an item listing descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionControlRecursionType {
    None,
    OneLevel,
    OneLevelPlusNestedEmptyFolders,
    Full,
}

impl VersionControlRecursionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneLevel => "oneLevel",
            Self::OneLevelPlusNestedEmptyFolders => "oneLevelPlusNestedEmptyFolders",
            Self::Full => "full",
        }
    }
}

crate::impl_query_value_for_enum!(GitVersionType, VersionControlRecursionType);

/// Minimal reference to a team project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl From<&ProjectRef> for TeamProjectReference {
    fn from(project: &ProjectRef) -> Self {
        match project {
            ProjectRef::Id(id) => Self {
                id: Some(*id),
                ..Default::default()
            },
            ProjectRef::Name(name) => Self {
                name: Some(name.clone()),
                ..Default::default()
            },
        }
    }
}

/// Removes the `refs/heads/` prefix from a branch ref name.
pub fn short_ref_name(name: &str) -> &str {
    name.strip_prefix("refs/heads/")
        .or_else(|| name.strip_prefix("refs/tags/"))
        .unwrap_or(name)
}

/// Expands a branch name to its full ref name.
pub fn full_branch_ref(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("refs/heads/{}", name)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A transport that records requests and answers with a canned body.

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::api::common::ApiError;
    use crate::api::routing::RequestSpec;
    use crate::api::transport::{Transport, TransportResponse};
    use crate::api::GitClient;

    pub struct RecordingTransport {
        pub requests: Mutex<Vec<RequestSpec>>,
        body: Vec<u8>,
    }

    impl RecordingTransport {
        pub fn last(&self) -> RequestSpec {
            self.requests
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no request recorded")
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: &RequestSpec) -> Result<TransportResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(TransportResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: self.body.clone(),
            })
        }

        async fn check_connection(&self) -> Result<bool, ApiError> {
            Ok(true)
        }
    }

    /// A client whose every call answers with `body`.
    pub fn client(body: &str) -> (GitClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            requests: Mutex::new(Vec::new()),
            body: body.as_bytes().to_vec(),
        });
        (GitClient::new(transport.clone()), transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routing::QueryParams;

    #[test]
    fn test_version_descriptor_flattens_to_query() {
        let mut query = QueryParams::new();
        query
            .add_model(Some(&GitVersionDescriptor::branch("main")))
            .unwrap();
        assert_eq!(query.get("version"), Some("main"));
        assert_eq!(query.get("versionType"), Some("branch"));
        assert!(!query.contains_key("versionOptions"));
    }

    #[test]
    fn test_ref_name_helpers() {
        assert_eq!(short_ref_name("refs/heads/feature/x"), "feature/x");
        assert_eq!(short_ref_name("refs/tags/v1"), "v1");
        assert_eq!(full_branch_ref("main"), "refs/heads/main");
        assert_eq!(full_branch_ref("refs/heads/main"), "refs/heads/main");
    }
}
