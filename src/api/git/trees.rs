//
//  tfgit
//  api/git/trees.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tree operations, addressed by object id.

use serde::{Deserialize, Serialize};

use crate::api::common::ApiError;
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitTreeEntryRef {
    pub object_id: String,

    pub relative_path: String,

    /// Octal file mode as text (`100644`, `040000`).
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub git_object_type: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A tree and its entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitTreeRef {
    pub object_id: String,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub tree_entries: Vec<GitTreeEntryRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Builds a tree request; `operation` is `GetTree` or `GetTreeZip`.
pub fn get_tree_request(
    operation: Operation,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    sha1: &str,
    project_id: Option<&str>,
    recursive: Option<bool>,
    file_name: Option<&str>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_empty("projectId", project_id)
        .add_if_not_null("recursive", recursive)
        .add_if_not_empty("fileName", file_name);
    Ok(RequestSpec::for_repository(operation, project, repository)?
        .route("sha1", sha1)
        .query(query))
}

impl GitClient {
    /// Gets a tree. With `recursive`, entries of every sub tree are included.
    pub async fn get_tree(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        sha1: &str,
        project_id: Option<&str>,
        recursive: Option<bool>,
        file_name: Option<&str>,
    ) -> Result<GitTreeRef, ApiError> {
        let spec = get_tree_request(
            Operation::GetTree,
            project,
            repository,
            sha1,
            project_id,
            recursive,
            file_name,
        )?;
        self.send_json(spec).await
    }

    /// Downloads a tree as a zip archive.
    pub async fn get_tree_zip(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        sha1: &str,
        project_id: Option<&str>,
        recursive: Option<bool>,
        file_name: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_tree_request(
            Operation::GetTreeZip,
            project,
            repository,
            sha1,
            project_id,
            recursive,
            file_name,
        )?;
        self.send_bytes(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;

    #[test]
    fn test_tree_query() {
        let spec = get_tree_request(
            Operation::GetTreeZip,
            None,
            &RepoRef::from("widgets"),
            "729a3cd8",
            Some(""),
            Some(true),
            Some("src.zip"),
        )
        .unwrap();
        assert_eq!(spec.route_values.get("sha1"), Some("729a3cd8"));
        assert_eq!(
            spec.query.pairs(),
            &[
                ("recursive".to_string(), "true".to_string()),
                ("fileName".to_string(), "src.zip".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_tree_decodes_entries() {
        let body = r#"{"objectId":"729a3cd8","size":120,"treeEntries":[
            {"objectId":"aaa","relativePath":"src","mode":"40000","gitObjectType":"tree"},
            {"objectId":"bbb","relativePath":"README.md","mode":"100644","gitObjectType":"blob","size":42}
        ]}"#;
        let (client, _) = testing::client(body);
        let tree = client
            .get_tree(None, &RepoRef::from("widgets"), "729a3cd8", None, None, None)
            .await
            .unwrap();
        assert_eq!(tree.tree_entries.len(), 2);
        assert_eq!(tree.tree_entries[1].size, Some(42));
    }
}
