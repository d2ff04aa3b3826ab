//
//  tfgit
//  api/git/items.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Item Operations
//!
//! An item is a file or folder at a path, as of some version. The same
//! endpoint answers in four representations picked by the `Accept` type:
//!
//! | Method | Response |
//! |--------|----------|
//! | [`GitClient::get_item`] | JSON metadata |
//! | [`GitClient::get_item_content`] | raw bytes |
//! | [`GitClient::get_item_text`] | text |
//! | [`GitClient::get_item_zip`] | zip archive of a folder |
//!
//! The optional arguments shared by all of them live in [`ItemOptions`].

use serde::{Deserialize, Serialize};

use super::{GitCommitRef, GitVersionDescriptor, VersionControlRecursionType};
use crate::api::common::ApiError;
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// Metadata about a file's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentMetadata {
    #[serde(default)]
    pub encoding: Option<i32>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub is_binary: Option<bool>,
    #[serde(default)]
    pub is_image: Option<bool>,
}

/// A file or folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitItem {
    #[serde(default)]
    pub object_id: Option<String>,

    /// `blob`, `tree`, `commit` or `tag`.
    #[serde(default)]
    pub git_object_type: Option<String>,

    #[serde(default)]
    pub commit_id: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub is_folder: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_metadata: Option<FileContentMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_processed_change: Option<GitCommitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl GitItem {
    pub fn is_folder(&self) -> bool {
        self.is_folder.unwrap_or(false) || self.git_object_type.as_deref() == Some("tree")
    }
}

/// Optional arguments of the item operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemOptions {
    /// Path of the item. Ignored by [`GitClient::get_items`].
    pub path: Option<String>,
    /// Restricts a listing to a sub tree.
    pub scope_path: Option<String>,
    pub recursion_level: Option<VersionControlRecursionType>,
    pub include_content_metadata: Option<bool>,
    pub latest_processed_change: Option<bool>,
    /// Asks the server to answer with `Content-Disposition: attachment`.
    pub download: Option<bool>,
    pub version: Option<GitVersionDescriptor>,
}

impl ItemOptions {
    /// Options addressing `path` at the default branch.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn at(mut self, version: GitVersionDescriptor) -> Self {
        self.version = Some(version);
        self
    }

    pub fn recursion(mut self, level: VersionControlRecursionType) -> Self {
        self.recursion_level = Some(level);
        self
    }
}

/// One entry of an items batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitItemDescriptor {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursion_level: Option<VersionControlRecursionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_type: Option<super::GitVersionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_options: Option<super::GitVersionOptions>,
}

/// Body of [`GitClient::get_items_batch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitItemRequestData {
    pub item_descriptors: Vec<GitItemDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_content_metadata: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_processed_change: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_links: Option<bool>,
}

fn item_query(
    options: &ItemOptions,
    include_path: bool,
    include_links: Option<bool>,
) -> Result<QueryParams, ApiError> {
    let mut query = QueryParams::new();
    if include_path {
        query.add_if_not_empty("path", options.path.as_deref());
    }
    query
        .add_if_not_empty("scopePath", options.scope_path.as_deref())
        .add_if_not_null("recursionLevel", options.recursion_level)
        .add_if_not_null("includeContentMetadata", options.include_content_metadata)
        .add_if_not_null("latestProcessedChange", options.latest_processed_change)
        .add_if_not_null("download", options.download)
        .add_if_not_null("includeLinks", include_links)
        .add_model(options.version.as_ref())?;
    Ok(query)
}

/// Builds a request for one item in the representation `operation` selects.
///
/// `operation` must be one of `GetItem`, `GetItemContent`, `GetItemText` or
/// `GetItemZip`.
pub fn get_item_request(
    operation: Operation,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    options: &ItemOptions,
) -> Result<RequestSpec, ApiError> {
    debug_assert!(matches!(
        operation,
        Operation::GetItem | Operation::GetItemContent | Operation::GetItemText | Operation::GetItemZip
    ));
    let query = item_query(options, true, None)?;
    Ok(RequestSpec::for_repository(operation, project, repository)?.query(query))
}

pub fn get_items_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    options: &ItemOptions,
    include_links: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let query = item_query(options, false, include_links)?;
    Ok(RequestSpec::for_repository(Operation::GetItems, project, repository)?.query(query))
}

pub fn get_items_batch_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    request: &GitItemRequestData,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::GetItemsBatch, project, repository)?.body(request)
}

impl GitClient {
    /// Gets item metadata.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let options = ItemOptions::path("/src/main.rs").at(GitVersionDescriptor::branch("main"));
    /// let item = client.get_item(None, &"widgets".into(), &options).await?;
    /// ```
    pub async fn get_item(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        options: &ItemOptions,
    ) -> Result<GitItem, ApiError> {
        let spec = get_item_request(Operation::GetItem, project, repository, options)?;
        self.send_json(spec).await
    }

    /// Downloads a file's raw bytes.
    pub async fn get_item_content(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        options: &ItemOptions,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_item_request(Operation::GetItemContent, project, repository, options)?;
        self.send_bytes(spec).await
    }

    pub async fn get_item_text(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        options: &ItemOptions,
    ) -> Result<String, ApiError> {
        let spec = get_item_request(Operation::GetItemText, project, repository, options)?;
        self.send_text(spec).await
    }

    /// Downloads a folder as a zip archive.
    pub async fn get_item_zip(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        options: &ItemOptions,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_item_request(Operation::GetItemZip, project, repository, options)?;
        self.send_bytes(spec).await
    }

    /// Lists items below `options.scope_path`.
    pub async fn get_items(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        options: &ItemOptions,
        include_links: Option<bool>,
    ) -> Result<Vec<GitItem>, ApiError> {
        let spec = get_items_request(project, repository, options, include_links)?;
        self.send_list(spec).await
    }

    /// Fetches several item listings in one call. The result has one list
    /// per descriptor, in order.
    pub async fn get_items_batch(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        request: &GitItemRequestData,
    ) -> Result<Vec<Vec<GitItem>>, ApiError> {
        let spec = get_items_batch_request(project, repository, request)?;
        self.send_list(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;
    use crate::api::routing::MediaType;

    fn repo() -> RepoRef {
        RepoRef::from("widgets")
    }

    #[test]
    fn test_item_query_order_and_omission() {
        let options = ItemOptions {
            path: Some("/README.md".to_string()),
            scope_path: Some(String::new()),
            include_content_metadata: Some(true),
            version: Some(GitVersionDescriptor::tag("v1.0")),
            ..Default::default()
        };
        let spec = get_item_request(Operation::GetItem, None, &repo(), &options).unwrap();
        let keys: Vec<&str> = spec.query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys[..2], ["path", "includeContentMetadata"]);
        assert_eq!(spec.query.get("version"), Some("v1.0"));
        assert_eq!(spec.query.get("versionType"), Some("tag"));
        assert!(!spec.query.contains_key("scopePath"));
        assert!(!spec.query.contains_key("download"));
    }

    #[test]
    fn test_representations_share_route_but_not_media() {
        let options = ItemOptions::path("/src");
        let json = get_item_request(Operation::GetItem, None, &repo(), &options).unwrap();
        let zip = get_item_request(Operation::GetItemZip, None, &repo(), &options).unwrap();
        assert_eq!(json.route_values, zip.route_values);
        assert_eq!(json.query, zip.query);
        assert_eq!(zip.endpoint.response_media, MediaType::Zip);
        assert_eq!(
            json.endpoint.location_id,
            zip.endpoint.location_id
        );
    }

    #[test]
    fn test_get_items_ignores_path_and_adds_links() {
        let options = ItemOptions {
            path: Some("/ignored".to_string()),
            scope_path: Some("/src".to_string()),
            ..Default::default()
        }
        .recursion(VersionControlRecursionType::OneLevel);
        let spec = get_items_request(None, &repo(), &options, Some(false)).unwrap();
        assert!(!spec.query.contains_key("path"));
        assert_eq!(spec.query.get("recursionLevel"), Some("oneLevel"));
        assert_eq!(spec.query.get("includeLinks"), Some("false"));
    }

    #[tokio::test]
    async fn test_items_batch_decodes_nested_lists() {
        let body = r#"{"count":2,"value":[[{"path":"/a","isFolder":true}],[{"path":"/b/c.txt"}]]}"#;
        let (client, transport) = testing::client(body);
        let request = GitItemRequestData {
            item_descriptors: vec![
                GitItemDescriptor {
                    path: "/a".to_string(),
                    ..Default::default()
                },
                GitItemDescriptor {
                    path: "/b/c.txt".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let lists = client.get_items_batch(None, &repo(), &request).await.unwrap();
        assert_eq!(lists.len(), 2);
        assert!(lists[0][0].is_folder());
        assert_eq!(transport.last().endpoint.api_version, "2.0-preview.1");
    }

    #[tokio::test]
    async fn test_item_text() {
        let (client, _) = testing::client("hello\n");
        let text = client
            .get_item_text(None, &repo(), &ItemOptions::path("/hello.txt"))
            .await
            .unwrap();
        assert_eq!(text, "hello\n");
    }
}
