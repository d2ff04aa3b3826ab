//
//  tfgit
//  api/git/blobs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Blob operations, addressed by object id.
//!
//! All four operations share one location; the response type selects
//! between metadata, raw content and a zip archive.

use serde::{Deserialize, Serialize};

use crate::api::common::ApiError;
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitBlobRef {
    pub object_id: String,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Builds a single-blob request; `operation` is `GetBlob`, `GetBlobContent`
/// or `GetBlobZip`.
pub fn get_blob_request(
    operation: Operation,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    sha1: &str,
    download: Option<bool>,
    file_name: Option<&str>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("download", download)
        .add_if_not_empty("fileName", file_name);
    Ok(RequestSpec::for_repository(operation, project, repository)?
        .route("sha1", sha1)
        .query(query))
}

pub fn get_blobs_zip_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    blob_ids: &[String],
    filename: Option<&str>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query.add_if_not_empty("filename", filename);
    RequestSpec::for_repository(Operation::GetBlobsZip, project, repository)?
        .query(query)
        .body(blob_ids)
}

impl GitClient {
    pub async fn get_blob(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        sha1: &str,
        download: Option<bool>,
        file_name: Option<&str>,
    ) -> Result<GitBlobRef, ApiError> {
        let spec = get_blob_request(
            Operation::GetBlob,
            project,
            repository,
            sha1,
            download,
            file_name,
        )?;
        self.send_json(spec).await
    }

    /// Downloads a blob's raw bytes.
    pub async fn get_blob_content(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        sha1: &str,
        download: Option<bool>,
        file_name: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_blob_request(
            Operation::GetBlobContent,
            project,
            repository,
            sha1,
            download,
            file_name,
        )?;
        self.send_bytes(spec).await
    }

    pub async fn get_blob_zip(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        sha1: &str,
        download: Option<bool>,
        file_name: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_blob_request(
            Operation::GetBlobZip,
            project,
            repository,
            sha1,
            download,
            file_name,
        )?;
        self.send_bytes(spec).await
    }

    /// Downloads several blobs as one zip archive, named by object id.
    pub async fn get_blobs_zip(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        blob_ids: &[String],
        filename: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let spec = get_blobs_zip_request(project, repository, blob_ids, filename)?;
        self.send_bytes(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;
    use crate::api::routing::{HttpVerb, MediaType};

    fn repo() -> RepoRef {
        RepoRef::from("widgets")
    }

    #[test]
    fn test_blob_query() {
        let spec =
            get_blob_request(Operation::GetBlobContent, None, &repo(), "abc", Some(true), None)
                .unwrap();
        assert_eq!(spec.route_values.get("sha1"), Some("abc"));
        assert_eq!(spec.query.pairs(), &[("download".to_string(), "true".to_string())]);
        assert_eq!(spec.endpoint.response_media, MediaType::OctetStream);
    }

    #[test]
    fn test_blobs_zip_posts_ids() {
        let ids = vec!["abc".to_string(), "def".to_string()];
        let spec = get_blobs_zip_request(None, &repo(), &ids, Some("blobs.zip")).unwrap();
        assert_eq!(spec.endpoint.verb, HttpVerb::Post);
        assert!(!spec.route_values.contains_key("sha1"));
        assert_eq!(spec.query.get("filename"), Some("blobs.zip"));
        assert_eq!(spec.body, Some(serde_json::json!(["abc", "def"])));
    }

    #[tokio::test]
    async fn test_blob_content_returns_raw_bytes() {
        let (client, _) = testing::client("\u{1}\u{2}binary");
        let bytes = client
            .get_blob_content(None, &repo(), "abc", None, None)
            .await
            .unwrap();
        assert_eq!(bytes, b"\x01\x02binary");
    }
}
