//
//  tfgit
//  api/git/refs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Ref (branch and tag) operations.
//!
//! Refs are created, moved and deleted through one batch endpoint: each
//! [`GitRefUpdate`] names the expected old object id and the new one.
//! Creating uses [`ZERO_OBJECT_ID`] as the old id, deleting uses it as the
//! new id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::common::{ApiError, IdentityRef};
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// The all-zero object id.
pub const ZERO_OBJECT_ID: &str = "0000000000000000000000000000000000000000";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatusContext {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// A status posted against a ref or commit by a build or other service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub context: Option<GitStatusContext>,
    #[serde(default)]
    pub created_by: Option<IdentityRef>,
}

/// A branch, tag or other ref.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    /// Full name, e.g. `refs/heads/main`.
    pub name: String,

    pub object_id: String,

    /// For annotated tags, the commit the tag points to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peeled_object_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<GitStatus>>,
}

/// One requested ref change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRefUpdate {
    pub name: String,
    pub old_object_id: String,
    pub new_object_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl GitRefUpdate {
    /// Creates `name` pointing at `object_id`.
    pub fn create(name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            old_object_id: ZERO_OBJECT_ID.to_string(),
            new_object_id: object_id.into(),
            ..Default::default()
        }
    }

    /// Deletes `name`, which must currently point at `object_id`.
    pub fn delete(name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            old_object_id: object_id.into(),
            new_object_id: ZERO_OBJECT_ID.to_string(),
            ..Default::default()
        }
    }
}

/// The outcome of one [`GitRefUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRefUpdateResult {
    pub name: String,

    #[serde(default)]
    pub old_object_id: Option<String>,

    #[serde(default)]
    pub new_object_id: Option<String>,

    #[serde(default)]
    pub success: bool,

    /// `succeeded`, `staleOldObjectId`, `forcePushRequired`, ...
    #[serde(default)]
    pub update_status: Option<String>,

    #[serde(default)]
    pub custom_message: Option<String>,

    #[serde(default)]
    pub rejected_by: Option<String>,

    #[serde(default)]
    pub is_locked: Option<bool>,

    #[serde(default)]
    pub repository_id: Option<Uuid>,
}

/// Builds the `getRefs` request.
///
/// `filter` is a ref name prefix without the leading `refs/` (`heads/`,
/// `tags/v1`); an empty filter is the same as none.
pub fn get_refs_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    filter: Option<&str>,
    include_links: Option<bool>,
    include_statuses: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_empty("filter", filter)
        .add_if_not_null("includeLinks", include_links)
        .add_if_not_null("includeStatuses", include_statuses);
    Ok(RequestSpec::for_repository(Operation::GetRefs, project, repository)?.query(query))
}

pub fn update_refs_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    updates: &[GitRefUpdate],
    project_id: Option<&str>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query.add_if_not_empty("projectId", project_id);
    RequestSpec::for_repository(Operation::UpdateRefs, project, repository)?
        .query(query)
        .body(updates)
}

impl GitClient {
    /// Lists refs, optionally restricted to a name prefix.
    pub async fn get_refs(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        filter: Option<&str>,
        include_links: Option<bool>,
        include_statuses: Option<bool>,
    ) -> Result<Vec<GitRef>, ApiError> {
        let spec = get_refs_request(project, repository, filter, include_links, include_statuses)?;
        self.send_list(spec).await
    }

    /// Creates, moves or deletes refs in one batch.
    ///
    /// The call succeeds even when individual updates are rejected; check
    /// [`GitRefUpdateResult::success`] on each result.
    pub async fn update_refs(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        updates: &[GitRefUpdate],
        project_id: Option<&str>,
    ) -> Result<Vec<GitRefUpdateResult>, ApiError> {
        let spec = update_refs_request(project, repository, updates, project_id)?;
        self.send_list(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;

    fn repo() -> RepoRef {
        RepoRef::from("widgets")
    }

    #[test]
    fn test_empty_filter_is_omitted() {
        let spec = get_refs_request(None, &repo(), Some(""), None, None).unwrap();
        assert!(!spec.query.contains_key("filter"));
        assert!(spec.query.is_empty());
    }

    #[test]
    fn test_filter_is_verbatim() {
        let spec = get_refs_request(None, &repo(), Some("heads/"), None, Some(true)).unwrap();
        assert_eq!(
            spec.query.pairs(),
            &[
                ("filter".to_string(), "heads/".to_string()),
                ("includeStatuses".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_body_is_array() {
        let updates = [GitRefUpdate::create("refs/heads/topic", "abc123")];
        let spec = update_refs_request(None, &repo(), &updates, None).unwrap();
        assert_eq!(
            spec.body,
            Some(serde_json::json!([{
                "name": "refs/heads/topic",
                "oldObjectId": ZERO_OBJECT_ID,
                "newObjectId": "abc123"
            }]))
        );
    }

    #[tokio::test]
    async fn test_update_refs_reports_rejections() {
        let body = r#"{"count":1,"value":[{"name":"refs/heads/topic","success":false,"updateStatus":"staleOldObjectId"}]}"#;
        let (client, _) = testing::client(body);
        let results = client
            .update_refs(None, &repo(), &[GitRefUpdate::delete("refs/heads/topic", "abc")], None)
            .await
            .unwrap();
        assert!(!results[0].success);
        assert_eq!(results[0].update_status.as_deref(), Some("staleOldObjectId"));
    }
}
