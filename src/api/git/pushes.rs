//
//  tfgit
//  api/git/pushes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Push operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GitCommitRef, GitRefUpdate, GitRepository};
use crate::api::common::{ApiError, IdentityRef};
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// A push, with its commits and ref updates when requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPush {
    pub push_id: i32,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub pushed_by: Option<IdentityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<GitCommitRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_updates: Option<Vec<GitRefUpdate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<GitRepository>,
}

/// Search criteria for pushes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPushSearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pusher_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_ref_updates: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_links: Option<bool>,
}

/// New content for one path of a pushed commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    pub content: String,
    /// `rawtext` or `base64encoded`.
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitItemPath {
    pub path: String,
}

/// One path change of a pushed commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChangeRequest {
    /// `add`, `edit`, `delete` or `rename`.
    pub change_type: String,
    pub item: GitItemPath,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<ItemContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitRequest {
    pub comment: String,
    pub changes: Vec<GitChangeRequest>,
}

/// Body of [`GitClient::create_push`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPushRequest {
    pub ref_updates: Vec<GitRefUpdate>,
    pub commits: Vec<GitCommitRequest>,
}

pub fn get_push_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    push_id: i32,
    include_commits: Option<i32>,
    include_ref_updates: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("includeCommits", include_commits)
        .add_if_not_null("includeRefUpdates", include_ref_updates);
    Ok(RequestSpec::for_repository(Operation::GetPush, project, repository)?
        .route("pushId", push_id)
        .query(query))
}

pub fn get_pushes_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    skip: Option<u32>,
    top: Option<u32>,
    criteria: Option<&GitPushSearchCriteria>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("$skip", skip)
        .add_if_not_null("$top", top)
        .add_model(criteria)?;
    Ok(RequestSpec::for_repository(Operation::GetPushes, project, repository)?.query(query))
}

pub fn create_push_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    push: &GitPushRequest,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::CreatePush, project, repository)?.body(push)
}

impl GitClient {
    /// Gets one push. `include_commits` caps the number of commits returned.
    pub async fn get_push(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        push_id: i32,
        include_commits: Option<i32>,
        include_ref_updates: Option<bool>,
    ) -> Result<GitPush, ApiError> {
        let spec = get_push_request(
            project,
            repository,
            push_id,
            include_commits,
            include_ref_updates,
        )?;
        self.send_json(spec).await
    }

    pub async fn get_pushes(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        skip: Option<u32>,
        top: Option<u32>,
        criteria: Option<&GitPushSearchCriteria>,
    ) -> Result<Vec<GitPush>, ApiError> {
        let spec = get_pushes_request(project, repository, skip, top, criteria)?;
        self.send_list(spec).await
    }

    /// Pushes commits built from path changes, without a local clone.
    pub async fn create_push(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        push: &GitPushRequest,
    ) -> Result<GitPush, ApiError> {
        self.send_json(create_push_request(project, repository, push)?)
            .await
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
    fn test_paging_precedes_criteria() {
        let criteria = GitPushSearchCriteria {
            ref_name: Some("refs/heads/main".to_string()),
            ..Default::default()
        };
        let spec = get_pushes_request(None, &repo(), Some(10), None, Some(&criteria)).unwrap();
        assert_eq!(
            spec.query.pairs(),
            &[
                ("$skip".to_string(), "10".to_string()),
                ("refName".to_string(), "refs/heads/main".to_string()),
            ]
        );
    }

    #[test]
    fn test_push_id_route_value() {
        let spec = get_push_request(None, &repo(), 14, None, Some(true)).unwrap();
        assert_eq!(spec.route_values.get("pushId"), Some("14"));
        assert_eq!(spec.query.get("includeRefUpdates"), Some("true"));
        assert!(!spec.query.contains_key("includeCommits"));
    }

    #[tokio::test]
    async fn test_create_push_body() {
        let (client, transport) = testing::client(r#"{"pushId": 15}"#);
        let push = GitPushRequest {
            ref_updates: vec![GitRefUpdate {
                name: "refs/heads/main".to_string(),
                old_object_id: "abc".to_string(),
                ..Default::default()
            }],
            commits: vec![GitCommitRequest {
                comment: "Add README".to_string(),
                changes: vec![GitChangeRequest {
                    change_type: "add".to_string(),
                    item: GitItemPath {
                        path: "/README.md".to_string(),
                    },
                    new_content: Some(ItemContent {
                        content: "# widgets".to_string(),
                        content_type: "rawtext".to_string(),
                    }),
                }],
            }],
        };
        let created = client.create_push(None, &repo(), &push).await.unwrap();
        assert_eq!(created.push_id, 15);

        let body = transport.last().body.unwrap();
        assert_eq!(body["commits"][0]["changes"][0]["item"]["path"], "/README.md");
        assert_eq!(body["refUpdates"][0]["oldObjectId"], "abc");
    }
}
