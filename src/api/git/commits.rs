//
//  tfgit
//  api/git/commits.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Commit operations.
//!
//! [`GitQueryCommitsCriteria`] is sent two ways: flattened into the query
//! string by [`GitClient::get_commits`], and as a JSON body by
//! [`GitClient::get_commits_batch`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GitItem, GitVersionDescriptor};
use crate::api::common::ApiError;
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// Author or committer line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitUserDate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// One changed path in a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChange {
    /// Comma-separated change flags: `add`, `edit`, `delete`, `rename`, ...
    #[serde(default)]
    pub change_type: Option<String>,

    #[serde(default)]
    pub item: Option<GitItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_server_item: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

/// A commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitRef {
    pub commit_id: String,

    #[serde(default)]
    pub author: Option<GitUserDate>,

    #[serde(default)]
    pub committer: Option<GitUserDate>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_truncated: Option<bool>,

    /// Counts per change kind (`Add`, `Edit`, `Delete`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_counts: Option<BTreeMap<String, u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<GitChange>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl GitCommitRef {
    /// The first line of the commit message.
    pub fn subject(&self) -> &str {
        self.comment
            .as_deref()
            .and_then(|c| c.lines().next())
            .unwrap_or("")
    }

    pub fn short_id(&self) -> &str {
        self.commit_id.get(..8).unwrap_or(&self.commit_id)
    }
}

/// Changes of one commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitChanges {
    #[serde(default)]
    pub change_counts: Option<BTreeMap<String, u32>>,

    #[serde(default)]
    pub changes: Vec<GitChange>,
}

/// Search criteria for commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitQueryCommitsCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_version: Option<GitVersionDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_version: Option<GitVersionDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_commit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_commit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_deletes: Option<bool>,
}

pub fn get_commit_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    commit_id: &str,
    change_count: Option<u32>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query.add_if_not_null("changeCount", change_count);
    Ok(RequestSpec::for_repository(Operation::GetCommit, project, repository)?
        .route("commitId", commit_id)
        .query(query))
}

pub fn get_commits_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    criteria: Option<&GitQueryCommitsCriteria>,
    skip: Option<u32>,
    top: Option<u32>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_model(criteria)?
        .add_if_not_null("$skip", skip)
        .add_if_not_null("$top", top);
    Ok(RequestSpec::for_repository(Operation::GetCommits, project, repository)?.query(query))
}

pub fn get_commits_batch_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    criteria: &GitQueryCommitsCriteria,
    skip: Option<u32>,
    top: Option<u32>,
    include_statuses: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("$skip", skip)
        .add_if_not_null("$top", top)
        .add_if_not_null("includeStatuses", include_statuses);
    RequestSpec::for_repository(Operation::GetCommitsBatch, project, repository)?
        .query(query)
        .body(criteria)
}

pub fn get_changes_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    commit_id: &str,
    top: Option<u32>,
    skip: Option<u32>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("$top", top)
        .add_if_not_null("$skip", skip);
    Ok(RequestSpec::for_repository(Operation::GetChanges, project, repository)?
        .route("commitId", commit_id)
        .query(query))
}

impl GitClient {
    /// Gets one commit, with up to `change_count` changes inlined.
    pub async fn get_commit(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        commit_id: &str,
        change_count: Option<u32>,
    ) -> Result<GitCommitRef, ApiError> {
        let spec = get_commit_request(project, repository, commit_id, change_count)?;
        self.send_json(spec).await
    }

    pub async fn get_commits(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        criteria: Option<&GitQueryCommitsCriteria>,
        skip: Option<u32>,
        top: Option<u32>,
    ) -> Result<Vec<GitCommitRef>, ApiError> {
        let spec = get_commits_request(project, repository, criteria, skip, top)?;
        self.send_list(spec).await
    }

    /// Like [`get_commits`](Self::get_commits) with the criteria in the
    /// body, which allows long id lists.
    pub async fn get_commits_batch(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        criteria: &GitQueryCommitsCriteria,
        skip: Option<u32>,
        top: Option<u32>,
        include_statuses: Option<bool>,
    ) -> Result<Vec<GitCommitRef>, ApiError> {
        let spec = get_commits_batch_request(
            project,
            repository,
            criteria,
            skip,
            top,
            include_statuses,
        )?;
        self.send_list(spec).await
    }

    pub async fn get_changes(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        commit_id: &str,
        top: Option<u32>,
        skip: Option<u32>,
    ) -> Result<GitCommitChanges, ApiError> {
        let spec = get_changes_request(project, repository, commit_id, top, skip)?;
        self.send_json(spec).await
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
    fn test_get_commits_flattens_criteria_then_paging() {
        let criteria = GitQueryCommitsCriteria {
            item_version: Some(GitVersionDescriptor::branch("main")),
            author: Some("Jamal".to_string()),
            ..Default::default()
        };
        let spec = get_commits_request(None, &repo(), Some(&criteria), None, Some(25)).unwrap();
        let keys: Vec<&str> = spec.query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys.last(), Some(&"$top"));
        assert_eq!(spec.query.get("author"), Some("Jamal"));
        assert_eq!(spec.query.get("itemVersion.version"), Some("main"));
        assert_eq!(spec.query.get("itemVersion.versionType"), Some("branch"));
        assert_eq!(spec.query.get("$top"), Some("25"));
        assert!(!spec.query.contains_key("$skip"));
    }

    #[test]
    fn test_commit_id_route_value() {
        let spec = get_commit_request(None, &repo(), "be67f8871a4d", Some(10)).unwrap();
        assert_eq!(spec.route_values.get("commitId"), Some("be67f8871a4d"));
        assert_eq!(spec.query.get("changeCount"), Some("10"));
    }

    #[test]
    fn test_batch_sends_criteria_as_body() {
        let criteria = GitQueryCommitsCriteria {
            ids: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        };
        let spec = get_commits_batch_request(None, &repo(), &criteria, None, None, None).unwrap();
        assert!(spec.query.is_empty());
        assert_eq!(spec.body, Some(serde_json::json!({"ids": ["a", "b"]})));
    }

    #[test]
    fn test_subject_and_short_id() {
        let commit = GitCommitRef {
            commit_id: "be67f8871a4d2c75f13a51c1d3c30ac0d74d4ef4".to_string(),
            comment: Some("Fix the build\n\nDetails".to_string()),
            ..Default::default()
        };
        assert_eq!(commit.subject(), "Fix the build");
        assert_eq!(commit.short_id(), "be67f887");
    }

    #[tokio::test]
    async fn test_get_changes_decodes_counts() {
        let body = r#"{"changeCounts":{"Edit":1},"changes":[{"item":{"path":"/README.md","gitObjectType":"blob"},"changeType":"edit"}]}"#;
        let (client, transport) = testing::client(body);
        let changes = client
            .get_changes(None, &repo(), "be67f887", Some(100), None)
            .await
            .unwrap();
        assert_eq!(changes.changes.len(), 1);
        assert_eq!(changes.change_counts.unwrap().get("Edit"), Some(&1));
        assert_eq!(transport.last().query.get("$top"), Some("100"));
    }
}
