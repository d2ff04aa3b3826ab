//
//  tfgit
//  api/git/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Pull Request Operations
//!
//! Pull requests are addressed by their numeric id inside a repository, or
//! listed across a whole project with
//! [`GitClient::get_pull_requests_by_project`].
//!
//! ## Reviewer Votes
//!
//! | Vote | Meaning |
//! |------|---------|
//! | 10 | approved |
//! | 5 | approved with suggestions |
//! | 0 | no vote |
//! | -5 | waiting for author |
//! | -10 | rejected |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GitCommitRef, GitRepository};
use crate::api::common::{ApiError, IdentityRef};
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PullRequestStatus {
    NotSet,
    Active,
    Abandoned,
    Completed,
    /// Search only: matches every status.
    All,
}

impl PullRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSet => "notSet",
            Self::Active => "active",
            Self::Abandoned => "abandoned",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PullRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "notset" => Ok(Self::NotSet),
            "active" => Ok(Self::Active),
            "abandoned" => Ok(Self::Abandoned),
            "completed" => Ok(Self::Completed),
            "all" => Ok(Self::All),
            other => Err(format!("unknown pull request status '{}'", other)),
        }
    }
}

crate::impl_query_value_for_enum!(PullRequestStatus);

/// A reviewer and their vote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRefWithVote {
    #[serde(flatten)]
    pub identity: IdentityRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<i16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_url: Option<String>,
}

/// Human-readable label of a reviewer vote.
pub fn vote_label(vote: i16) -> &'static str {
    match vote {
        10 => "approved",
        5 => "approved with suggestions",
        -5 => "waiting for author",
        -10 => "rejected",
        _ => "no vote",
    }
}

/// Options applied when a pull request completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestCompletionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_source_branch: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge: Option<bool>,
}

/// A pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequest {
    pub pull_request_id: i32,

    #[serde(default)]
    pub code_review_id: Option<i32>,

    #[serde(default)]
    pub status: Option<PullRequestStatus>,

    #[serde(default)]
    pub created_by: Option<IdentityRef>,

    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub source_ref_name: Option<String>,

    #[serde(default)]
    pub target_ref_name: Option<String>,

    /// `succeeded`, `conflicts`, `queued`, ...
    #[serde(default)]
    pub merge_status: Option<String>,

    #[serde(default)]
    pub merge_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_merge_source_commit: Option<GitCommitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_merge_target_commit: Option<GitCommitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_merge_commit: Option<GitCommitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<IdentityRefWithVote>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<GitCommitRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_options: Option<GitPullRequestCompletionOptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<GitRepository>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Search criteria for pull requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestSearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PullRequestStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_links: Option<bool>,
}

/// Body of [`GitClient::create_pull_request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestCreate {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<IdentityRef>>,
}

/// Body of [`GitClient::update_pull_request`]; only present fields change.
///
/// Completing a pull request requires `last_merge_source_commit` to match
/// the current source tip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PullRequestStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_merge_source_commit: Option<GitCommitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_complete_set_by: Option<IdentityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_options: Option<GitPullRequestCompletionOptions>,
}

fn pull_request_spec(
    operation: Operation,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
) -> Result<RequestSpec, ApiError> {
    Ok(RequestSpec::for_repository(operation, project, repository)?
        .route("pullRequestId", pull_request_id))
}

fn list_query(
    criteria: Option<&GitPullRequestSearchCriteria>,
    max_comment_length: Option<i32>,
    skip: Option<u32>,
    top: Option<u32>,
) -> Result<QueryParams, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_model(criteria)?
        .add_if_not_null("maxCommentLength", max_comment_length)
        .add_if_not_null("$skip", skip)
        .add_if_not_null("$top", top);
    Ok(query)
}

pub fn get_pull_request_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    max_comment_length: Option<i32>,
    skip: Option<u32>,
    top: Option<u32>,
    include_commits: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query
        .add_if_not_null("maxCommentLength", max_comment_length)
        .add_if_not_null("$skip", skip)
        .add_if_not_null("$top", top)
        .add_if_not_null("includeCommits", include_commits);
    Ok(pull_request_spec(Operation::GetPullRequest, project, repository, pull_request_id)?
        .query(query))
}

pub fn get_pull_requests_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    criteria: Option<&GitPullRequestSearchCriteria>,
    max_comment_length: Option<i32>,
    skip: Option<u32>,
    top: Option<u32>,
) -> Result<RequestSpec, ApiError> {
    let query = list_query(criteria, max_comment_length, skip, top)?;
    Ok(RequestSpec::for_repository(Operation::GetPullRequests, project, repository)?.query(query))
}

pub fn get_pull_requests_by_project_request(
    project: &ProjectRef,
    criteria: Option<&GitPullRequestSearchCriteria>,
    max_comment_length: Option<i32>,
    skip: Option<u32>,
    top: Option<u32>,
) -> Result<RequestSpec, ApiError> {
    let query = list_query(criteria, max_comment_length, skip, top)?;
    Ok(RequestSpec::for_project(Operation::GetPullRequestsByProject, Some(project))?.query(query))
}

pub fn create_pull_request_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    create: &GitPullRequestCreate,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::CreatePullRequest, project, repository)?.body(create)
}

pub fn update_pull_request_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    update: &GitPullRequestUpdate,
) -> Result<RequestSpec, ApiError> {
    pull_request_spec(Operation::UpdatePullRequest, project, repository, pull_request_id)?
        .body(update)
}

pub fn get_pull_request_reviewer_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    reviewer_id: &str,
) -> Result<RequestSpec, ApiError> {
    Ok(pull_request_spec(
        Operation::GetPullRequestReviewer,
        project,
        repository,
        pull_request_id,
    )?
    .route("reviewerId", reviewer_id))
}

pub fn get_pull_request_reviewers_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
) -> Result<RequestSpec, ApiError> {
    pull_request_spec(
        Operation::GetPullRequestReviewers,
        project,
        repository,
        pull_request_id,
    )
}

pub fn create_pull_request_reviewer_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    reviewer_id: &str,
    reviewer: &IdentityRefWithVote,
) -> Result<RequestSpec, ApiError> {
    pull_request_spec(
        Operation::CreatePullRequestReviewer,
        project,
        repository,
        pull_request_id,
    )?
    .route("reviewerId", reviewer_id)
    .body(reviewer)
}

pub fn create_pull_request_reviewers_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    reviewers: &[IdentityRef],
) -> Result<RequestSpec, ApiError> {
    pull_request_spec(
        Operation::CreatePullRequestReviewers,
        project,
        repository,
        pull_request_id,
    )?
    .body(reviewers)
}

pub fn delete_pull_request_reviewer_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
    reviewer_id: &str,
) -> Result<RequestSpec, ApiError> {
    Ok(pull_request_spec(
        Operation::DeletePullRequestReviewer,
        project,
        repository,
        pull_request_id,
    )?
    .route("reviewerId", reviewer_id))
}

pub fn get_pull_request_commits_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    pull_request_id: i32,
) -> Result<RequestSpec, ApiError> {
    pull_request_spec(
        Operation::GetPullRequestCommits,
        project,
        repository,
        pull_request_id,
    )
}

impl GitClient {
    /// Gets one pull request.
    ///
    /// # Parameters
    ///
    /// * `max_comment_length` - Truncates commit comments in the response
    /// * `skip`, `top` - Page through the commits when `include_commits` is set
    #[allow(clippy::too_many_arguments)]
    pub async fn get_pull_request(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        max_comment_length: Option<i32>,
        skip: Option<u32>,
        top: Option<u32>,
        include_commits: Option<bool>,
    ) -> Result<GitPullRequest, ApiError> {
        let spec = get_pull_request_request(
            project,
            repository,
            pull_request_id,
            max_comment_length,
            skip,
            top,
            include_commits,
        )?;
        self.send_json(spec).await
    }

    /// Lists the pull requests of a repository matching `criteria`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let criteria = GitPullRequestSearchCriteria {
    ///     status: Some(PullRequestStatus::Active),
    ///     ..Default::default()
    /// };
    /// let prs = client
    ///     .get_pull_requests(None, &"widgets".into(), Some(&criteria), None, None, Some(50))
    ///     .await?;
    /// ```
    pub async fn get_pull_requests(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        criteria: Option<&GitPullRequestSearchCriteria>,
        max_comment_length: Option<i32>,
        skip: Option<u32>,
        top: Option<u32>,
    ) -> Result<Vec<GitPullRequest>, ApiError> {
        let spec = get_pull_requests_request(
            project,
            repository,
            criteria,
            max_comment_length,
            skip,
            top,
        )?;
        self.send_list(spec).await
    }

    /// Lists pull requests across every repository of a project.
    pub async fn get_pull_requests_by_project(
        &self,
        project: &ProjectRef,
        criteria: Option<&GitPullRequestSearchCriteria>,
        max_comment_length: Option<i32>,
        skip: Option<u32>,
        top: Option<u32>,
    ) -> Result<Vec<GitPullRequest>, ApiError> {
        let spec = get_pull_requests_by_project_request(
            project,
            criteria,
            max_comment_length,
            skip,
            top,
        )?;
        self.send_list(spec).await
    }

    pub async fn create_pull_request(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        create: &GitPullRequestCreate,
    ) -> Result<GitPullRequest, ApiError> {
        self.send_json(create_pull_request_request(project, repository, create)?)
            .await
    }

    pub async fn update_pull_request(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        update: &GitPullRequestUpdate,
    ) -> Result<GitPullRequest, ApiError> {
        let spec = update_pull_request_request(project, repository, pull_request_id, update)?;
        self.send_json(spec).await
    }

    pub async fn get_pull_request_reviewer(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        reviewer_id: &str,
    ) -> Result<IdentityRefWithVote, ApiError> {
        let spec =
            get_pull_request_reviewer_request(project, repository, pull_request_id, reviewer_id)?;
        self.send_json(spec).await
    }

    pub async fn get_pull_request_reviewers(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
    ) -> Result<Vec<IdentityRefWithVote>, ApiError> {
        let spec = get_pull_request_reviewers_request(project, repository, pull_request_id)?;
        self.send_list(spec).await
    }

    /// Adds a reviewer, or changes their vote when they already review.
    pub async fn create_pull_request_reviewer(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        reviewer_id: &str,
        reviewer: &IdentityRefWithVote,
    ) -> Result<IdentityRefWithVote, ApiError> {
        let spec = create_pull_request_reviewer_request(
            project,
            repository,
            pull_request_id,
            reviewer_id,
            reviewer,
        )?;
        self.send_json(spec).await
    }

    pub async fn create_pull_request_reviewers(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        reviewers: &[IdentityRef],
    ) -> Result<Vec<IdentityRefWithVote>, ApiError> {
        let spec =
            create_pull_request_reviewers_request(project, repository, pull_request_id, reviewers)?;
        self.send_list(spec).await
    }

    pub async fn delete_pull_request_reviewer(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
        reviewer_id: &str,
    ) -> Result<(), ApiError> {
        let spec =
            delete_pull_request_reviewer_request(project, repository, pull_request_id, reviewer_id)?;
        self.send_empty(spec).await
    }

    pub async fn get_pull_request_commits(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        pull_request_id: i32,
    ) -> Result<Vec<GitCommitRef>, ApiError> {
        let spec = get_pull_request_commits_request(project, repository, pull_request_id)?;
        self.send_list(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;
    use crate::api::routing::HttpVerb;

    fn repo() -> RepoRef {
        RepoRef::from("widgets")
    }

    #[test]
    fn test_top_only_yields_single_pair() {
        let spec = get_pull_requests_request(None, &repo(), None, None, None, Some(50)).unwrap();
        assert_eq!(spec.query.pairs(), &[("$top".to_string(), "50".to_string())]);

        let empty = GitPullRequestSearchCriteria::default();
        let spec =
            get_pull_requests_request(None, &repo(), Some(&empty), None, None, Some(50)).unwrap();
        assert_eq!(spec.query.pairs(), &[("$top".to_string(), "50".to_string())]);
    }

    #[test]
    fn test_criteria_status_uses_wire_name() {
        let criteria = GitPullRequestSearchCriteria {
            status: Some(PullRequestStatus::Completed),
            target_ref_name: Some("refs/heads/main".to_string()),
            ..Default::default()
        };
        let spec =
            get_pull_requests_request(None, &repo(), Some(&criteria), None, None, None).unwrap();
        assert_eq!(spec.query.get("status"), Some("completed"));
        assert_eq!(spec.query.get("targetRefName"), Some("refs/heads/main"));
    }

    #[test]
    fn test_by_project_route_has_no_repository() {
        let project = ProjectRef::from("Fabrikam");
        let spec = get_pull_requests_by_project_request(&project, None, None, None, None).unwrap();
        assert_eq!(spec.route_values.get("project"), Some("Fabrikam"));
        assert!(!spec.route_values.contains_key("repositoryId"));
    }

    #[test]
    fn test_reviewer_routes_and_verbs() {
        let add = create_pull_request_reviewer_request(
            None,
            &repo(),
            22,
            "d6245f20-2af8-44f4-9451-8107cb2767db",
            &IdentityRefWithVote {
                vote: Some(10),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(add.endpoint.verb, HttpVerb::Put);
        assert_eq!(add.route_values.get("pullRequestId"), Some("22"));
        assert_eq!(
            add.route_values.get("reviewerId"),
            Some("d6245f20-2af8-44f4-9451-8107cb2767db")
        );
        assert_eq!(add.body, Some(serde_json::json!({"vote": 10})));

        let list = get_pull_request_reviewers_request(None, &repo(), 22).unwrap();
        assert!(!list.route_values.contains_key("reviewerId"));
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("Active".parse::<PullRequestStatus>(), Ok(PullRequestStatus::Active));
        assert!("merged".parse::<PullRequestStatus>().is_err());
        assert_eq!(vote_label(-5), "waiting for author");
    }

    #[tokio::test]
    async fn test_get_pull_request_decodes_reviewers() {
        let body = r#"{
            "pullRequestId": 22,
            "status": "active",
            "title": "Update the readme",
            "sourceRefName": "refs/heads/topic",
            "targetRefName": "refs/heads/main",
            "reviewers": [{"id": "d6245f20-2af8-44f4-9451-8107cb2767db", "displayName": "Normal Paulk", "vote": 5}]
        }"#;
        let (client, transport) = testing::client(body);
        let pr = client
            .get_pull_request(None, &repo(), 22, None, None, None, Some(true))
            .await
            .unwrap();
        assert_eq!(pr.status, Some(PullRequestStatus::Active));
        let reviewers = pr.reviewers.unwrap();
        assert_eq!(reviewers[0].identity.label(), "Normal Paulk");
        assert_eq!(reviewers[0].vote, Some(5));
        assert_eq!(transport.last().query.get("includeCommits"), Some("true"));
    }
}
