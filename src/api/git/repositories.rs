//
//  tfgit
//  api/git/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository operations.
//!
//! | Method | Verb | Route |
//! |--------|------|-------|
//! | [`GitClient::get_repositories`] | GET | `{project}/_apis/git/repositories` |
//! | [`GitClient::get_repository`] | GET | `{project}/_apis/git/repositories/{repositoryId}` |
//! | [`GitClient::create_repository`] | POST | `{project}/_apis/git/repositories` |
//! | [`GitClient::update_repository`] | PATCH | `{project}/_apis/git/repositories/{repositoryId}` |
//! | [`GitClient::delete_repository`] | DELETE | `{project}/_apis/git/repositories/{repositoryId}` |

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TeamProjectReference;
use crate::api::common::{ApiError, ReferenceLinks};
use crate::api::routing::{Operation, ProjectRef, QueryParams, RepoRef, RequestSpec};
use crate::api::GitClient;

/// A Git repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub id: Uuid,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<TeamProjectReference>,

    /// Full ref name of the default branch (`refs/heads/main`). Absent for
    /// an empty repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    /// Clone URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<ReferenceLinks>,
}

/// Body of [`GitClient::create_repository`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepositoryCreateOptions {
    pub name: String,

    /// Target project. Required when the request is not scoped to a
    /// project in the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<TeamProjectReference>,
}

/// Body of [`GitClient::update_repository`]; only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepositoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

pub fn get_repositories_request(
    project: Option<&ProjectRef>,
    include_links: Option<bool>,
) -> Result<RequestSpec, ApiError> {
    let mut query = QueryParams::new();
    query.add_if_not_null("includeLinks", include_links);
    Ok(RequestSpec::for_project(Operation::GetRepositories, project)?.query(query))
}

pub fn get_repository_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::GetRepository, project, repository)
}

pub fn create_repository_request(
    project: Option<&ProjectRef>,
    options: &GitRepositoryCreateOptions,
) -> Result<RequestSpec, ApiError> {
    if options.name.trim().is_empty() {
        return Err(ApiError::InvalidIdentity(
            "repository name must not be empty".to_string(),
        ));
    }
    RequestSpec::for_project(Operation::CreateRepository, project)?.body(options)
}

pub fn update_repository_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    update: &GitRepositoryUpdate,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::UpdateRepository, project, repository)?.body(update)
}

pub fn delete_repository_request(
    project: Option<&ProjectRef>,
    repository: &RepoRef,
) -> Result<RequestSpec, ApiError> {
    RequestSpec::for_repository(Operation::DeleteRepository, project, repository)
}

impl GitClient {
    /// Lists the repositories of a project, or of the whole collection when
    /// `project` is `None`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let repos = client.get_repositories(Some(&"Fabrikam".into()), None).await?;
    /// for repo in repos {
    ///     println!("{}", repo.name);
    /// }
    /// ```
    pub async fn get_repositories(
        &self,
        project: Option<&ProjectRef>,
        include_links: Option<bool>,
    ) -> Result<Vec<GitRepository>, ApiError> {
        self.send_list(get_repositories_request(project, include_links)?)
            .await
    }

    /// Gets one repository by name or id.
    pub async fn get_repository(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
    ) -> Result<GitRepository, ApiError> {
        self.send_json(get_repository_request(project, repository)?)
            .await
    }

    pub async fn create_repository(
        &self,
        project: Option<&ProjectRef>,
        options: &GitRepositoryCreateOptions,
    ) -> Result<GitRepository, ApiError> {
        self.send_json(create_repository_request(project, options)?)
            .await
    }

    /// Renames a repository or changes its default branch.
    pub async fn update_repository(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
        update: &GitRepositoryUpdate,
    ) -> Result<GitRepository, ApiError> {
        self.send_json(update_repository_request(project, repository, update)?)
            .await
    }

    /// Deletes a repository. This cannot be undone.
    pub async fn delete_repository(
        &self,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
    ) -> Result<(), ApiError> {
        self.send_empty(delete_repository_request(project, repository)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::testing;
    use crate::api::routing::HttpVerb;

    const REPOS: &str = r#"{"count": 1, "value": [{
        "id": "5febef5a-833d-4e14-b9c0-14cb638f91e6",
        "name": "AnotherRepository",
        "url": "https://fabrikam.visualstudio.com/DefaultCollection/_apis/git/repositories/5febef5a-833d-4e14-b9c0-14cb638f91e6",
        "project": {"id": "6ce954b1-ce1f-45d1-b94d-e6bf2464ba2c", "name": "Fabrikam-Fiber-Git", "state": "wellFormed"},
        "defaultBranch": "refs/heads/main",
        "remoteUrl": "https://fabrikam.visualstudio.com/DefaultCollection/_git/AnotherRepository"
    }]}"#;

    #[test]
    fn test_list_without_project_has_no_project_route_value() {
        let spec = get_repositories_request(None, None).unwrap();
        assert!(spec.route_values.is_empty());
        assert!(spec.query.is_empty());

        let spec = get_repositories_request(Some(&"Fabrikam".into()), Some(true)).unwrap();
        assert_eq!(spec.route_values.get("project"), Some("Fabrikam"));
        assert_eq!(spec.query.get("includeLinks"), Some("true"));
    }

    #[test]
    fn test_create_requires_name() {
        let options = GitRepositoryCreateOptions::default();
        assert!(matches!(
            create_repository_request(None, &options),
            Err(ApiError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_update_is_patch_with_body() {
        let update = GitRepositoryUpdate {
            name: Some("renamed".to_string()),
            default_branch: None,
        };
        let spec = update_repository_request(None, &RepoRef::from("widgets"), &update).unwrap();
        assert_eq!(spec.endpoint.verb, HttpVerb::Patch);
        assert_eq!(spec.body, Some(serde_json::json!({"name": "renamed"})));
    }

    #[tokio::test]
    async fn test_get_repositories_unwraps_list() {
        let (client, transport) = testing::client(REPOS);
        let repos = client.get_repositories(None, None).await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "AnotherRepository");
        assert_eq!(repos[0].default_branch.as_deref(), Some("refs/heads/main"));
        assert_eq!(transport.last().operation(), Operation::GetRepositories);
    }
}
