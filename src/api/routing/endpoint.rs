//
//  tfgit
//  api/routing/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Descriptor Table
//!
//! Every logical operation of the Git REST surface maps to exactly one
//! immutable [`EndpointDescriptor`]: the resource's stable location id, the
//! HTTP verb, the API version, the media types, and the default route
//! template used when location discovery is off.
//!
//! Several operations share a location id when they read the same resource
//! with a different `Accept` type (for example `GetBlob`, `GetBlobContent`
//! and `GetBlobZip`).
//!
//! ## Route Templates
//!
//! Templates use `{name}` placeholders. `{area}` and `{resource}` default to
//! the descriptor's area and resource name; every other placeholder comes
//! from the request's route values and is dropped when absent.
//!
//! ```text
//! {project}/_apis/{area}/repositories/{repositoryId}/{resource}/{pushId}
//! ```

use std::fmt;

use uuid::Uuid;

/// HTTP verbs used by the Git REST surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Verbs that may be tunnelled through `POST` with an
    /// `X-HTTP-Method-Override` header.
    pub fn is_overridable(&self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Delete)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media types negotiated with the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Json,
    OctetStream,
    Zip,
    PlainText,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Zip => "application/zip",
            Self::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every logical operation exposed by [`crate::api::GitClient`].
///
/// The discriminant indexes [`ENDPOINTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetRepositories,
    GetRepository,
    CreateRepository,
    UpdateRepository,
    DeleteRepository,
    GetRefs,
    UpdateRefs,
    GetCommit,
    GetCommits,
    GetCommitsBatch,
    GetChanges,
    GetPush,
    GetPushes,
    CreatePush,
    GetPullRequest,
    GetPullRequests,
    CreatePullRequest,
    UpdatePullRequest,
    GetPullRequestsByProject,
    GetPullRequestReviewer,
    GetPullRequestReviewers,
    CreatePullRequestReviewer,
    CreatePullRequestReviewers,
    DeletePullRequestReviewer,
    GetPullRequestCommits,
    GetItem,
    GetItemContent,
    GetItemText,
    GetItemZip,
    GetItems,
    GetItemsBatch,
    GetTree,
    GetTreeZip,
    GetBlob,
    GetBlobContent,
    GetBlobZip,
    GetBlobsZip,
}

impl Operation {
    /// Returns this operation's descriptor.
    pub fn descriptor(self) -> &'static EndpointDescriptor {
        &ENDPOINTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable description of one REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub operation: Operation,
    /// Operation name used in logs (`getPullRequests`).
    pub name: &'static str,
    pub location_id: Uuid,
    pub area: &'static str,
    pub resource: &'static str,
    pub verb: HttpVerb,
    pub api_version: &'static str,
    /// Content type of the request body, when the operation sends one.
    pub request_media: Option<MediaType>,
    pub response_media: MediaType,
    pub route_template: &'static str,
}

pub const REPOSITORIES_LOCATION: Uuid = Uuid::from_u128(0x225f7195_f9c7_4d14_ab28_a83f7ff77e1f);
pub const REFS_LOCATION: Uuid = Uuid::from_u128(0x2d874a60_a811_4f62_9c9f_963a6ea0a55b);
pub const COMMITS_LOCATION: Uuid = Uuid::from_u128(0xc2570c3b_5b3f_41b8_98bf_5407bfde8d58);
pub const COMMITS_BATCH_LOCATION: Uuid = Uuid::from_u128(0x6400dfb2_0bcb_462b_b992_5a57f8f1416c);
pub const CHANGES_LOCATION: Uuid = Uuid::from_u128(0x5bf884f5_3e07_42e9_afb8_1b872267bf16);
pub const PUSHES_LOCATION: Uuid = Uuid::from_u128(0xea98d07b_3c87_4971_8ede_a613694ffb55);
pub const PULL_REQUESTS_LOCATION: Uuid = Uuid::from_u128(0x9946fd70_0d40_406e_b686_b4744cbbcc37);
pub const PULL_REQUESTS_BY_PROJECT_LOCATION: Uuid =
    Uuid::from_u128(0xa5d28130_9cd2_40fa_9f08_902e7daa9efb);
pub const PULL_REQUEST_REVIEWERS_LOCATION: Uuid =
    Uuid::from_u128(0x4b6702c7_aa35_4b89_9c96_b9abf6d3e540);
pub const PULL_REQUEST_COMMITS_LOCATION: Uuid =
    Uuid::from_u128(0x52823034_34a8_4576_922c_8d8b77e9e4c4);
pub const ITEMS_LOCATION: Uuid = Uuid::from_u128(0xfb93c0db_47ed_4a31_8c20_47552878fb44);
pub const ITEMS_BATCH_LOCATION: Uuid = Uuid::from_u128(0x630fd2e4_fb88_4f85_ad21_13f3fd1fbca9);
pub const TREES_LOCATION: Uuid = Uuid::from_u128(0x729f6437_6f92_44ec_8bee_273a7111063c);
pub const BLOBS_LOCATION: Uuid = Uuid::from_u128(0x7b28e929_2c99_405d_9c5c_6167a06e6816);

const AREA: &str = "git";

const REPOSITORIES_ROUTE: &str = "{project}/_apis/{area}/{resource}/{repositoryId}";
const REFS_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}";
const COMMITS_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}/{commitId}";
const COMMITS_BATCH_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/commitsBatch";
const CHANGES_ROUTE: &str =
    "{project}/_apis/{area}/repositories/{repositoryId}/commits/{commitId}/{resource}";
const PUSHES_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}/{pushId}";
const PULL_REQUESTS_ROUTE: &str =
    "{project}/_apis/{area}/repositories/{repositoryId}/pullRequests/{pullRequestId}";
const PULL_REQUESTS_BY_PROJECT_ROUTE: &str = "{project}/_apis/{area}/pullRequests";
const REVIEWERS_ROUTE: &str =
    "{project}/_apis/{area}/repositories/{repositoryId}/pullRequests/{pullRequestId}/reviewers/{reviewerId}";
const PULL_REQUEST_COMMITS_ROUTE: &str =
    "{project}/_apis/{area}/repositories/{repositoryId}/pullRequests/{pullRequestId}/commits";
const ITEMS_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}";
const ITEMS_BATCH_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/itemsBatch";
const TREES_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}/{sha1}";
const BLOBS_ROUTE: &str = "{project}/_apis/{area}/repositories/{repositoryId}/{resource}/{sha1}";

macro_rules! endpoint {
    (
        $op:ident, $name:literal, $location:expr, $resource:literal, $verb:ident,
        $version:literal, $request:expr, $response:ident, $route:expr
    ) => {
        EndpointDescriptor {
            operation: Operation::$op,
            name: $name,
            location_id: $location,
            area: AREA,
            resource: $resource,
            verb: HttpVerb::$verb,
            api_version: $version,
            request_media: $request,
            response_media: MediaType::$response,
            route_template: $route,
        }
    };
}

const JSON_BODY: Option<MediaType> = Some(MediaType::Json);

/// The operation table, indexed by `Operation as usize`.
pub static ENDPOINTS: &[EndpointDescriptor] = &[
    endpoint!(GetRepositories, "getRepositories", REPOSITORIES_LOCATION, "repositories", Get, "2.0", None, Json, REPOSITORIES_ROUTE),
    endpoint!(GetRepository, "getRepository", REPOSITORIES_LOCATION, "repositories", Get, "2.0", None, Json, REPOSITORIES_ROUTE),
    endpoint!(CreateRepository, "createRepository", REPOSITORIES_LOCATION, "repositories", Post, "2.0", JSON_BODY, Json, REPOSITORIES_ROUTE),
    endpoint!(UpdateRepository, "updateRepository", REPOSITORIES_LOCATION, "repositories", Patch, "2.0", JSON_BODY, Json, REPOSITORIES_ROUTE),
    endpoint!(DeleteRepository, "deleteRepository", REPOSITORIES_LOCATION, "repositories", Delete, "2.0", None, Json, REPOSITORIES_ROUTE),
    endpoint!(GetRefs, "getRefs", REFS_LOCATION, "refs", Get, "2.0", None, Json, REFS_ROUTE),
    endpoint!(UpdateRefs, "updateRefs", REFS_LOCATION, "refs", Post, "2.0", JSON_BODY, Json, REFS_ROUTE),
    endpoint!(GetCommit, "getCommit", COMMITS_LOCATION, "commits", Get, "2.0", None, Json, COMMITS_ROUTE),
    endpoint!(GetCommits, "getCommits", COMMITS_LOCATION, "commits", Get, "2.0", None, Json, COMMITS_ROUTE),
    endpoint!(GetCommitsBatch, "getCommitsBatch", COMMITS_BATCH_LOCATION, "commitsBatch", Post, "2.0", JSON_BODY, Json, COMMITS_BATCH_ROUTE),
    endpoint!(GetChanges, "getChanges", CHANGES_LOCATION, "changes", Get, "2.0", None, Json, CHANGES_ROUTE),
    endpoint!(GetPush, "getPush", PUSHES_LOCATION, "pushes", Get, "2.0", None, Json, PUSHES_ROUTE),
    endpoint!(GetPushes, "getPushes", PUSHES_LOCATION, "pushes", Get, "2.0", None, Json, PUSHES_ROUTE),
    endpoint!(CreatePush, "createPush", PUSHES_LOCATION, "pushes", Post, "2.0", JSON_BODY, Json, PUSHES_ROUTE),
    endpoint!(GetPullRequest, "getPullRequest", PULL_REQUESTS_LOCATION, "pullRequests", Get, "2.0", None, Json, PULL_REQUESTS_ROUTE),
    endpoint!(GetPullRequests, "getPullRequests", PULL_REQUESTS_LOCATION, "pullRequests", Get, "2.0", None, Json, PULL_REQUESTS_ROUTE),
    endpoint!(CreatePullRequest, "createPullRequest", PULL_REQUESTS_LOCATION, "pullRequests", Post, "2.0", JSON_BODY, Json, PULL_REQUESTS_ROUTE),
    endpoint!(UpdatePullRequest, "updatePullRequest", PULL_REQUESTS_LOCATION, "pullRequests", Patch, "2.0", JSON_BODY, Json, PULL_REQUESTS_ROUTE),
    endpoint!(GetPullRequestsByProject, "getPullRequestsByProject", PULL_REQUESTS_BY_PROJECT_LOCATION, "pullRequests", Get, "2.0", None, Json, PULL_REQUESTS_BY_PROJECT_ROUTE),
    endpoint!(GetPullRequestReviewer, "getPullRequestReviewer", PULL_REQUEST_REVIEWERS_LOCATION, "pullRequestReviewers", Get, "2.0", None, Json, REVIEWERS_ROUTE),
    endpoint!(GetPullRequestReviewers, "getPullRequestReviewers", PULL_REQUEST_REVIEWERS_LOCATION, "pullRequestReviewers", Get, "2.0", None, Json, REVIEWERS_ROUTE),
    endpoint!(CreatePullRequestReviewer, "createPullRequestReviewer", PULL_REQUEST_REVIEWERS_LOCATION, "pullRequestReviewers", Put, "2.0", JSON_BODY, Json, REVIEWERS_ROUTE),
    endpoint!(CreatePullRequestReviewers, "createPullRequestReviewers", PULL_REQUEST_REVIEWERS_LOCATION, "pullRequestReviewers", Post, "2.0", JSON_BODY, Json, REVIEWERS_ROUTE),
    endpoint!(DeletePullRequestReviewer, "deletePullRequestReviewer", PULL_REQUEST_REVIEWERS_LOCATION, "pullRequestReviewers", Delete, "2.0", None, Json, REVIEWERS_ROUTE),
    endpoint!(GetPullRequestCommits, "getPullRequestCommits", PULL_REQUEST_COMMITS_LOCATION, "pullRequestCommits", Get, "2.0", None, Json, PULL_REQUEST_COMMITS_ROUTE),
    endpoint!(GetItem, "getItem", ITEMS_LOCATION, "items", Get, "2.0", None, Json, ITEMS_ROUTE),
    endpoint!(GetItemContent, "getItemContent", ITEMS_LOCATION, "items", Get, "2.0", None, OctetStream, ITEMS_ROUTE),
    endpoint!(GetItemText, "getItemText", ITEMS_LOCATION, "items", Get, "2.0", None, PlainText, ITEMS_ROUTE),
    endpoint!(GetItemZip, "getItemZip", ITEMS_LOCATION, "items", Get, "2.0", None, Zip, ITEMS_ROUTE),
    endpoint!(GetItems, "getItems", ITEMS_LOCATION, "items", Get, "2.0", None, Json, ITEMS_ROUTE),
    endpoint!(GetItemsBatch, "getItemsBatch", ITEMS_BATCH_LOCATION, "itemsBatch", Post, "2.0-preview.1", JSON_BODY, Json, ITEMS_BATCH_ROUTE),
    endpoint!(GetTree, "getTree", TREES_LOCATION, "trees", Get, "2.0", None, Json, TREES_ROUTE),
    endpoint!(GetTreeZip, "getTreeZip", TREES_LOCATION, "trees", Get, "2.0", None, Zip, TREES_ROUTE),
    endpoint!(GetBlob, "getBlob", BLOBS_LOCATION, "blobs", Get, "2.0", None, Json, BLOBS_ROUTE),
    endpoint!(GetBlobContent, "getBlobContent", BLOBS_LOCATION, "blobs", Get, "2.0", None, OctetStream, BLOBS_ROUTE),
    endpoint!(GetBlobZip, "getBlobZip", BLOBS_LOCATION, "blobs", Get, "2.0", None, Zip, BLOBS_ROUTE),
    endpoint!(GetBlobsZip, "getBlobsZip", BLOBS_LOCATION, "blobs", Post, "2.0", JSON_BODY, Zip, BLOBS_ROUTE),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_indexed_by_operation() {
        for (index, descriptor) in ENDPOINTS.iter().enumerate() {
            assert_eq!(
                descriptor.operation as usize, index,
                "{} is out of place",
                descriptor.name
            );
        }
        assert_eq!(
            Operation::GetBlobsZip as usize + 1,
            ENDPOINTS.len(),
            "every operation needs exactly one descriptor"
        );
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = ENDPOINTS.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), ENDPOINTS.len());
    }

    #[test]
    fn test_blob_family_shares_location() {
        let ids: HashSet<Uuid> = [
            Operation::GetBlob,
            Operation::GetBlobContent,
            Operation::GetBlobZip,
            Operation::GetBlobsZip,
        ]
        .iter()
        .map(|op| op.descriptor().location_id)
        .collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(Operation::GetBlobZip.descriptor().response_media, MediaType::Zip);
    }

    #[test]
    fn test_only_items_batch_is_preview() {
        let preview: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|d| d.api_version != "2.0")
            .map(|d| d.name)
            .collect();
        assert_eq!(preview, vec!["getItemsBatch"]);
    }

    #[test]
    fn test_bodies_only_on_writing_verbs() {
        for descriptor in ENDPOINTS {
            if descriptor.request_media.is_some() {
                assert_ne!(descriptor.verb, HttpVerb::Get, "{}", descriptor.name);
            }
        }
    }
}
