//
//  tfgit
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Context Resolver
//!
//! Parses git remote URLs and merges them with command line flags and
//! config defaults into a [`RepoContext`].

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{GitContext, RepoContext};
use crate::cli::GlobalOptions;
use crate::config::{host_of, Config};

/// `https://[user@]dev.azure.com/{org}/{project}/_git/{repo}`
static HOSTED_HTTPS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(?:[^@/]+@)?dev\.azure\.com/([^/]+)/(?:([^/]+)/)?_git/([^/?#]+?)/?$")
        .unwrap()
});

/// `https://{org}.visualstudio.com/[DefaultCollection/]{project}/_git/{repo}`
static LEGACY_HTTPS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https://(?:[^@/]+@)?([^./@]+)\.visualstudio\.com/(?:DefaultCollection/)?(?:([^/]+)/)?_git/([^/?#]+?)/?$",
    )
    .unwrap()
});

/// `git@ssh.dev.azure.com:v3/{org}/{project}/{repo}` and the legacy
/// `{org}@vs-ssh.visualstudio.com:v3/...` form.
static HOSTED_SSH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:ssh://)?[^@/]+@(ssh\.dev\.azure\.com|vs-ssh\.visualstudio\.com):(?:22/)?v3/([^/]+)/([^/]+)/([^/]+?)/?$",
    )
    .unwrap()
});

/// `{scheme}://host[:port]/tfs/{collection}/[{project}/]_git/{repo}`
static ON_PREMISES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(https?|ssh)://(?:[^@/]+@)?([^/:]+)(:\d+)?/tfs/([^/]+)/(?:([^/]+)/)?_git/([^/?#]+?)/?$",
    )
    .unwrap()
});

/// What a remote URL says about its repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteInfo {
    pub collection_url: String,
    pub project: String,
    pub repository: String,
}

/// Parses a git remote URL.
///
/// Remotes without a project segment belong to the project of the same
/// name as the repository.
pub fn parse_remote_url(url: &str) -> Result<RemoteInfo> {
    let url = url.trim();

    if let Some(caps) = HOSTED_HTTPS_PATTERN.captures(url) {
        let repo = decode(&caps[3]);
        return Ok(RemoteInfo {
            collection_url: format!("https://dev.azure.com/{}", &caps[1]),
            project: caps.get(2).map(|m| decode(m.as_str())).unwrap_or_else(|| repo.clone()),
            repository: repo,
        });
    }

    if let Some(caps) = LEGACY_HTTPS_PATTERN.captures(url) {
        let repo = decode(&caps[3]);
        return Ok(RemoteInfo {
            collection_url: format!("https://{}.visualstudio.com", &caps[1]),
            project: caps.get(2).map(|m| decode(m.as_str())).unwrap_or_else(|| repo.clone()),
            repository: repo,
        });
    }

    if let Some(caps) = HOSTED_SSH_PATTERN.captures(url) {
        let collection_url = if &caps[1] == "ssh.dev.azure.com" {
            format!("https://dev.azure.com/{}", &caps[2])
        } else {
            format!("https://{}.visualstudio.com", &caps[2])
        };
        return Ok(RemoteInfo {
            collection_url,
            project: decode(&caps[3]),
            repository: decode(&caps[4]),
        });
    }

    if let Some(caps) = ON_PREMISES_PATTERN.captures(url) {
        // SSH remotes name the SSH port; the web server is assumed on https.
        let base = match &caps[1] {
            "ssh" => format!("https://{}", &caps[2]),
            scheme => format!(
                "{}://{}{}",
                scheme,
                &caps[2],
                caps.get(3).map_or("", |m| m.as_str())
            ),
        };
        let repo = decode(&caps[6]);
        return Ok(RemoteInfo {
            collection_url: format!("{}/tfs/{}", base, &caps[4]),
            project: caps.get(5).map(|m| decode(m.as_str())).unwrap_or_else(|| repo.clone()),
            repository: repo,
        });
    }

    bail!("Could not parse remote URL: {}", url)
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn same_collection(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}

/// Merges flags, the git remote and config defaults.
pub struct ContextResolver {
    config: Config,
}

impl ContextResolver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves the context of the current directory.
    pub fn resolve(&self, options: &GlobalOptions) -> Result<RepoContext> {
        let origin = GitContext::open().ok().and_then(|git| git.origin_url());
        self.resolve_with_remote(options, origin.as_deref())
    }

    /// Resolves against an explicit remote URL instead of the working
    /// directory's `origin`.
    pub fn resolve_with_remote(
        &self,
        options: &GlobalOptions,
        remote_url: Option<&str>,
    ) -> Result<RepoContext> {
        let remote = remote_url.and_then(|url| match parse_remote_url(url) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!("Ignoring origin remote: {}", e);
                None
            }
        });

        let collection_url = match (&options.collection, &remote) {
            (Some(flag), _) => flag.trim_end_matches('/').to_string(),
            (None, Some(remote)) => remote.collection_url.clone(),
            (None, None) => match self.config.default_collection() {
                Some(url) => url.trim_end_matches('/').to_string(),
                None => bail!(
                    "Could not determine collection URL. Use --collection, set TFGIT_COLLECTION, or run from a clone."
                ),
            },
        };

        let remote = remote.filter(|r| same_collection(&r.collection_url, &collection_url));

        let project = options
            .project
            .clone()
            .or_else(|| remote.as_ref().map(|r| r.project.clone()))
            .or_else(|| {
                let host = host_of(&collection_url)?;
                self.config.host_config(&host)?.default_project.clone()
            });

        let repository = options
            .repo
            .clone()
            .or_else(|| remote.map(|r| r.repository));

        Ok(RepoContext {
            collection_url,
            project,
            repository,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(collection: Option<&str>, project: Option<&str>, repo: Option<&str>) -> GlobalOptions {
        GlobalOptions {
            collection: collection.map(str::to_string),
            project: project.map(str::to_string),
            repo: repo.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_hosted_https() {
        let info =
            parse_remote_url("https://fabrikam@dev.azure.com/fabrikam/Fabrikam%20Fiber/_git/widgets")
                .unwrap();
        assert_eq!(info.collection_url, "https://dev.azure.com/fabrikam");
        assert_eq!(info.project, "Fabrikam Fiber");
        assert_eq!(info.repository, "widgets");
    }

    #[test]
    fn test_parse_legacy_https_without_project() {
        let info = parse_remote_url("https://fabrikam.visualstudio.com/_git/Fiber").unwrap();
        assert_eq!(info.collection_url, "https://fabrikam.visualstudio.com");
        assert_eq!(info.project, "Fiber");
        assert_eq!(info.repository, "Fiber");

        let info = parse_remote_url(
            "https://fabrikam.visualstudio.com/DefaultCollection/Fiber/_git/widgets",
        )
        .unwrap();
        assert_eq!(info.project, "Fiber");
        assert_eq!(info.repository, "widgets");
    }

    #[test]
    fn test_parse_hosted_ssh() {
        let info = parse_remote_url("git@ssh.dev.azure.com:v3/fabrikam/Fiber/widgets").unwrap();
        assert_eq!(info.collection_url, "https://dev.azure.com/fabrikam");
        assert_eq!(info.project, "Fiber");
        assert_eq!(info.repository, "widgets");

        let info =
            parse_remote_url("fabrikam@vs-ssh.visualstudio.com:v3/fabrikam/Fiber/widgets").unwrap();
        assert_eq!(info.collection_url, "https://fabrikam.visualstudio.com");
    }

    #[test]
    fn test_parse_on_premises() {
        let info =
            parse_remote_url("http://tfs01:8080/tfs/DefaultCollection/Fiber/_git/widgets").unwrap();
        assert_eq!(info.collection_url, "http://tfs01:8080/tfs/DefaultCollection");
        assert_eq!(info.project, "Fiber");

        let info =
            parse_remote_url("ssh://tfs01:22/tfs/DefaultCollection/Fiber/_git/widgets").unwrap();
        assert_eq!(info.collection_url, "https://tfs01/tfs/DefaultCollection");
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        assert!(parse_remote_url("git@github.com:owner/repo.git").is_err());
        assert!(parse_remote_url("https://example.com/owner/repo").is_err());
    }

    #[test]
    fn test_flags_win_over_remote() {
        let resolver = ContextResolver::new(Config::default());
        let ctx = resolver
            .resolve_with_remote(
                &options(None, None, Some("gadgets")),
                Some("https://dev.azure.com/fabrikam/Fiber/_git/widgets"),
            )
            .unwrap();
        assert_eq!(ctx.collection_url, "https://dev.azure.com/fabrikam");
        assert_eq!(ctx.project.as_deref(), Some("Fiber"));
        assert_eq!(ctx.repository.as_deref(), Some("gadgets"));
    }

    #[test]
    fn test_remote_for_other_collection_is_ignored() {
        let mut config = Config::default();
        config
            .set("hosts.tfs01.default_project", "Platform")
            .unwrap();
        let resolver = ContextResolver::new(config);
        let ctx = resolver
            .resolve_with_remote(
                &options(Some("http://tfs01:8080/tfs/Default/"), None, None),
                Some("https://dev.azure.com/fabrikam/Fiber/_git/widgets"),
            )
            .unwrap();
        assert_eq!(ctx.collection_url, "http://tfs01:8080/tfs/Default");
        assert_eq!(ctx.project.as_deref(), Some("Platform"));
        assert_eq!(ctx.repository, None);
    }

    #[test]
    fn test_config_defaults_last() {
        let mut config = Config::default();
        config
            .set("hosts.dev.azure.com.url", "https://dev.azure.com/fabrikam")
            .unwrap();
        config
            .set("hosts.dev.azure.com.default_project", "Fiber")
            .unwrap();
        let resolver = ContextResolver::new(config);
        let ctx = resolver
            .resolve_with_remote(&options(None, None, Some("widgets")), None)
            .unwrap();
        assert_eq!(ctx.collection_url, "https://dev.azure.com/fabrikam");
        assert_eq!(ctx.project.as_deref(), Some("Fiber"));
    }

    #[test]
    fn test_no_collection_anywhere() {
        let resolver = ContextResolver::new(Config::default());
        assert!(resolver
            .resolve_with_remote(&options(None, None, None), Some("git@github.com:o/r.git"))
            .is_err());
    }
}
