//
//  tfgit
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context
//!
//! Works out which collection, project and repository a command targets.
//!
//! ## Resolution Order
//!
//! Each field is taken from the first source that has it:
//!
//! 1. Command line flags (`--collection`, `--project`, `--repo`) or their
//!    `TFGIT_*` environment variables
//! 2. The `origin` remote of the enclosing git repository
//! 3. Config defaults (the configured collection URL and the host's
//!    `default_project`)
//!
//! The remote only contributes when it points at the same collection.
//!
//! ## Supported Remote URL Formats
//!
//! | Format | Example |
//! |--------|---------|
//! | Hosted HTTPS | `https://fabrikam@dev.azure.com/fabrikam/Fiber/_git/widgets` |
//! | Legacy hosted | `https://fabrikam.visualstudio.com/Fiber/_git/widgets` |
//! | Hosted SSH | `git@ssh.dev.azure.com:v3/fabrikam/Fiber/widgets` |
//! | On-premises | `https://tfs.fabrikam.local/tfs/DefaultCollection/Fiber/_git/widgets` |

mod git;
mod resolver;

pub use git::*;
pub use resolver::*;

use anyhow::{bail, Result};

use crate::api::{ProjectRef, RepoRef};

/// The target of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoContext {
    /// Collection URL, without a trailing slash.
    pub collection_url: String,

    /// Project name or id.
    pub project: Option<String>,

    /// Repository name or id.
    pub repository: Option<String>,
}

impl RepoContext {
    pub fn project_ref(&self) -> Option<ProjectRef> {
        self.project.as_deref().map(ProjectRef::parse)
    }

    /// The repository, or an error telling the user how to name one.
    pub fn repo_ref(&self) -> Result<RepoRef> {
        match self.repository.as_deref() {
            Some(repo) => Ok(RepoRef::parse(repo)),
            None => bail!(
                "Could not determine repository. Use --repo, or run from a clone of the repository."
            ),
        }
    }

    /// The project, or an error when the operation needs one.
    pub fn require_project(&self) -> Result<ProjectRef> {
        match self.project_ref() {
            Some(project) => Ok(project),
            None => bail!("This command needs a project. Use --project."),
        }
    }

    /// `project/repo` for display.
    pub fn full_name(&self) -> String {
        match (&self.project, &self.repository) {
            (Some(p), Some(r)) => format!("{}/{}", p, r),
            (None, Some(r)) => r.clone(),
            (Some(p), None) => p.clone(),
            (None, None) => self.collection_url.clone(),
        }
    }

    /// Browser URL of the repository.
    pub fn web_url(&self) -> Option<String> {
        let repo = self.repository.as_deref()?;
        let project = self.project.as_deref().unwrap_or(repo);
        Some(format!(
            "{}/{}/_git/{}",
            self.collection_url,
            urlencoding::encode(project),
            urlencoding::encode(repo)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(project: Option<&str>, repo: Option<&str>) -> RepoContext {
        RepoContext {
            collection_url: "https://dev.azure.com/fabrikam".to_string(),
            project: project.map(str::to_string),
            repository: repo.map(str::to_string),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(context(Some("Fiber"), Some("widgets")).full_name(), "Fiber/widgets");
        assert_eq!(context(None, Some("widgets")).full_name(), "widgets");
    }

    #[test]
    fn test_web_url_encodes_names() {
        assert_eq!(
            context(Some("Fabrikam Fiber"), Some("widgets")).web_url().as_deref(),
            Some("https://dev.azure.com/fabrikam/Fabrikam%20Fiber/_git/widgets")
        );
        assert_eq!(context(Some("Fiber"), None).web_url(), None);
    }

    #[test]
    fn test_missing_repo_is_an_error() {
        assert!(context(Some("Fiber"), None).repo_ref().is_err());
        assert!(context(None, Some("widgets")).require_project().is_err());
    }
}
