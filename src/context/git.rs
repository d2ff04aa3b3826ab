//
//  tfgit
//  context/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Local git repository access.

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

/// The git repository enclosing a directory.
pub struct GitContext {
    repo: Repository,
}

impl GitContext {
    /// Discovers the repository enclosing the current directory.
    pub fn open() -> Result<Self> {
        Self::discover(Path::new("."))
    }

    /// Discovers the repository enclosing `path`, walking up parents.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("{} is not inside a git repository", path.display()))?;
        Ok(Self { repo })
    }

    /// Short name of the checked out branch, `None` when HEAD is detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head().context("Failed to read HEAD")?;
        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(str::to_string))
    }

    pub fn remote_url(&self, name: &str) -> Option<String> {
        let remote = self.repo.find_remote(name).ok()?;
        remote.url().map(str::to_string)
    }

    pub fn origin_url(&self) -> Option<String> {
        self.remote_url("origin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_origin_from_initialized_repo() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "https://dev.azure.com/fabrikam/Fiber/_git/widgets")
            .unwrap();

        let nested = dir.path().join("src");
        std::fs::create_dir(&nested).unwrap();
        let git = GitContext::discover(&nested).unwrap();
        assert_eq!(
            git.origin_url().as_deref(),
            Some("https://dev.azure.com/fabrikam/Fiber/_git/widgets")
        );
        assert_eq!(git.remote_url("upstream"), None);
    }
}
