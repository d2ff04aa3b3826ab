//
//  tfgit
//  cli/refs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch and tag commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::{GlobalOptions, Session};
use crate::api::git::{full_branch_ref, short_ref_name, GitRef, GitRefUpdate};
use crate::api::{GitClient, ProjectRef, RepoRef};
use crate::output::TableRow;

/// Manage branches and tags
#[derive(Args, Debug)]
pub struct RefCommand {
    #[command(subcommand)]
    pub command: RefSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RefSubcommand {
    /// List refs
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a branch or tag
    Create(CreateArgs),

    /// Delete a branch or tag
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Prefix below refs/ (for example heads/ or tags/release)
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Include commit statuses
    #[arg(long)]
    pub statuses: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Branch name, or full ref name
    pub name: String,

    /// Branch, tag or commit id to start from
    #[arg(long, short = 's')]
    pub from: String,

    /// Create a lightweight tag instead of a branch
    #[arg(long)]
    pub tag: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Branch name, or full ref name
    pub name: String,

    /// Delete a tag instead of a branch
    #[arg(long)]
    pub tag: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl TableRow for GitRef {
    const HEADERS: &'static [&'static str] = &["Name", "Object", "Status"];

    fn row(&self, color: bool) -> Vec<String> {
        let status = self
            .statuses
            .as_ref()
            .and_then(|s| s.first())
            .and_then(|s| s.state.clone())
            .unwrap_or_default();
        let object = short_sha(&self.object_id);
        vec![
            self.name.clone(),
            if color {
                style(object).yellow().to_string()
            } else {
                object.to_string()
            },
            status,
        ]
    }
}

fn short_sha(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Full ref name for a branch or tag argument.
fn ref_name(name: &str, tag: bool) -> String {
    if tag && !name.starts_with("refs/") {
        format!("refs/tags/{}", name)
    } else {
        full_branch_ref(name)
    }
}

fn is_commit_id(value: &str) -> bool {
    value.len() == 40 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Looks up a ref by full name.
async fn find_ref(
    client: &GitClient,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    name: &str,
) -> Result<Option<GitRef>> {
    let filter = name.strip_prefix("refs/").unwrap_or(name);
    let refs = client
        .get_refs(project, repository, Some(filter), None, None)
        .await?;
    Ok(refs.into_iter().find(|r| r.name == name))
}

/// Resolves a branch, tag or commit id to a commit id.
pub(crate) async fn resolve_object_id(
    client: &GitClient,
    project: Option<&ProjectRef>,
    repository: &RepoRef,
    spec: &str,
) -> Result<String> {
    if is_commit_id(spec) {
        return Ok(spec.to_lowercase());
    }
    let candidates = if spec.starts_with("refs/") {
        vec![spec.to_string()]
    } else {
        vec![format!("refs/heads/{}", spec), format!("refs/tags/{}", spec)]
    };
    for candidate in candidates {
        if let Some(found) = find_ref(client, project, repository, &candidate).await? {
            return Ok(found.peeled_object_id.unwrap_or(found.object_id));
        }
    }
    bail!("No branch, tag or commit named {}", spec)
}

impl RefCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        match &self.command {
            RefSubcommand::List(args) => list(&session, args, global).await,
            RefSubcommand::Create(args) => create(&session, args, global).await,
            RefSubcommand::Delete(args) => delete(&session, args, global).await,
        }
    }
}

async fn list(session: &Session, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let refs = session
        .client
        .get_refs(
            project.as_ref(),
            &repository,
            args.filter.as_deref(),
            None,
            args.statuses.then_some(true),
        )
        .await?;
    global.output().write_list(&refs, "No refs found")
}

async fn create(session: &Session, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let name = ref_name(&args.name, args.tag);

    let object_id =
        resolve_object_id(&session.client, project.as_ref(), &repository, &args.from).await?;
    let results = session
        .client
        .update_refs(
            project.as_ref(),
            &repository,
            &[GitRefUpdate::create(&name, &object_id)],
            None,
        )
        .await?;
    report(results, global, &format!("Created {} at {}", short_ref_name(&name), short_sha(&object_id)))
}

async fn delete(session: &Session, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let name = ref_name(&args.name, args.tag);

    let Some(existing) = find_ref(&session.client, project.as_ref(), &repository, &name).await?
    else {
        bail!("{} does not exist", name);
    };
    session.confirm(global, args.yes, &format!("Delete {}?", name))?;

    let results = session
        .client
        .update_refs(
            project.as_ref(),
            &repository,
            &[GitRefUpdate::delete(&name, &existing.object_id)],
            None,
        )
        .await?;
    report(results, global, &format!("Deleted {}", short_ref_name(&name)))
}

fn report(
    results: Vec<crate::api::git::GitRefUpdateResult>,
    global: &GlobalOptions,
    success: &str,
) -> Result<()> {
    let output = global.output();
    if output.is_json() {
        crate::output::write_json(&results)?;
    }
    for result in &results {
        if !result.success {
            let reason = result
                .custom_message
                .clone()
                .or_else(|| result.update_status.clone())
                .unwrap_or_else(|| "rejected".to_string());
            bail!("{}: {}", result.name, reason);
        }
    }
    output.write_success(success);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("feature/login", false), "refs/heads/feature/login");
        assert_eq!(ref_name("v1.0", true), "refs/tags/v1.0");
        assert_eq!(ref_name("refs/heads/main", true), "refs/heads/main");
    }

    #[test]
    fn test_is_commit_id() {
        assert!(is_commit_id("3f4ea3fd4e6f2b0e4d6b5b4a1c0d9e8f7a6b5c4d"));
        assert!(!is_commit_id("main"));
        assert!(!is_commit_id("3f4ea3fd"));
    }
}
