//
//  tfgit
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{GlobalOptions, Session};
use crate::api::git::{
    short_ref_name, GitRepository, GitRepositoryCreateOptions, GitRepositoryUpdate,
    TeamProjectReference,
};
use crate::api::RepoRef;
use crate::output::{
    format_size, print_field, print_header, print_optional_field, TableOutput, TableRow,
};

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// List repositories of the project, or of the whole collection
    #[command(visible_alias = "ls")]
    List,

    /// View repository details
    View(ViewArgs),

    /// Create a repository in the project
    Create(CreateArgs),

    /// Rename a repository
    Rename(RenameArgs),

    /// Delete a repository
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Repository name or id (defaults to the current repository)
    pub repository: Option<String>,

    /// Open the repository in the browser
    #[arg(long, short = 'w')]
    pub web: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new repository
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// New name
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl TableRow for GitRepository {
    const HEADERS: &'static [&'static str] = &["Name", "Project", "Default branch", "Size"];

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.name.clone(),
            self.project
                .as_ref()
                .and_then(|p| p.name.clone())
                .unwrap_or_default(),
            self.default_branch
                .as_deref()
                .map(short_ref_name)
                .unwrap_or("-")
                .to_string(),
            self.size.map(format_size).unwrap_or_default(),
        ]
    }
}

impl TableOutput for GitRepository {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        println!();
        print_field("Id", &self.id.to_string(), color);
        print_optional_field(
            "Project",
            self.project.as_ref().and_then(|p| p.name.as_deref()),
            color,
        );
        print_field(
            "Default branch",
            self.default_branch
                .as_deref()
                .map(short_ref_name)
                .unwrap_or("(empty repository)"),
            color,
        );
        if let Some(size) = self.size {
            print_field("Size", &format_size(size), color);
        }
        println!();
        print_optional_field("Web URL", self.web_url.as_deref(), color);
        print_optional_field("Clone URL", self.remote_url.as_deref(), color);
        print_optional_field("SSH URL", self.ssh_url.as_deref(), color);
    }
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        match &self.command {
            RepoSubcommand::List => list(&session, global).await,
            RepoSubcommand::View(args) => view(&session, args, global).await,
            RepoSubcommand::Create(args) => create(&session, args, global).await,
            RepoSubcommand::Rename(args) => rename(&session, args, global).await,
            RepoSubcommand::Delete(args) => delete(&session, args, global).await,
        }
    }
}

async fn list(session: &Session, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let mut repos = session
        .client
        .get_repositories(project.as_ref(), None)
        .await?;
    repos.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    global.output().write_list(&repos, "No repositories found")
}

async fn view(session: &Session, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
    let repository = match &args.repository {
        Some(name) => RepoRef::parse(name),
        None => session.context.repo_ref()?,
    };
    let repo = session
        .client
        .get_repository(session.context.project_ref().as_ref(), &repository)
        .await?;

    if args.web {
        let url = repo
            .web_url
            .clone()
            .or_else(|| session.context.web_url())
            .ok_or_else(|| anyhow::anyhow!("The server returned no web URL"))?;
        webbrowser::open(&url)?;
        return Ok(());
    }
    global.output().write(&repo)
}

async fn create(session: &Session, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.require_project()?;
    let options = GitRepositoryCreateOptions {
        name: args.name.clone(),
        project: Some(TeamProjectReference::from(&project)),
    };
    let repo = session
        .client
        .create_repository(Some(&project), &options)
        .await?;

    let output = global.output();
    output.write_success(&format!("Created repository {}", repo.name));
    if output.is_json() {
        output.write(&repo)?;
    } else if let Some(url) = &repo.remote_url {
        output.write_info(url);
    }
    Ok(())
}

async fn rename(session: &Session, args: &RenameArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let update = GitRepositoryUpdate {
        name: Some(args.new_name.clone()),
        default_branch: None,
    };
    let repo = session
        .client
        .update_repository(project.as_ref(), &repository, &update)
        .await?;

    let output = global.output();
    if output.is_json() {
        return output.write(&repo);
    }
    output.write_success(&format!("Renamed {} to {}", repository, repo.name));
    Ok(())
}

async fn delete(session: &Session, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;

    // Deletion is by id; resolve names first.
    let repo = session
        .client
        .get_repository(project.as_ref(), &repository)
        .await?;
    session.confirm(
        global,
        args.yes,
        &format!("Delete repository {}? This cannot be undone", repo.name),
    )?;

    session
        .client
        .delete_repository(project.as_ref(), &RepoRef::Id(repo.id))
        .await?;
    global
        .output()
        .write_success(&format!("Deleted repository {}", repo.name));
    Ok(())
}
