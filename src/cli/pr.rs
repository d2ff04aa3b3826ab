//
//  tfgit
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request commands.
//!
//! Reviewers are addressed by identity id (a UUID). Votes use the
//! service's scale: 10 approved, 5 approved with suggestions, 0 none,
//! -5 waiting for author, -10 rejected.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use console::style;
use uuid::Uuid;

use super::{GlobalOptions, Session};
use crate::api::git::{
    full_branch_ref, short_ref_name, vote_label, GitCommitRef, GitPullRequest,
    GitPullRequestCompletionOptions, GitPullRequestCreate, GitPullRequestSearchCriteria,
    GitPullRequestUpdate, IdentityRefWithVote, PullRequestStatus,
};
use crate::api::IdentityRef;
use crate::context::GitContext;
use crate::interactive::{prompt_editor, prompt_input};
use crate::output::{
    format_date, format_status, format_vote, print_field, print_header, print_optional_field,
    truncate, TableOutput, TableRow,
};

/// Work with pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a pull request
    View(ViewArgs),

    /// Create a pull request
    Create(CreateArgs),

    /// Change title, description, target or status
    Update(UpdateArgs),

    /// List the commits of a pull request
    Commits(IdArgs),

    /// Manage reviewers
    #[command(subcommand)]
    Reviewer(ReviewerSubcommand),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Status to list
    #[arg(long, short = 's', value_enum, default_value = "active")]
    pub status: StatusFilter,

    /// Only pull requests into this branch
    #[arg(long, short = 'B')]
    pub target: Option<String>,

    /// Only pull requests from this branch
    #[arg(long, short = 'H')]
    pub source: Option<String>,

    /// Only pull requests created by this identity id
    #[arg(long)]
    pub creator: Option<Uuid>,

    /// Only pull requests reviewed by this identity id
    #[arg(long)]
    pub reviewer: Option<Uuid>,

    /// List across every repository of the project
    #[arg(long)]
    pub all_repos: bool,

    #[arg(long, short = 'L', default_value = "30")]
    pub limit: u32,

    #[arg(long)]
    pub skip: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Completed,
    Abandoned,
    All,
}

impl From<StatusFilter> for PullRequestStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => Self::Active,
            StatusFilter::Completed => Self::Completed,
            StatusFilter::Abandoned => Self::Abandoned,
            StatusFilter::All => Self::All,
        }
    }
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Pull request id
    pub id: i32,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Pull request id
    pub id: i32,

    /// Open in the browser
    #[arg(long, short = 'w')]
    pub web: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Write the description in $EDITOR
    #[arg(long, short = 'e', conflicts_with = "body")]
    pub editor: bool,

    /// Source branch (defaults to the checked out branch)
    #[arg(long, short = 'H')]
    pub source: Option<String>,

    /// Target branch (defaults to the repository's default branch)
    #[arg(long, short = 'B')]
    pub target: Option<String>,

    /// Reviewer identity ids
    #[arg(long, short = 'r')]
    pub reviewer: Vec<Uuid>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Pull request id
    pub id: i32,

    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Retarget to this branch
    #[arg(long, short = 'B')]
    pub target: Option<String>,

    /// Abandon the pull request
    #[arg(long, conflicts_with_all = ["reactivate", "complete"])]
    pub abandon: bool,

    /// Reactivate an abandoned pull request
    #[arg(long, conflicts_with = "complete")]
    pub reactivate: bool,

    /// Complete (merge) the pull request
    #[arg(long)]
    pub complete: bool,

    /// Squash when completing
    #[arg(long, requires = "complete")]
    pub squash: bool,

    /// Delete the source branch when completing
    #[arg(long, requires = "complete")]
    pub delete_source_branch: bool,
}

#[derive(Subcommand, Debug)]
pub enum ReviewerSubcommand {
    /// List reviewers and their votes
    #[command(visible_alias = "ls")]
    List(IdArgs),

    /// Add reviewers, or set a reviewer's vote
    Add(ReviewerAddArgs),

    /// Remove a reviewer
    #[command(visible_alias = "rm")]
    Remove(ReviewerRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ReviewerAddArgs {
    /// Pull request id
    pub id: i32,

    /// Reviewer identity ids
    #[arg(required = true)]
    pub reviewers: Vec<Uuid>,

    /// Vote to record (10, 5, 0, -5, -10)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_vote)]
    pub vote: Option<i16>,

    /// Mark the reviewer as required
    #[arg(long)]
    pub required: bool,
}

#[derive(Args, Debug)]
pub struct ReviewerRemoveArgs {
    /// Pull request id
    pub id: i32,

    /// Reviewer identity id
    pub reviewer: Uuid,
}

fn parse_vote(value: &str) -> Result<i16, String> {
    match value.parse::<i16>() {
        Ok(vote @ (10 | 5 | 0 | -5 | -10)) => Ok(vote),
        _ => Err("vote must be one of 10, 5, 0, -5, -10".to_string()),
    }
}

impl TableRow for GitPullRequest {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Branches", "Author", "Status"];

    fn row(&self, color: bool) -> Vec<String> {
        let id = format!("!{}", self.pull_request_id);
        vec![
            if color { style(id).cyan().to_string() } else { id },
            truncate(self.title.as_deref().unwrap_or(""), 50),
            branches(self),
            self.created_by
                .as_ref()
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
            format_status(&status_text(self), color),
        ]
    }
}

impl TableOutput for GitPullRequest {
    fn print_table(&self, color: bool) {
        print_header(&format!(
            "!{} {}",
            self.pull_request_id,
            self.title.as_deref().unwrap_or("")
        ));
        println!();
        print_field("Status", &format_status(&status_text(self), color), color);
        print_field("Branches", &branches(self), color);
        if let Some(author) = &self.created_by {
            print_field("Author", author.label(), color);
        }
        print_field("Created", &format_date(self.creation_date.as_ref()), color);
        if self.closed_date.is_some() {
            print_field("Closed", &format_date(self.closed_date.as_ref()), color);
        }
        print_optional_field("Merge status", self.merge_status.as_deref(), color);

        if let Some(reviewers) = self.reviewers.as_ref().filter(|r| !r.is_empty()) {
            println!();
            println!("Reviewers:");
            for reviewer in reviewers {
                println!("  {}", reviewer_line(reviewer, color));
            }
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            println!();
            println!("{}", description);
        }
    }
}

impl TableRow for IdentityRefWithVote {
    const HEADERS: &'static [&'static str] = &["Reviewer", "Vote", "Required", "Id"];

    fn row(&self, color: bool) -> Vec<String> {
        let vote = self.vote.unwrap_or(0);
        vec![
            self.identity.label().to_string(),
            format_vote(vote_label(vote), vote, color),
            if self.is_required.unwrap_or(false) { "yes" } else { "" }.to_string(),
            self.identity.id.map(|id| id.to_string()).unwrap_or_default(),
        ]
    }
}

fn reviewer_line(reviewer: &IdentityRefWithVote, color: bool) -> String {
    let vote = reviewer.vote.unwrap_or(0);
    let required = if reviewer.is_required.unwrap_or(false) {
        " (required)"
    } else {
        ""
    };
    format!(
        "{}{}: {}",
        reviewer.identity.label(),
        required,
        format_vote(vote_label(vote), vote, color)
    )
}

fn status_text(pr: &GitPullRequest) -> String {
    pr.status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn branches(pr: &GitPullRequest) -> String {
    format!(
        "{} -> {}",
        pr.source_ref_name.as_deref().map(short_ref_name).unwrap_or("?"),
        pr.target_ref_name.as_deref().map(short_ref_name).unwrap_or("?"),
    )
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        match &self.command {
            PrSubcommand::List(args) => list(&session, args, global).await,
            PrSubcommand::View(args) => view(&session, args, global).await,
            PrSubcommand::Create(args) => create(&session, args, global).await,
            PrSubcommand::Update(args) => update(&session, args, global).await,
            PrSubcommand::Commits(args) => commits(&session, args, global).await,
            PrSubcommand::Reviewer(command) => reviewer(&session, command, global).await,
        }
    }
}

fn search_criteria(args: &ListArgs) -> GitPullRequestSearchCriteria {
    GitPullRequestSearchCriteria {
        status: Some(args.status.into()),
        source_ref_name: args.source.as_deref().map(full_branch_ref),
        target_ref_name: args.target.as_deref().map(full_branch_ref),
        creator_id: args.creator,
        reviewer_id: args.reviewer,
        ..Default::default()
    }
}

async fn list(session: &Session, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let criteria = search_criteria(args);
    let prs = if args.all_repos {
        let project = session.context.require_project()?;
        session
            .client
            .get_pull_requests_by_project(&project, Some(&criteria), None, args.skip, Some(args.limit))
            .await?
    } else {
        let repository = session.context.repo_ref()?;
        session
            .client
            .get_pull_requests(
                session.context.project_ref().as_ref(),
                &repository,
                Some(&criteria),
                None,
                args.skip,
                Some(args.limit),
            )
            .await?
    };
    global.output().write_list(&prs, "No pull requests match")
}

async fn view(session: &Session, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
    let repository = session.context.repo_ref()?;
    let pr = session
        .client
        .get_pull_request(
            session.context.project_ref().as_ref(),
            &repository,
            args.id,
            None,
            None,
            None,
            None,
        )
        .await?;

    if args.web {
        let base = session
            .context
            .web_url()
            .context("Cannot build a web URL without a repository")?;
        webbrowser::open(&format!("{}/pullrequest/{}", base, pr.pull_request_id))?;
        return Ok(());
    }
    global.output().write(&pr)
}

async fn create(session: &Session, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let prompt = session.can_prompt(global);

    let source = match &args.source {
        Some(branch) => branch.clone(),
        None => GitContext::open()
            .ok()
            .and_then(|git| git.current_branch().ok().flatten())
            .context("No source branch. Use --source.")?,
    };
    let target = match &args.target {
        Some(branch) => branch.clone(),
        None => session
            .client
            .get_repository(project.as_ref(), &repository)
            .await?
            .default_branch
            .context("The repository has no default branch. Use --target.")?,
    };
    if full_branch_ref(&source) == full_branch_ref(&target) {
        bail!("Source and target are both {}", short_ref_name(&target));
    }

    let title = match &args.title {
        Some(title) => title.clone(),
        None if prompt => prompt_input("Title")?,
        None => bail!("--title is required"),
    };
    let description = if args.editor {
        prompt_editor("")?.filter(|d| !d.trim().is_empty())
    } else {
        args.body.clone()
    };

    let create = GitPullRequestCreate {
        source_ref_name: full_branch_ref(&source),
        target_ref_name: full_branch_ref(&target),
        title,
        description,
        reviewers: (!args.reviewer.is_empty()).then(|| {
            args.reviewer
                .iter()
                .map(|id| IdentityRef {
                    id: Some(*id),
                    ..Default::default()
                })
                .collect()
        }),
    };
    let pr = session
        .client
        .create_pull_request(project.as_ref(), &repository, &create)
        .await?;

    let output = global.output();
    if output.is_json() {
        return output.write(&pr);
    }
    output.write_success(&format!(
        "Created pull request !{} ({})",
        pr.pull_request_id,
        branches(&pr)
    ));
    if let Some(base) = session.context.web_url() {
        output.write_info(&format!("{}/pullrequest/{}", base, pr.pull_request_id));
    }
    Ok(())
}

async fn update(session: &Session, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;

    let mut update = GitPullRequestUpdate {
        title: args.title.clone(),
        description: args.body.clone(),
        target_ref_name: args.target.as_deref().map(full_branch_ref),
        ..Default::default()
    };
    if args.abandon {
        update.status = Some(PullRequestStatus::Abandoned);
    } else if args.reactivate {
        update.status = Some(PullRequestStatus::Active);
    } else if args.complete {
        // Completion must name the source tip the server last merged.
        let current = session
            .client
            .get_pull_request(project.as_ref(), &repository, args.id, None, None, None, None)
            .await?;
        let tip = current
            .last_merge_source_commit
            .context("The server has not merged this pull request yet; try again shortly")?;
        update.status = Some(PullRequestStatus::Completed);
        update.last_merge_source_commit = Some(GitCommitRef {
            commit_id: tip.commit_id,
            ..Default::default()
        });
        update.completion_options = Some(GitPullRequestCompletionOptions {
            squash_merge: args.squash.then_some(true),
            delete_source_branch: args.delete_source_branch.then_some(true),
            merge_commit_message: None,
        });
    }
    if update == GitPullRequestUpdate::default() {
        bail!("Nothing to update. Pass --title, --body, --target, --abandon, --reactivate or --complete.");
    }

    let pr = session
        .client
        .update_pull_request(project.as_ref(), &repository, args.id, &update)
        .await?;
    let output = global.output();
    if output.is_json() {
        return output.write(&pr);
    }
    output.write_success(&format!(
        "Updated pull request !{} ({})",
        pr.pull_request_id,
        status_text(&pr)
    ));
    Ok(())
}

async fn commits(session: &Session, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
    let repository = session.context.repo_ref()?;
    let commits = session
        .client
        .get_pull_request_commits(session.context.project_ref().as_ref(), &repository, args.id)
        .await?;
    global.output().write_list(&commits, "No commits")
}

async fn reviewer(
    session: &Session,
    command: &ReviewerSubcommand,
    global: &GlobalOptions,
) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let client = &session.client;
    let output = global.output();

    match command {
        ReviewerSubcommand::List(args) => {
            let reviewers = client
                .get_pull_request_reviewers(project.as_ref(), &repository, args.id)
                .await?;
            output.write_list(&reviewers, "No reviewers")
        }
        ReviewerSubcommand::Add(args) => {
            let with_vote = args.vote.is_some() || args.required;
            let added = if with_vote {
                let mut added = Vec::with_capacity(args.reviewers.len());
                for id in &args.reviewers {
                    let reviewer = IdentityRefWithVote {
                        vote: args.vote,
                        is_required: args.required.then_some(true),
                        ..Default::default()
                    };
                    added.push(
                        client
                            .create_pull_request_reviewer(
                                project.as_ref(),
                                &repository,
                                args.id,
                                &id.to_string(),
                                &reviewer,
                            )
                            .await?,
                    );
                }
                added
            } else {
                let identities: Vec<IdentityRef> = args
                    .reviewers
                    .iter()
                    .map(|id| IdentityRef {
                        id: Some(*id),
                        ..Default::default()
                    })
                    .collect();
                client
                    .create_pull_request_reviewers(project.as_ref(), &repository, args.id, &identities)
                    .await?
            };
            if output.is_json() {
                return crate::output::write_json(&added);
            }
            for reviewer in &added {
                output.write_success(&reviewer_line(reviewer, false));
            }
            Ok(())
        }
        ReviewerSubcommand::Remove(args) => {
            client
                .delete_pull_request_reviewer(
                    project.as_ref(),
                    &repository,
                    args.id,
                    &args.reviewer.to_string(),
                )
                .await?;
            output.write_success(&format!("Removed reviewer {} from !{}", args.reviewer, args.id));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_vote() {
        assert_eq!(parse_vote("-10"), Ok(-10));
        assert_eq!(parse_vote("5"), Ok(5));
        assert!(parse_vote("7").is_err());
        assert!(parse_vote("yes").is_err());
    }

    #[test]
    fn test_search_criteria() {
        let args = ListArgs {
            status: StatusFilter::All,
            target: Some("main".to_string()),
            source: None,
            creator: None,
            reviewer: None,
            all_repos: false,
            limit: 30,
            skip: None,
        };
        let criteria = search_criteria(&args);
        assert_eq!(criteria.status, Some(PullRequestStatus::All));
        assert_eq!(criteria.target_ref_name.as_deref(), Some("refs/heads/main"));
        assert_eq!(criteria.source_ref_name, None);
    }

    #[test]
    fn test_reviewer_add_accepts_negative_vote() {
        let cli = Cli::try_parse_from([
            "tfgit",
            "pr",
            "reviewer",
            "add",
            "42",
            "3f4ea3fd-4e6f-4b0e-8d6b-5b4a1c0d9e8f",
            "--vote",
            "-5",
        ])
        .unwrap();
        match cli.command {
            crate::cli::Commands::Pr(PrCommand {
                command: PrSubcommand::Reviewer(ReviewerSubcommand::Add(args)),
            }) => {
                assert_eq!(args.id, 42);
                assert_eq!(args.vote, Some(-5));
                assert_eq!(args.reviewers.len(), 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_flags_conflict() {
        assert!(Cli::try_parse_from(["tfgit", "pr", "update", "7", "--abandon", "--complete"]).is_err());
        assert!(Cli::try_parse_from(["tfgit", "pr", "update", "7", "--squash"]).is_err());
    }

    #[test]
    fn test_branches_display() {
        let pr = GitPullRequest {
            source_ref_name: Some("refs/heads/feature/login".to_string()),
            target_ref_name: Some("refs/heads/main".to_string()),
            ..Default::default()
        };
        assert_eq!(branches(&pr), "feature/login -> main");
    }
}
