//
//  tfgit
//  cli/commit.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Commit commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use super::{GlobalOptions, Session};
use crate::api::git::{
    GitChange, GitCommitChanges, GitCommitRef, GitQueryCommitsCriteria, GitVersionDescriptor,
};
use crate::output::{
    format_date, print_field, print_header, print_optional_field, truncate, TableOutput, TableRow,
};

/// Inspect commits
#[derive(Args, Debug)]
pub struct CommitCommand {
    #[command(subcommand)]
    pub command: CommitSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommitSubcommand {
    /// List commits
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one commit
    View(ViewArgs),

    /// List the files a commit changed
    Changes(ChangesArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Branch to list (defaults to the default branch)
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Only commits by this author
    #[arg(long)]
    pub author: Option<String>,

    /// Only commits touching this path
    #[arg(long)]
    pub path: Option<String>,

    /// Only commits after this date (ISO 8601)
    #[arg(long)]
    pub since: Option<String>,

    /// Only commits before this date (ISO 8601)
    #[arg(long)]
    pub until: Option<String>,

    /// Maximum number of commits
    #[arg(long, short = 'L', default_value = "30")]
    pub limit: u32,

    /// Number of commits to skip
    #[arg(long)]
    pub skip: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Commit id
    pub commit: String,

    /// Include up to this many changed files
    #[arg(long)]
    pub changes: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// Commit id
    pub commit: String,

    #[arg(long, short = 'L')]
    pub limit: Option<u32>,

    #[arg(long)]
    pub skip: Option<u32>,
}

impl TableRow for GitCommitRef {
    const HEADERS: &'static [&'static str] = &["Commit", "Author", "Date", "Subject"];

    fn row(&self, color: bool) -> Vec<String> {
        let id = if color {
            style(self.short_id()).yellow().to_string()
        } else {
            self.short_id().to_string()
        };
        vec![
            id,
            self.author
                .as_ref()
                .and_then(|a| a.name.clone())
                .unwrap_or_default(),
            format_date(self.author.as_ref().and_then(|a| a.date.as_ref())),
            truncate(self.subject(), 60),
        ]
    }
}

impl TableOutput for GitCommitRef {
    fn print_table(&self, color: bool) {
        print_header(&format!("commit {}", self.commit_id));
        if let Some(author) = &self.author {
            let who = match (&author.name, &author.email) {
                (Some(name), Some(email)) => format!("{} <{}>", name, email),
                (Some(name), None) => name.clone(),
                (None, Some(email)) => email.clone(),
                (None, None) => String::new(),
            };
            print_field("Author", &who, color);
            print_field("Date", &format_date(author.date.as_ref()), color);
        }
        if let Some(parents) = self.parents.as_ref().filter(|p| !p.is_empty()) {
            print_field("Parents", &parents.join(" "), color);
        }
        print_optional_field("Tree", self.tree_id.as_deref(), color);
        if let Some(comment) = &self.comment {
            println!();
            for line in comment.lines() {
                println!("    {}", line);
            }
        }
        if let Some(changes) = &self.changes {
            println!();
            for change in changes {
                println!("{}", change_line(change, color));
            }
        }
    }
}

impl TableOutput for GitCommitChanges {
    fn print_table(&self, color: bool) {
        if let Some(counts) = &self.change_counts {
            let summary: Vec<String> = counts.iter().map(|(k, v)| format!("{} {}", v, k)).collect();
            print_field("Changes", &summary.join(", "), color);
            println!();
        }
        for change in &self.changes {
            println!("{}", change_line(change, color));
        }
    }
}

fn change_line(change: &GitChange, color: bool) -> String {
    let kind = change.change_type.as_deref().unwrap_or("change");
    let path = change
        .item
        .as_ref()
        .and_then(|i| i.path.as_deref())
        .unwrap_or("");
    let marker = match kind.split(',').next().map(str::trim) {
        Some("add") => "A",
        Some("delete") => "D",
        Some("rename") => "R",
        _ => "M",
    };
    if !color {
        return format!("{} {}", marker, path);
    }
    let marker = match marker {
        "A" => style(marker).green(),
        "D" => style(marker).red(),
        _ => style(marker).yellow(),
    };
    format!("{} {}", marker, path)
}

impl CommitCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        match &self.command {
            CommitSubcommand::List(args) => list(&session, args, global).await,
            CommitSubcommand::View(args) => view(&session, args, global).await,
            CommitSubcommand::Changes(args) => changes(&session, args, global).await,
        }
    }
}

fn criteria(args: &ListArgs) -> GitQueryCommitsCriteria {
    GitQueryCommitsCriteria {
        item_version: args.branch.as_deref().map(GitVersionDescriptor::branch),
        author: args.author.clone(),
        item_path: args.path.clone(),
        from_date: args.since.clone(),
        to_date: args.until.clone(),
        ..Default::default()
    }
}

async fn list(session: &Session, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let criteria = criteria(args);
    let commits = session
        .client
        .get_commits(
            project.as_ref(),
            &repository,
            Some(&criteria),
            args.skip,
            Some(args.limit),
        )
        .await?;
    global.output().write_list(&commits, "No commits found")
}

async fn view(session: &Session, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let commit = session
        .client
        .get_commit(project.as_ref(), &repository, &args.commit, args.changes)
        .await?;
    global.output().write(&commit)
}

async fn changes(session: &Session, args: &ChangesArgs, global: &GlobalOptions) -> Result<()> {
    let project = session.context.project_ref();
    let repository = session.context.repo_ref()?;
    let changes = session
        .client
        .get_changes(
            project.as_ref(),
            &repository,
            &args.commit,
            args.limit,
            args.skip,
        )
        .await?;
    global.output().write(&changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::git::{GitItem, GitVersionType};

    #[test]
    fn test_criteria_from_flags() {
        let args = ListArgs {
            branch: Some("main".to_string()),
            author: None,
            path: Some("/src".to_string()),
            since: None,
            until: None,
            limit: 10,
            skip: None,
        };
        let criteria = criteria(&args);
        let version = criteria.item_version.unwrap();
        assert_eq!(version.version.as_deref(), Some("main"));
        assert_eq!(version.version_type, Some(GitVersionType::Branch));
        assert_eq!(criteria.item_path.as_deref(), Some("/src"));
        assert_eq!(criteria.author, None);
    }

    #[test]
    fn test_change_line_markers() {
        let change = GitChange {
            change_type: Some("delete, sourceRename".to_string()),
            item: Some(GitItem {
                path: Some("/old.txt".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(change_line(&change, false), "D /old.txt");
    }
}
