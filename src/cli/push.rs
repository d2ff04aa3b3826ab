//
//  tfgit
//  cli/push.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Push commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{GlobalOptions, Session};
use crate::api::git::{full_branch_ref, short_ref_name, GitPush, GitPushSearchCriteria};
use crate::output::{format_date, print_field, print_header, truncate, TableOutput, TableRow};

/// Inspect pushes
#[derive(Args, Debug)]
pub struct PushCommand {
    #[command(subcommand)]
    pub command: PushSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PushSubcommand {
    /// List pushes, newest first
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one push
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only pushes that updated this branch
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    #[arg(long, short = 'L', default_value = "30")]
    pub limit: u32,

    #[arg(long)]
    pub skip: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Push id
    pub push_id: i32,

    /// Include up to this many commits
    #[arg(long, default_value = "10")]
    pub commits: i32,
}

impl TableRow for GitPush {
    const HEADERS: &'static [&'static str] = &["Push", "Pushed by", "Date"];

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.push_id.to_string(),
            self.pushed_by
                .as_ref()
                .map(|p| p.label().to_string())
                .unwrap_or_default(),
            format_date(self.date.as_ref()),
        ]
    }
}

impl TableOutput for GitPush {
    fn print_table(&self, color: bool) {
        print_header(&format!("Push {}", self.push_id));
        if let Some(pusher) = &self.pushed_by {
            print_field("Pushed by", pusher.label(), color);
        }
        print_field("Date", &format_date(self.date.as_ref()), color);

        if let Some(updates) = self.ref_updates.as_ref().filter(|u| !u.is_empty()) {
            println!();
            for update in updates {
                println!(
                    "{}  {} -> {}",
                    short_ref_name(&update.name),
                    update.old_object_id.get(..8).unwrap_or(&update.old_object_id),
                    update.new_object_id.get(..8).unwrap_or(&update.new_object_id),
                );
            }
        }
        if let Some(commits) = self.commits.as_ref().filter(|c| !c.is_empty()) {
            println!();
            for commit in commits {
                println!("{}  {}", commit.short_id(), truncate(commit.subject(), 70));
            }
        }
    }
}

impl PushCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let project = session.context.project_ref();
        let repository = session.context.repo_ref()?;
        let output = global.output();

        match &self.command {
            PushSubcommand::List(args) => {
                let criteria = args.branch.as_deref().map(|b| GitPushSearchCriteria {
                    ref_name: Some(full_branch_ref(b)),
                    ..Default::default()
                });
                let pushes = session
                    .client
                    .get_pushes(
                        project.as_ref(),
                        &repository,
                        args.skip,
                        Some(args.limit),
                        criteria.as_ref(),
                    )
                    .await?;
                output.write_list(&pushes, "No pushes found")
            }
            PushSubcommand::View(args) => {
                let push = session
                    .client
                    .get_push(
                        project.as_ref(),
                        &repository,
                        args.push_id,
                        Some(args.commits),
                        Some(true),
                    )
                    .await?;
                output.write(&push)
            }
        }
    }
}
