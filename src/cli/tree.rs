//
//  tfgit
//  cli/tree.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{archive_name, download_spinner, write_download, GlobalOptions, Session};
use crate::api::git::{GitTreeEntryRef, GitTreeRef};
use crate::output::{format_size, print_field, print_header, TableBuilder, TableOutput};

/// Read trees by object id
#[derive(Args, Debug)]
pub struct TreeCommand {
    #[command(subcommand)]
    pub command: TreeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TreeSubcommand {
    /// List the entries of a tree
    Show(ShowArgs),

    /// Download a tree as a zip archive
    Zip(ZipArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Tree object id
    pub sha1: String,

    /// Include entries of every sub tree
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[derive(Args, Debug)]
pub struct ZipArgs {
    /// Tree object id
    pub sha1: String,

    /// Output file, or - for stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

fn entry_row(entry: &GitTreeEntryRef) -> Vec<String> {
    vec![
        entry.mode.clone().unwrap_or_default(),
        entry.git_object_type.clone().unwrap_or_default(),
        entry.object_id.get(..8).unwrap_or(&entry.object_id).to_string(),
        entry.size.map(format_size).unwrap_or_default(),
        entry.relative_path.clone(),
    ]
}

impl TableOutput for GitTreeRef {
    fn print_table(&self, color: bool) {
        print_header(&format!("tree {}", self.object_id));
        if let Some(size) = self.size {
            print_field("Size", &format_size(size), color);
        }
        println!();
        TableBuilder::new()
            .color(color)
            .headers(["Mode", "Type", "Object", "Size", "Path"])
            .rows(self.tree_entries.iter().map(entry_row))
            .print();
    }
}

impl TreeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let project = session.context.project_ref();
        let repository = session.context.repo_ref()?;
        let output = global.output();

        match &self.command {
            TreeSubcommand::Show(args) => {
                let tree = session
                    .client
                    .get_tree(
                        project.as_ref(),
                        &repository,
                        &args.sha1,
                        None,
                        args.recursive.then_some(true),
                        None,
                    )
                    .await?;
                output.write(&tree)
            }
            TreeSubcommand::Zip(args) => {
                let target = archive_name(args.output.as_ref(), &args.sha1);
                let quiet = target.as_os_str() == "-";
                let spinner = download_spinner(&format!("Downloading tree {}", args.sha1), quiet);
                let file_name = target.file_name().and_then(|n| n.to_str());
                let bytes = session
                    .client
                    .get_tree_zip(project.as_ref(), &repository, &args.sha1, None, None, file_name)
                    .await;
                spinner.finish_and_clear();
                let bytes = bytes?;
                write_download(&target, &bytes)?;
                if !quiet {
                    output.write_success(&format!("Saved {}", target.display()));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_row() {
        let entry = GitTreeEntryRef {
            object_id: "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d".to_string(),
            relative_path: "README.md".to_string(),
            mode: Some("100644".to_string()),
            git_object_type: Some("blob".to_string()),
            size: Some(2048),
            url: None,
        };
        let row = entry_row(&entry);
        assert_eq!(row[0], "100644");
        assert_eq!(row[2], "7fd1a60b");
        assert_eq!(row[4], "README.md");
    }
}
