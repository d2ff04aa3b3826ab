//
//  tfgit
//  cli/item.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File and folder commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use super::{archive_name, download_spinner, write_download, GlobalOptions, Session};
use crate::api::git::{
    GitItem, GitItemDescriptor, GitItemRequestData, GitVersionDescriptor, ItemOptions,
    VersionControlRecursionType,
};
use crate::output::{print_field, print_header, print_optional_field, TableOutput, TableRow};

/// Read files and folders at a version
#[derive(Args, Debug)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub command: ItemSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ItemSubcommand {
    /// Show metadata of a file or folder
    Show(ShowArgs),

    /// Print a file
    Cat(CatArgs),

    /// List a folder
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Download a folder as a zip archive
    Zip(ZipArgs),
}

/// Selects the version to read; the default branch when none is given.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct VersionArgs {
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, short = 'c')]
    pub commit: Option<String>,
}

impl VersionArgs {
    pub fn descriptor(&self) -> Option<GitVersionDescriptor> {
        if let Some(branch) = &self.branch {
            Some(GitVersionDescriptor::branch(branch.as_str()))
        } else if let Some(tag) = &self.tag {
            Some(GitVersionDescriptor::tag(tag.as_str()))
        } else {
            self.commit.as_deref().map(GitVersionDescriptor::commit)
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path inside the repository
    pub path: String,

    #[command(flatten)]
    pub version: VersionArgs,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// Path inside the repository
    pub path: String,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Write the raw bytes to a file instead of printing text
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Folders to list (defaults to the root)
    pub paths: Vec<String>,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Descend into sub folders
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[derive(Args, Debug)]
pub struct ZipArgs {
    /// Folder to archive (defaults to the root)
    #[arg(default_value = "/")]
    pub path: String,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Output file, or - for stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl TableRow for GitItem {
    const HEADERS: &'static [&'static str] = &["Type", "Path", "Object"];

    fn row(&self, color: bool) -> Vec<String> {
        let kind = if self.is_folder() { "dir" } else { "file" };
        let path = self.path.clone().unwrap_or_default();
        vec![
            kind.to_string(),
            if color && self.is_folder() {
                style(path).blue().to_string()
            } else {
                path
            },
            self.object_id
                .as_deref()
                .map(|id| id.get(..8).unwrap_or(id).to_string())
                .unwrap_or_default(),
        ]
    }
}

impl TableOutput for GitItem {
    fn print_table(&self, color: bool) {
        print_header(self.path.as_deref().unwrap_or("/"));
        print_field("Type", if self.is_folder() { "folder" } else { "file" }, color);
        print_optional_field("Object", self.object_id.as_deref(), color);
        print_optional_field("Commit", self.commit_id.as_deref(), color);
        if let Some(meta) = &self.content_metadata {
            print_optional_field("Content type", meta.content_type.as_deref(), color);
            if let Some(binary) = meta.is_binary {
                print_field("Binary", if binary { "yes" } else { "no" }, color);
            }
        }
        if let Some(change) = &self.latest_processed_change {
            print_field(
                "Last change",
                &format!("{} {}", change.short_id(), change.subject()),
                color,
            );
        }
    }
}

fn list_options(scope: &str, args: &ListArgs) -> ItemOptions {
    let level = if args.recursive {
        VersionControlRecursionType::Full
    } else {
        VersionControlRecursionType::OneLevel
    };
    ItemOptions {
        scope_path: Some(scope.to_string()),
        recursion_level: Some(level),
        version: args.version.descriptor(),
        ..Default::default()
    }
}

fn batch_request(args: &ListArgs) -> GitItemRequestData {
    let version = args.version.descriptor().unwrap_or_default();
    let level = if args.recursive {
        VersionControlRecursionType::Full
    } else {
        VersionControlRecursionType::OneLevel
    };
    GitItemRequestData {
        item_descriptors: args
            .paths
            .iter()
            .map(|path| GitItemDescriptor {
                path: path.clone(),
                recursion_level: Some(level),
                version: version.version.clone(),
                version_type: version.version_type,
                version_options: version.version_options,
            })
            .collect(),
        ..Default::default()
    }
}

impl ItemCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let project = session.context.project_ref();
        let repository = session.context.repo_ref()?;
        let client = &session.client;
        let output = global.output();

        match &self.command {
            ItemSubcommand::Show(args) => {
                let mut options = ItemOptions::path(args.path.as_str());
                options.version = args.version.descriptor();
                options.include_content_metadata = Some(true);
                options.latest_processed_change = Some(true);
                let item = client.get_item(project.as_ref(), &repository, &options).await?;
                output.write(&item)
            }
            ItemSubcommand::Cat(args) => {
                let mut options = ItemOptions::path(args.path.as_str());
                options.version = args.version.descriptor();
                match &args.output {
                    Some(path) => {
                        let bytes = client
                            .get_item_content(project.as_ref(), &repository, &options)
                            .await?;
                        write_download(path, &bytes)
                    }
                    None => {
                        let text = client
                            .get_item_text(project.as_ref(), &repository, &options)
                            .await?;
                        print!("{}", text);
                        Ok(())
                    }
                }
            }
            ItemSubcommand::List(args) => {
                let items = match args.paths.as_slice() {
                    [] => {
                        client
                            .get_items(project.as_ref(), &repository, &list_options("/", args), None)
                            .await?
                    }
                    [single] => {
                        client
                            .get_items(project.as_ref(), &repository, &list_options(single, args), None)
                            .await?
                    }
                    _ => client
                        .get_items_batch(project.as_ref(), &repository, &batch_request(args))
                        .await?
                        .into_iter()
                        .flatten()
                        .collect(),
                };
                output.write_list(&items, "No items found")
            }
            ItemSubcommand::Zip(args) => {
                let target = archive_name(args.output.as_ref(), &args.path);
                let quiet = target.as_os_str() == "-";
                let spinner = download_spinner(&format!("Downloading {}", args.path), quiet);
                let options = ItemOptions {
                    path: Some(args.path.clone()),
                    version: args.version.descriptor(),
                    ..Default::default()
                };
                let bytes = client.get_item_zip(project.as_ref(), &repository, &options).await;
                spinner.finish_and_clear();
                let bytes = bytes?;
                write_download(&target, &bytes)?;
                if !quiet {
                    output.write_success(&format!(
                        "Saved {} ({} bytes)",
                        target.display(),
                        bytes.len()
                    ));
                }
                Ok(())
            }
        }
    }
}
