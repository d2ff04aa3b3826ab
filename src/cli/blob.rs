//
//  tfgit
//  cli/blob.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{archive_name, download_spinner, write_download, GlobalOptions, Session};
use crate::api::git::GitBlobRef;
use crate::output::{format_size, print_field, print_header, print_optional_field, TableOutput};

/// Read blobs by object id
#[derive(Args, Debug)]
pub struct BlobCommand {
    #[command(subcommand)]
    pub command: BlobSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BlobSubcommand {
    /// Show blob metadata
    Show(ShowArgs),

    /// Write a blob's content
    Cat(CatArgs),

    /// Download one or more blobs as a zip archive
    Zip(ZipArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Blob object id
    pub sha1: String,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// Blob object id
    pub sha1: String,

    /// Output file (defaults to stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ZipArgs {
    /// Blob object ids
    #[arg(required = true)]
    pub sha1s: Vec<String>,

    /// Output file, or - for stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl TableOutput for GitBlobRef {
    fn print_table(&self, color: bool) {
        print_header(&format!("blob {}", self.object_id));
        if let Some(size) = self.size {
            print_field("Size", &format_size(size), color);
        }
        print_optional_field("URL", self.url.as_deref(), color);
    }
}

fn zip_stem(ids: &[String]) -> &str {
    match ids {
        [single] => single.as_str(),
        _ => "blobs",
    }
}

impl BlobCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let project = session.context.project_ref();
        let repository = session.context.repo_ref()?;
        let client = &session.client;
        let output = global.output();

        match &self.command {
            BlobSubcommand::Show(args) => {
                let blob = client
                    .get_blob(project.as_ref(), &repository, &args.sha1, None, None)
                    .await?;
                output.write(&blob)
            }
            BlobSubcommand::Cat(args) => {
                let bytes = client
                    .get_blob_content(project.as_ref(), &repository, &args.sha1, None, None)
                    .await?;
                let target = args.output.as_deref().unwrap_or(Path::new("-"));
                write_download(target, &bytes)
            }
            BlobSubcommand::Zip(args) => {
                let target = archive_name(args.output.as_ref(), zip_stem(&args.sha1s));
                let quiet = target.as_os_str() == "-";
                let spinner = download_spinner(
                    &format!("Downloading {} blob(s)", args.sha1s.len()),
                    quiet,
                );
                let file_name = target.file_name().and_then(|n| n.to_str());
                let bytes = match args.sha1s.as_slice() {
                    [single] => {
                        client
                            .get_blob_zip(project.as_ref(), &repository, single, Some(true), file_name)
                            .await
                    }
                    ids => {
                        client
                            .get_blobs_zip(project.as_ref(), &repository, ids, file_name)
                            .await
                    }
                };
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
