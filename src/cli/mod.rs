//
//  tfgit
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod blob;
mod commit;
mod completion;
mod config;
mod item;
mod pr;
mod push;
mod refs;
mod repo;
mod tree;

pub use auth::AuthCommand;
pub use blob::BlobCommand;
pub use commit::CommitCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use item::ItemCommand;
pub use pr::PrCommand;
pub use push::PushCommand;
pub use refs::RefCommand;
pub use repo::RepoCommand;
pub use tree::TreeCommand;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::GitClient;
use crate::auth::{resolve_credential, KeyringStore};
use crate::config::{host_of, Config};
use crate::context::{ContextResolver, RepoContext};
use crate::interactive;
use crate::output::{OutputFormat, OutputWriter};

/// Work with Git repositories on Azure DevOps and Team Foundation Server
#[derive(Parser, Debug)]
#[command(
    name = "tfgit",
    version,
    about = "Work with Git repositories on Azure DevOps and Team Foundation Server",
    long_about = "tfgit drives the Git REST API of Azure DevOps Services and on-premises \
                  Team Foundation Server collections.\n\n\
                  Repositories, refs, commits, pushes, pull requests and file content \
                  are available without a local clone.",
    propagate_version = true,
    after_help = "Use 'tfgit <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Collection URL (https://dev.azure.com/ORG or https://HOST/tfs/COLLECTION)
    #[arg(long, global = true, env = "TFGIT_COLLECTION")]
    pub collection: Option<String>,

    /// Project name or id
    #[arg(long, short = 'p', global = true, env = "TFGIT_PROJECT")]
    pub project: Option<String>,

    /// Repository name or id
    #[arg(long, short = 'R', global = true, env = "TFGIT_REPO")]
    pub repo: Option<String>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Never prompt; fail when input is missing
    #[arg(long, global = true, env = "TFGIT_NO_PROMPT")]
    pub no_prompt: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(OutputFormat::from_json_flag(self.json))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with a collection
    Auth(AuthCommand),

    /// Manage repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage branches and tags
    Ref(RefCommand),

    /// Inspect commits
    Commit(CommitCommand),

    /// Inspect pushes
    Push(PushCommand),

    /// Work with pull requests
    Pr(PrCommand),

    /// Read files and folders at a version
    Item(ItemCommand),

    /// Read trees by object id
    Tree(TreeCommand),

    /// Read blobs by object id
    Blob(BlobCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print the version
    Version,
}

/// The user declined a confirmation.
#[derive(Debug, thiserror::Error)]
#[error("Operation cancelled")]
pub struct Cancelled;

/// Everything a remote command needs: config, target and an
/// authenticated client.
pub(crate) struct Session {
    pub config: Config,
    pub context: RepoContext,
    pub client: GitClient,
}

impl Session {
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let context = ContextResolver::new(config.clone()).resolve(global)?;
        let client = build_client(&config, &context.collection_url)?;
        tracing::debug!("Target {} ({})", context.full_name(), context.collection_url);
        Ok(Self {
            config,
            context,
            client,
        })
    }

    pub fn can_prompt(&self, global: &GlobalOptions) -> bool {
        interactive::can_prompt(global.no_prompt, self.config.prompts_enabled())
    }

    /// Asks for confirmation unless `yes`; returns [`Cancelled`] on refusal.
    pub fn confirm(&self, global: &GlobalOptions, yes: bool, message: &str) -> Result<()> {
        if yes {
            return Ok(());
        }
        if !self.can_prompt(global) {
            anyhow::bail!("Refusing to continue without confirmation. Pass --yes.");
        }
        if interactive::prompt_confirm(message, false)? {
            Ok(())
        } else {
            Err(Cancelled.into())
        }
    }
}

/// Builds a client for `collection_url` from config and stored credentials.
pub(crate) fn build_client(config: &Config, collection_url: &str) -> Result<GitClient> {
    let host = host_of(collection_url)
        .with_context(|| format!("Invalid collection URL: {}", collection_url))?;
    let (credential, source) = resolve_credential(&host, &KeyringStore::new())?.ok_or_else(|| {
        anyhow::anyhow!(
            "Not authenticated for {}. Run 'tfgit auth login' or set TFGIT_TOKEN.",
            host
        )
    })?;
    tracing::debug!("Using {} credential from {}", credential.kind(), source);

    let api_version = match config.host_config(&host) {
        Some(host_config) => host_config.api_version()?,
        None => None,
    };

    let client = GitClient::builder(collection_url)?
        .with_auth(credential)
        .method_override(config.method_override())
        .location_discovery(config.core.location_discovery)
        .api_version(api_version)
        .build()?;
    Ok(client)
}

/// Spinner shown while an archive or file downloads.
pub(crate) fn download_spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Writes downloaded bytes to `output`, or to stdout when it is `-`.
pub(crate) fn write_download(output: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    if output == Path::new("-") {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(bytes)?;
        handle.flush()?;
        return Ok(());
    }
    std::fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))
}

/// Default archive file name for a downloaded path or object.
pub(crate) fn archive_name(output: Option<&PathBuf>, stem: &str) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => {
            let stem = stem.trim_matches('/').replace('/', "_");
            let stem = if stem.is_empty() { "root" } else { stem.as_str() };
            PathBuf::from(format!("{}.zip", stem))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tfgit",
            "repo",
            "list",
            "--collection",
            "https://dev.azure.com/fabrikam",
            "-p",
            "Fiber",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            cli.global.collection.as_deref(),
            Some("https://dev.azure.com/fabrikam")
        );
        assert_eq!(cli.global.project.as_deref(), Some("Fiber"));
        assert!(cli.global.json);
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name(None, "/src/lib"), PathBuf::from("src_lib.zip"));
        assert_eq!(archive_name(None, "/"), PathBuf::from("root.zip"));
        let explicit = PathBuf::from("out.zip");
        assert_eq!(archive_name(Some(&explicit), "/src"), explicit);
    }
}
