//
//  tfgit
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! Personal access tokens are stored in the system keyring, one per host.
//! `login` also records the collection URL in the config so later commands
//! run outside a clone can find it.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use super::{build_client, GlobalOptions};
use crate::api::GitClient;
use crate::auth::{
    read_token_from_stdin, resolve_credential, validate_token, AuthCredential, KeyringStore,
};
use crate::config::{host_of, Config};
use crate::interactive::{can_prompt, prompt_input, prompt_password};
use crate::output::{print_field, TableOutput};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a personal access token for a collection
    Login(LoginArgs),

    /// Remove the stored token of a host
    Logout(LogoutArgs),

    /// Show which hosts have credentials
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the token from standard input
    #[arg(long)]
    pub with_token: bool,

    /// User name to record for the host
    #[arg(long)]
    pub user: Option<String>,

    /// Store the token without checking it against the server
    #[arg(long)]
    pub skip_check: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Host to log out of (defaults to the host of --collection)
    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Check each token against its collection
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Serialize)]
struct HostStatus {
    host: String,
    collection: Option<String>,
    user: Option<String>,
    credential: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connected: Option<bool>,
}

impl TableOutput for HostStatus {
    fn print_table(&self, color: bool) {
        let marker = match (&self.credential, self.connected) {
            (None, _) | (_, Some(false)) => style("✗").red(),
            _ => style("✓").green(),
        };
        println!("{} {}", marker, style(&self.host).bold());
        if let Some(collection) = &self.collection {
            print_field("  Collection", collection, color);
        }
        if let Some(user) = &self.user {
            print_field("  User", user, color);
        }
        print_field(
            "  Token",
            self.credential.as_deref().unwrap_or("not logged in"),
            color,
        );
        if let Some(connected) = self.connected {
            print_field("  Connection", if connected { "ok" } else { "failed" }, color);
        }
    }
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let prompt = can_prompt(global.no_prompt, config.prompts_enabled());

    let collection = match global.collection.clone() {
        Some(url) => url,
        None if prompt => prompt_input("Collection URL (https://dev.azure.com/ORG)")?,
        None => bail!("--collection is required"),
    };
    let collection = collection.trim().trim_end_matches('/').to_string();
    let host = host_of(&collection)
        .with_context(|| format!("Invalid collection URL: {}", collection))?;

    let token = if args.with_token {
        read_token_from_stdin()?
    } else if prompt {
        prompt_password("Personal access token")?
    } else {
        bail!("No token given. Use --with-token to read one from standard input.");
    };
    if !validate_token(&token) {
        bail!("Invalid token format");
    }

    if !args.skip_check {
        let client = GitClient::builder(&collection)?
            .with_auth(AuthCredential::pat(token.clone()))
            .build()?;
        let accepted = client
            .check_connection()
            .await
            .with_context(|| format!("Could not verify the token for {}", collection))?;
        if !accepted {
            bail!("The server did not accept the token for {}", collection);
        }
    }

    KeyringStore::new().store(&host, &token)?;

    config.set(&format!("hosts.{}.url", host), &collection)?;
    if let Some(user) = &args.user {
        config.set(&format!("hosts.{}.user", host), user)?;
    }
    config.save()?;

    global
        .output()
        .write_success(&format!("Logged in to {}", collection));
    Ok(())
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let host = match (&args.host, &global.collection) {
        (Some(host), _) => crate::config::normalize_host(host),
        (None, Some(collection)) => host_of(collection)
            .with_context(|| format!("Invalid collection URL: {}", collection))?,
        (None, None) => match config.default_collection().and_then(host_of) {
            Some(host) => host,
            None => bail!("Specify the host with --host"),
        },
    };

    let keyring = KeyringStore::new();
    if keyring.get(&host)?.is_none() {
        bail!("Not logged in to {}", host);
    }
    keyring.delete(&host)?;
    global
        .output()
        .write_success(&format!("Logged out of {}", host));
    Ok(())
}

async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let keyring = KeyringStore::new();

    let mut hosts: Vec<(String, Option<String>)> = config
        .hosts
        .iter()
        .map(|(host, cfg)| (host.clone(), cfg.url.clone()))
        .collect();
    if let Some(collection) = &global.collection {
        if let Some(host) = host_of(collection) {
            if !hosts.iter().any(|(h, _)| *h == host) {
                hosts.push((host, Some(collection.clone())));
            }
        }
    }
    if hosts.is_empty() {
        bail!("No hosts configured. Run 'tfgit auth login --collection URL'.");
    }

    let mut statuses = Vec::with_capacity(hosts.len());
    for (host, collection) in hosts {
        let credential = resolve_credential(&host, &keyring)?;
        let connected = match (&credential, &collection, args.check) {
            (Some(_), Some(url), true) => Some(check(&config, url).await),
            _ => None,
        };
        statuses.push(HostStatus {
            user: config.host_config(&host).and_then(|c| c.user.clone()),
            host,
            collection,
            credential: credential.map(|(c, source)| format!("{} from {}", c.kind(), source)),
            connected,
        });
    }

    let output = global.output();
    if output.is_json() {
        return crate::output::write_json(&statuses);
    }
    for status in &statuses {
        output.write(status)?;
    }
    Ok(())
}

async fn check(config: &Config, collection: &str) -> bool {
    let client = match build_client(config, collection) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("{}: {:#}", collection, e);
            return false;
        }
    };
    match client.check_connection().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("{}: {}", collection, e);
            false
        }
    }
}
