//
//  tfgit
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # tfgit
//!
//! A client for the Git REST API of Azure DevOps Services and on-premises
//! Team Foundation Server collections, plus the `tfgit` command line tool
//! built on it.
//!
//! ## Module Structure
//!
//! - [`api`]: routing, transport and the typed [`GitClient`](api::GitClient)
//! - [`auth`]: personal access tokens and keyring storage
//! - [`config`]: the TOML configuration file
//! - [`context`]: resolving collection, project and repository from flags,
//!   the git remote and config
//! - [`cli`]: command definitions
//! - [`output`]: table and JSON output
//! - [`interactive`]: terminal prompts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tfgit::api::{GitClient, RepoRef};
//!
//! # async fn demo() -> Result<(), tfgit::api::ApiError> {
//! let client = GitClient::builder("https://dev.azure.com/fabrikam")?
//!     .with_auth(tfgit::auth::AuthCredential::pat("token"))
//!     .build()?;
//! let repo = client
//!     .get_repository(Some(&"Fabrikam-Fiber".into()), &RepoRef::from("widgets"))
//!     .await?;
//! println!("{}", repo.name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Hosted and On-Premises Collections
//!
//! | | Azure DevOps Services | Team Foundation Server |
//! |---|---|---|
//! | Collection URL | `https://dev.azure.com/ORG` | `https://HOST/tfs/COLLECTION` |
//! | Location discovery | optional | recommended |
//! | Method override | accepted | required by some proxies |

/// Command-line interface definitions.
pub mod cli;

/// Routing, transport and the typed Git client.
pub mod api;

/// Credentials and their storage.
pub mod auth;

/// Configuration file management.
///
/// - Linux: `~/.config/tfgit/config.toml`
/// - macOS: `~/Library/Application Support/tfgit/config.toml`
/// - Windows: `%APPDATA%\tfgit\config.toml`
pub mod config;

/// Resolves which collection, project and repository a command targets.
pub mod context;

/// Table and JSON output.
pub mod output;

/// Interactive prompts.
pub mod interactive;

pub use cli::Cli;
pub use config::Config;
pub use context::RepoContext;

/// Name of the binary, also used for the config directory.
pub const APP_NAME: &str = "tfgit";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes.
///
/// - `0`: success
/// - `1-3`: general errors and usage
/// - `4-7`: authentication
/// - `8-15`: missing resources
/// - `16-31`: cancelled operations
/// - `32+`: service throttling
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;

    pub const ERROR: i32 = 1;

    /// Invalid arguments; clap exits with this itself.
    pub const USAGE: i32 = 2;

    /// Missing or rejected credentials. Run `tfgit auth login`.
    pub const AUTH_ERROR: i32 = 4;

    pub const NOT_FOUND: i32 = 8;

    /// A confirmation was declined.
    pub const CANCELLED: i32 = 16;

    pub const RATE_LIMIT: i32 = 32;
}
