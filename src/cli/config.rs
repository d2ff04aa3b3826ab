//
//  tfgit
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration commands.
//!
//! Core keys are addressed by bare name; host keys as
//! `hosts.<host>.<field>`. `--host` is shorthand for the latter, so
//! `tfgit config set --host dev.azure.com user ada` and
//! `tfgit config set hosts.dev.azure.com.user ada` are equivalent.

use std::process::Command;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::GlobalOptions;
use crate::config::{normalize_host, Config};
use crate::interactive::editor_command;
use crate::output::write_json;

/// Manage configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a value
    Get(KeyArgs),

    /// Set a value
    Set(SetArgs),

    /// Reset a value to its default
    Unset(KeyArgs),

    /// List every set value
    #[command(visible_alias = "ls")]
    List,

    /// Open the config file in an editor
    Edit,

    /// Print the config file path
    Path,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    pub key: String,

    /// Host the key belongs to
    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub key: String,

    pub value: String,

    /// Host the key belongs to
    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

/// Expands `key` to its `hosts.<host>.<field>` form when `host` is given.
fn qualified_key(key: &str, host: Option<&str>) -> String {
    match host {
        Some(host) => format!("hosts.{}.{}", normalize_host(host), key),
        None => key.to_string(),
    }
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let output = global.output();
        match &self.command {
            ConfigSubcommand::Get(args) => {
                let key = qualified_key(&args.key, args.host.as_deref());
                let value = Config::load()?.get(&key);
                if output.is_json() {
                    write_json(&serde_json::json!({ "key": key, "value": value }))
                } else {
                    if let Some(value) = value {
                        println!("{}", value);
                    }
                    Ok(())
                }
            }
            ConfigSubcommand::Set(args) => {
                let key = qualified_key(&args.key, args.host.as_deref());
                let mut config = Config::load()?;
                config.set(&key, &args.value)?;
                config.save()?;
                tracing::debug!("Set {} in {}", key, Config::config_path()?.display());
                if output.is_json() {
                    return write_json(&serde_json::json!({ "key": key, "value": args.value }));
                }
                output.write_success(&format!("Set {} = {}", style(&key).cyan(), args.value));
                Ok(())
            }
            ConfigSubcommand::Unset(args) => {
                let key = qualified_key(&args.key, args.host.as_deref());
                let mut config = Config::load()?;
                config.unset(&key)?;
                config.save()?;
                output.write_success(&format!("Unset {}", style(&key).cyan()));
                Ok(())
            }
            ConfigSubcommand::List => {
                let entries = Config::load()?.entries();
                if output.is_json() {
                    let map: serde_json::Map<String, serde_json::Value> = entries
                        .into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect();
                    return write_json(&map);
                }
                for (key, value) in entries {
                    println!("{} = {}", style(key).cyan(), value);
                }
                Ok(())
            }
            ConfigSubcommand::Edit => edit(),
            ConfigSubcommand::Path => {
                let path = Config::config_path()?;
                if output.is_json() {
                    return write_json(&serde_json::json!({
                        "path": path.display().to_string(),
                        "exists": path.exists(),
                    }));
                }
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

fn edit() -> Result<()> {
    let path = Config::config_path()?;
    if !path.exists() {
        Config::default().save_to(&path)?;
    }

    let editor = editor_command().unwrap_or_else(|| {
        if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });
    // Editors such as "code --wait" carry their own arguments.
    let parts: Vec<&str> = editor.split_whitespace().collect();
    let Some((program, args)) = parts.split_first() else {
        bail!("Invalid editor command: {:?}", editor);
    };
    let status = Command::new(program).args(args).arg(&path).status()?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }

    // Catch syntax errors before the next command trips over them.
    Config::load_from(&path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_key() {
        assert_eq!(qualified_key("prompt", None), "prompt");
        assert_eq!(
            qualified_key("default_project", Some("Dev.Azure.com")),
            "hosts.dev.azure.com.default_project"
        );
    }
}
