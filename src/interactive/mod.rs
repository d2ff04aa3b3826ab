//
//  tfgit
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Interactive Prompts
//!
//! Prompts are only shown when stdin is a terminal, `--no-prompt` is not
//! set and the config's `prompt` setting is not `disabled`. Commands check
//! [`can_prompt`] and fall back to flags otherwise.

mod prompt;

pub use prompt::*;

use std::io::IsTerminal;

/// Whether prompting is allowed.
pub fn can_prompt(no_prompt: bool, config_enabled: bool) -> bool {
    !no_prompt && config_enabled && std::io::stdin().is_terminal()
}
