//
//  tfgit
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal prompts on `dialoguer`.

use anyhow::Result;
use dialoguer::{Confirm, Editor, Input, Password};

pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}

/// Empty input yields `None`.
pub fn prompt_input_optional(message: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(input).filter(|s| !s.trim().is_empty()))
}

/// Masked input, used for tokens.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

pub fn prompt_confirm(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Opens `$TFGIT_EDITOR`, `$VISUAL` or `$EDITOR` on `initial`.
///
/// Returns `None` when the editor exits without saving.
pub fn prompt_editor(initial: &str) -> Result<Option<String>> {
    let mut editor = Editor::new();
    if let Some(command) = editor_command() {
        editor.executable(command);
    }
    Ok(editor.edit(initial)?)
}

/// The editor named by the environment, if any.
pub fn editor_command() -> Option<String> {
    ["TFGIT_EDITOR", "VISUAL", "EDITOR"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}
