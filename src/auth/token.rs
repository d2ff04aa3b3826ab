//
//  tfgit
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Token input helpers.

use std::io::{self, BufRead};

use anyhow::Result;

/// Reads a token from the first line of standard input.
///
/// Used by `tfgit auth login --with-token < token.txt`.
pub fn read_token_from_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Checks that a token is plausible before it is stored: non-empty and
/// free of whitespace.
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert!(validate_token("52gqpxhbcr4w6wcyb5nzjxqm2q"));
        assert!(!validate_token(""));
        assert!(!validate_token("has space"));
        assert!(!validate_token("trailing\n"));
    }
}
