//
//  tfgit
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials for a collection host and the request decoration they imply.
//!
//! ## Supported Authentication Methods
//!
//! - **Personal Access Token (PAT)**: the primary method. Sent as HTTP Basic
//!   authentication with an empty user name, which both the hosted service
//!   and on-premises servers accept.
//! - **Bearer token**: an OAuth / Entra access token obtained elsewhere.
//! - **Basic Authentication**: user name and password, for on-premises
//!   servers with basic auth enabled.
//!
//! ## Module Structure
//!
//! - [`keyring`]: Secure credential storage using the system keyring
//! - [`token`]: Token input and format validation
//!
//! ## Resolution Order
//!
//! [`resolve_credential`] checks the `TFGIT_TOKEN` environment variable
//! first, then the keyring entry stored for the host.

mod keyring;
mod token;

pub use keyring::*;
pub use token::*;

use anyhow::Result;
use reqwest::RequestBuilder;

/// Environment variable that overrides any stored token.
pub const TOKEN_ENV: &str = "TFGIT_TOKEN";

/// Credentials used to authenticate REST requests.
///
/// # Example
///
/// ```rust,ignore
/// use tfgit::auth::AuthCredential;
///
/// let credential = AuthCredential::pat("52gqp...");
/// let request = credential.apply_to_request(client.get(url));
/// ```
#[derive(Clone)]
pub enum AuthCredential {
    /// Personal access token, sent as basic auth with an empty user.
    PersonalAccessToken { token: String },
    /// An OAuth access token.
    Bearer { token: String },
    /// User name and password.
    Basic { username: String, password: String },
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PersonalAccessToken { .. } => "PersonalAccessToken(***)",
            Self::Bearer { .. } => "Bearer(***)",
            Self::Basic { .. } => "Basic(***)",
        })
    }
}

impl AuthCredential {
    pub fn pat(token: impl Into<String>) -> Self {
        Self::PersonalAccessToken {
            token: token.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Applies the credential to an HTTP request.
    ///
    /// # Parameters
    ///
    /// - `request`: The [`RequestBuilder`] to add authentication headers to.
    ///
    /// # Returns
    ///
    /// The request with an `Authorization` header.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::PersonalAccessToken { token } => request.basic_auth("", Some(token)),
            Self::Bearer { token } => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    /// A short label for status output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PersonalAccessToken { .. } => "personal access token",
            Self::Bearer { .. } => "bearer token",
            Self::Basic { .. } => "basic",
        }
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keyring,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "{}", TOKEN_ENV),
            Self::Keyring => f.write_str("system keyring"),
        }
    }
}

/// Finds the credential for `host`.
///
/// # Returns
///
/// `Ok(None)` when neither the environment nor the keyring has one.
pub fn resolve_credential(
    host: &str,
    store: &KeyringStore,
) -> Result<Option<(AuthCredential, CredentialSource)>> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Ok(Some((AuthCredential::pat(token), CredentialSource::Environment)));
        }
    }

    Ok(store
        .get(host)?
        .map(|token| (AuthCredential::pat(token), CredentialSource::Keyring)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pat_is_sent_as_basic_with_empty_user() {
        let client = reqwest::Client::new();
        let request = AuthCredential::pat("secret")
            .apply_to_request(client.get("https://dev.azure.com/fabrikam/_apis"))
            .build()
            .unwrap();
        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        // base64(":secret")
        assert_eq!(header, "Basic OnNlY3JldA==");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", AuthCredential::bearer("top-secret"));
        assert!(!rendered.contains("top-secret"));
    }
}
