//
//  tfgit
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Keyring Storage
//!
//! Personal access tokens live in the operating system's credential store
//! (Keychain, Secret Service, Windows Credential Manager), one entry per
//! collection host under the `tfgit` service.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "tfgit";

/// Secure token storage keyed by host.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Uses a different service name, for isolating test entries.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Stores `token` for `host`, replacing any previous entry.
    pub fn store(&self, host: &str, token: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry
            .set_password(token)
            .with_context(|| format!("Failed to store credentials for {}", host))?;
        Ok(())
    }

    /// Returns the token for `host`, or `None` when nothing is stored.
    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the token for `host`. Missing entries are not an error.
    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
