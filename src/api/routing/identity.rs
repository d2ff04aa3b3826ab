//
//  tfgit
//  api/routing/identity.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Identity
//!
//! Projects and repositories on the service can be addressed either by their
//! textual name or by their opaque unique identifier. Both forms are accepted
//! everywhere and render to the same route value, so a caller can pass
//! whichever it has at hand.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tfgit::api::routing::{ProjectRef, RepoRef};
//!
//! let project: ProjectRef = "Fabrikam".into();
//! let repo = RepoRef::parse("3411ebc1-d5aa-464f-9615-0b527bc66719");
//! assert!(repo.is_id());
//! ```

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::api::common::ApiError;

/// A reference to a team project, by name or by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectRef {
    /// The project's display name (e.g. `"Fabrikam"`).
    Name(String),
    /// The project's unique identifier.
    Id(Uuid),
}

/// A reference to a Git repository, by name or by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoRef {
    /// The repository's name within its project.
    Name(String),
    /// The repository's unique identifier.
    Id(Uuid),
}

macro_rules! identity_ref {
    ($ty:ident, $label:literal) => {
        impl $ty {
            /// Parses a textual identity, treating anything that looks like a
            /// UUID as an id and everything else as a name.
            pub fn parse(value: &str) -> Self {
                match Uuid::parse_str(value) {
                    Ok(id) => Self::Id(id),
                    Err(_) => Self::Name(value.to_string()),
                }
            }

            /// Returns `true` when this reference is an opaque id.
            pub fn is_id(&self) -> bool {
                matches!(self, Self::Id(_))
            }

            /// Renders the reference the way it appears in a URL route.
            pub fn route_value(&self) -> String {
                match self {
                    Self::Name(name) => name.clone(),
                    Self::Id(id) => id.hyphenated().to_string(),
                }
            }

            /// Rejects identities that can never address a resource: an
            /// empty name or the nil UUID.
            pub fn validate(&self) -> Result<(), ApiError> {
                match self {
                    Self::Name(name) if name.trim().is_empty() => Err(ApiError::InvalidIdentity(
                        concat!($label, " name must not be empty").to_string(),
                    )),
                    Self::Id(id) if id.is_nil() => Err(ApiError::InvalidIdentity(
                        concat!($label, " id must not be the nil UUID").to_string(),
                    )),
                    _ => Ok(()),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.route_value())
            }
        }

        impl FromStr for $ty {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self::Name(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self::Name(value)
            }
        }

        impl From<Uuid> for $ty {
            fn from(value: Uuid) -> Self {
                Self::Id(value)
            }
        }
    };
}

identity_ref!(ProjectRef, "project");
identity_ref!(RepoRef, "repository");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detects_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(RepoRef::parse(&id.to_string()), RepoRef::Id(id));
        assert_eq!(RepoRef::parse("widgets"), RepoRef::Name("widgets".to_string()));
    }

    #[test]
    fn test_route_value_is_lowercase_hyphenated() {
        let id = Uuid::parse_str("3411EBC1-D5AA-464F-9615-0B527BC66719").unwrap();
        assert_eq!(
            ProjectRef::Id(id).route_value(),
            "3411ebc1-d5aa-464f-9615-0b527bc66719"
        );
    }

    #[test]
    fn test_validate_rejects_empty_and_nil() {
        assert!(ProjectRef::from("").validate().is_err());
        assert!(RepoRef::from("  ").validate().is_err());
        assert!(RepoRef::Id(Uuid::nil()).validate().is_err());
        assert!(RepoRef::from("widgets").validate().is_ok());
    }
}
