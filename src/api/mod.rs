//
//  tfgit
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Typed access to the Git REST resources of a Team Foundation style
//! collection (`https://dev.azure.com/{org}` or `https://host/tfs/{collection}`).
//!
//! ## Architecture
//!
//! - [`routing`]: operation table, identities and query building. Pure.
//! - [`git`]: resource models and one `*_request` builder per operation,
//!   plus the matching async [`GitClient`] method.
//! - [`transport`]: turns a [`RequestSpec`](routing::RequestSpec) into an
//!   HTTP exchange and classifies failures.
//! - [`locations`]: location discovery and API version negotiation.
//! - [`client`]: the client and its builder.
//! - [`common`]: errors, identities, list envelopes.
//!
//! ## Error Handling
//!
//! Every operation returns `Result<T, ApiError>`:
//!
//! | Status | Variant |
//! |--------|---------|
//! | 400 | `BadRequest` |
//! | 401 | `Unauthorized` |
//! | 403 | `Forbidden` |
//! | 404 | `NotFound` |
//! | 409 | `Conflict` |
//! | 429 | `RateLimited` |
//! | 5xx | `Server` |
//!
//! A server exception whose type key is in the client's translation table
//! wins over the status mapping.

pub mod client;
pub mod common;
pub mod git;
pub mod locations;
pub mod routing;
pub mod transport;

pub use client::{GitClient, GitClientBuilder};
pub use common::{ApiError, ErrorKind, ErrorTranslations, IdentityRef};
pub use locations::{ApiResourceVersion, ApiVersion};
pub use routing::{Operation, ProjectRef, RepoRef, RequestSpec};
pub use transport::{HttpTransport, Transport, TransportOptions};
