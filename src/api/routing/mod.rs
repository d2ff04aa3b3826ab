//
//  tfgit
//  api/routing/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Router
//!
//! Maps a logical operation plus an identity tuple (project, repository,
//! entity id) to a [`RequestSpec`]. The router is pure: it performs table
//! lookup and conditional filtering and never touches the network.
//!
//! - [`identity`]: [`ProjectRef`] / [`RepoRef`] tagged variants
//! - [`query`]: the ordered, presence-filtered [`QueryParams`] builder
//! - [`endpoint`]: the static [`EndpointDescriptor`] table
//! - [`request`]: [`RequestSpec`] and [`RouteValues`]
//!
//! The per-operation builders live next to their resource models in
//! [`crate::api::git`].

pub mod endpoint;
pub mod identity;
pub mod query;
pub mod request;

pub use endpoint::{EndpointDescriptor, HttpVerb, MediaType, Operation, ENDPOINTS};
pub use identity::{ProjectRef, RepoRef};
pub use query::{QueryParams, QueryValue};
pub use request::{RequestSpec, RouteValues};
