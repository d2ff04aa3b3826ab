//
//  tfgit
//  api/routing/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Specifications
//!
//! A [`RequestSpec`] is the transient value handed to a transport: the
//! endpoint descriptor, the resolved route values, the query parameters and
//! an optional JSON body. It is built per call and discarded afterwards.
//!
//! Two specs built from equivalent identities compare equal, whatever
//! spelling the caller used, so the router can be tested without a network.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::endpoint::{EndpointDescriptor, Operation};
use super::identity::{ProjectRef, RepoRef};
use super::query::QueryParams;
use crate::api::common::ApiError;

/// Values substituted into the route template, keyed by placeholder name.
///
/// Only non-empty values are stored; the order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: BTreeMap<&'static str, String>,
}

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key` unless it is empty.
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fully routed logical request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub endpoint: &'static EndpointDescriptor,
    pub route_values: RouteValues,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Starts a spec for `operation` with no route values.
    pub fn new(operation: Operation) -> Self {
        Self {
            endpoint: operation.descriptor(),
            route_values: RouteValues::new(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Starts a spec scoped to an optional project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidIdentity`] for an empty project name or a
    /// nil project id.
    pub fn for_project(operation: Operation, project: Option<&ProjectRef>) -> Result<Self, ApiError> {
        let mut spec = Self::new(operation);
        if let Some(project) = project {
            project.validate()?;
            spec.route_values.insert("project", project.route_value());
        }
        Ok(spec)
    }

    /// Starts a spec scoped to a repository, optionally inside a project.
    ///
    /// A missing project is legal: the service resolves the repository's
    /// project itself when the repository is given by id, and the collection
    /// default otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidIdentity`] when either identity is
    /// structurally impossible.
    pub fn for_repository(
        operation: Operation,
        project: Option<&ProjectRef>,
        repository: &RepoRef,
    ) -> Result<Self, ApiError> {
        repository.validate()?;
        let mut spec = Self::for_project(operation, project)?;
        spec.route_values
            .insert("repositoryId", repository.route_value());
        Ok(spec)
    }

    /// Adds a route value; empty values are ignored.
    pub fn route(mut self, key: &'static str, value: impl ToString) -> Self {
        self.route_values.insert(key, value.to_string());
        self
    }

    /// Replaces the query parameters.
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Serializes `body` as the JSON request payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body cannot be serialized.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn operation(&self) -> Operation {
        self.endpoint.operation
    }
}
