//
//  tfgit
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git REST Client
//!
//! [`GitClient`] is the entry point of the library. Each logical operation is
//! an async method (defined next to its models in [`crate::api::git`]) that
//! routes a [`RequestSpec`] and hands it to a [`Transport`].
//!
//! ## Features
//!
//! - Builder-style construction with authentication
//! - Per-client error translation table
//! - Optional location discovery and version negotiation
//! - Custom User-Agent header
//!
//! ## Example
//!
//! ```rust,ignore
//! use tfgit::api::GitClient;
//! use tfgit::auth::AuthCredential;
//!
//! let client = GitClient::builder("https://dev.azure.com/fabrikam")?
//!     .with_auth(AuthCredential::pat("52gqp..."))
//!     .build()?;
//! let repos = client.get_repositories(None, None).await?;
//! ```

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::common::{ApiError, ErrorTranslations, ListResponse};
use super::locations::ApiResourceVersion;
use super::routing::RequestSpec;
use super::transport::{HttpTransport, Transport, TransportOptions, TransportResponse};
use crate::auth::AuthCredential;

/// The Git REST client.
///
/// Cheap to clone; clones share the transport and its connection pool.
#[derive(Clone)]
pub struct GitClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for GitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitClient").finish_non_exhaustive()
    }
}

impl GitClient {
    /// Wraps an existing transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Starts building an HTTP client for the collection at `collection_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if the URL does not parse.
    pub fn builder(collection_url: &str) -> Result<GitClientBuilder, ApiError> {
        GitClientBuilder::new(collection_url)
    }

    /// Returns `true` when the collection is reachable with the configured
    /// credentials.
    pub async fn check_connection(&self) -> Result<bool, ApiError> {
        self.transport.check_connection().await
    }

    pub(crate) async fn send(&self, spec: RequestSpec) -> Result<TransportResponse, ApiError> {
        self.transport.execute(&spec).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ApiError> {
        self.send(spec).await?.json()
    }

    /// Sends a request whose response is a `{count, value}` envelope.
    pub(crate) async fn send_list<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<Vec<T>, ApiError> {
        let list: ListResponse<T> = self.send_json(spec).await?;
        Ok(list.into_vec())
    }

    pub(crate) async fn send_bytes(&self, spec: RequestSpec) -> Result<Vec<u8>, ApiError> {
        Ok(self.send(spec).await?.body)
    }

    pub(crate) async fn send_text(&self, spec: RequestSpec) -> Result<String, ApiError> {
        Ok(self.send(spec).await?.text())
    }

    pub(crate) async fn send_empty(&self, spec: RequestSpec) -> Result<(), ApiError> {
        self.send(spec).await.map(|_| ())
    }
}

/// Builder for an HTTP-backed [`GitClient`].
pub struct GitClientBuilder {
    base_url: Url,
    auth: Option<AuthCredential>,
    options: TransportOptions,
    user_agent: String,
}

impl GitClientBuilder {
    fn new(collection_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(collection_url.trim())?;
        base_url.set_query(None);
        base_url.set_fragment(None);
        Ok(Self {
            base_url,
            auth: None,
            options: TransportOptions::default(),
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
        })
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Tunnels `PATCH`, `PUT` and `DELETE` through `POST`. On by default.
    pub fn method_override(mut self, enabled: bool) -> Self {
        self.options.method_override = enabled;
        self
    }

    /// Resolves routes from the server's published locations. Off by default.
    pub fn location_discovery(mut self, enabled: bool) -> Self {
        self.options.location_discovery = enabled;
        self
    }

    /// Requests `version` for every operation instead of the built-in one.
    pub fn api_version(mut self, version: Option<ApiResourceVersion>) -> Self {
        self.options.api_version = version;
        self
    }

    /// Replaces the error translation table.
    pub fn translations(mut self, translations: ErrorTranslations) -> Self {
        self.options.translations = translations;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<GitClient, ApiError> {
        let http = Client::builder().user_agent(self.user_agent).build()?;
        let transport = HttpTransport::new(http, self.base_url, self.auth, self.options);
        Ok(GitClient::new(Arc::new(transport)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::routing::Operation;

    /// Answers every request with the same body and remembers what it saw.
    struct CannedTransport {
        body: &'static str,
        seen: Mutex<Vec<Operation>>,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: &RequestSpec) -> Result<TransportResponse, ApiError> {
            self.seen.lock().unwrap().push(request.endpoint.operation);
            Ok(TransportResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: self.body.as_bytes().to_vec(),
            })
        }

        async fn check_connection(&self) -> Result<bool, ApiError> {
            Ok(true)
        }
    }

    #[test]
    fn test_list_envelope_is_unwrapped() {
        let transport = Arc::new(CannedTransport {
            body: r#"{"count": 1, "value": [{"id": "5febef5a-833d-4e14-b9c0-14cb638f91e6", "name": "widgets"}]}"#,
            seen: Mutex::new(Vec::new()),
        });
        let client = GitClient::new(transport.clone());

        let repos = tokio_test::block_on(client.get_repositories(None, None)).unwrap();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "widgets");
        assert_eq!(*transport.seen.lock().unwrap(), vec![Operation::GetRepositories]);
        assert!(tokio_test::block_on(client.check_connection()).unwrap());
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        assert!(matches!(
            GitClient::builder("not a url"),
            Err(ApiError::Url(_))
        ));
    }

    #[test]
    fn test_builder_strips_query() {
        let builder = GitClient::builder("https://dev.azure.com/fabrikam?x=1#frag").unwrap();
        assert_eq!(builder.base_url.as_str(), "https://dev.azure.com/fabrikam");
        assert!(builder.options.method_override);
        assert!(!builder.options.location_discovery);
    }
}
