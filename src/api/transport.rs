//
//  tfgit
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! Executes a [`RequestSpec`] against a collection and classifies failures.
//!
//! ## Request Construction
//!
//! | Part | Source |
//! |------|--------|
//! | URL path | route template with placeholders replaced, absent segments dropped |
//! | Query string | [`QueryParams`](crate::api::routing::QueryParams) in insertion order |
//! | `Accept` | `<response media>;api-version=<v>;charset=utf-8` |
//! | `Content-Type` | `<request media>;charset=utf-8` when a body is sent |
//! | Method | the descriptor's verb, or `POST` plus `X-HTTP-Method-Override` |
//!
//! The template comes from the server's published location when discovery
//! is enabled, and from the descriptor table otherwise.
//!
//! ## Failure Classification
//!
//! A `407` is always [`ApiError::ProxyAuthRequired`]. Otherwise a JSON body
//! is read as a [`WrappedException`] and its type key looked up in the
//! client's [`ErrorTranslations`]. Unknown exceptions fall back to the HTTP
//! status, with the message taken from the `X-TFS-ServiceError` header, the
//! exception message or the status text, in that order.

use std::collections::HashMap;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::common::{ApiError, ErrorTranslations, ListResponse, WrappedException};
use super::locations::{negotiate, ApiResourceLocation, ApiResourceVersion};
use super::routing::{HttpVerb, MediaType, QueryParams, RequestSpec, RouteValues};
use crate::auth::AuthCredential;

/// Header carrying the URL-encoded service error message.
pub const SERVICE_ERROR_HEADER: &str = "X-TFS-ServiceError";

/// Header naming the real verb of a tunnelled request.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// A completed, successful HTTP exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes the body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes routed requests.
///
/// The router never depends on a concrete transport, so tests can record
/// specs instead of sending them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the successful response.
    async fn execute(&self, request: &RequestSpec) -> Result<TransportResponse, ApiError>;

    /// Returns `true` when the collection answers its connection data
    /// endpoint with a non-empty body. A failed exchange is classified like
    /// any other request, so a rejected token surfaces as `Unauthorized`.
    async fn check_connection(&self) -> Result<bool, ApiError>;
}

/// Options fixed when an [`HttpTransport`] is built.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub method_override: bool,
    pub location_discovery: bool,
    /// Requested API version for every operation, replacing the descriptor's.
    pub api_version: Option<ApiResourceVersion>,
    pub translations: ErrorTranslations,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            method_override: true,
            location_discovery: false,
            api_version: None,
            translations: ErrorTranslations::git_defaults(),
        }
    }
}

/// The reqwest-backed transport.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    auth: Option<AuthCredential>,
    options: TransportOptions,
    /// `None` inside the cell means discovery was attempted and failed.
    locations: OnceCell<Option<HashMap<Uuid, ApiResourceLocation>>>,
}

impl HttpTransport {
    pub fn new(
        http: Client,
        base_url: Url,
        auth: Option<AuthCredential>,
        options: TransportOptions,
    ) -> Self {
        Self {
            http,
            base_url,
            auth,
            options,
            locations: OnceCell::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the server's location for `id`, if discovery is on and
    /// succeeded.
    async fn location(&self, id: Uuid) -> Result<Option<&ApiResourceLocation>, ApiError> {
        if !self.options.location_discovery {
            return Ok(None);
        }

        let cache = self
            .locations
            .get_or_init(|| async {
                match self.fetch_locations().await {
                    Ok(locations) => {
                        debug!("Discovered {} resource locations", locations.len());
                        Some(locations)
                    }
                    Err(e) => {
                        warn!("Location discovery failed, using built-in routes: {}", e);
                        None
                    }
                }
            })
            .await;

        match cache {
            None => Ok(None),
            Some(locations) => match locations.get(&id) {
                Some(location) => Ok(Some(location)),
                None => Err(ApiError::UnknownLocation {
                    location_id: id,
                    reason: format!("not published by {}", self.base_url),
                }),
            },
        }
    }

    async fn fetch_locations(&self) -> Result<HashMap<Uuid, ApiResourceLocation>, ApiError> {
        let url = join_segments(&self.base_url, ["_apis".to_string()])?;
        debug!("OPTIONS {}", url);

        let mut request = self
            .http
            .request(Method::OPTIONS, url)
            .header(ACCEPT, "application/json");
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = self.finish(request.send().await?).await?;
        let list: ListResponse<ApiResourceLocation> = response.json()?;
        Ok(list.into_iter().map(|l| (l.id, l)).collect())
    }

    /// Reads the body and turns non-success statuses into errors.
    async fn finish(&self, response: reqwest::Response) -> Result<TransportResponse, ApiError> {
        let status = response.status();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(TransportResponse {
                status: status.as_u16(),
                content_type,
                body,
            });
        }

        let failure = FailedResponse {
            status: status.as_u16(),
            content_type: content_type.as_deref(),
            service_error: headers.get(SERVICE_ERROR_HEADER).and_then(|v| v.to_str().ok()),
            retry_after: headers.get(RETRY_AFTER).and_then(|v| v.to_str().ok()),
            body: &body,
        };
        let error = classify_failure(&failure, &self.options.translations);
        warn!("Request failed with {}: {}", status, error);
        Err(error)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestSpec) -> Result<TransportResponse, ApiError> {
        let endpoint = request.endpoint;
        let requested = match self.options.api_version {
            Some(version) => version,
            None => endpoint.api_version.parse()?,
        };

        let (template, area, resource, version) = match self.location(endpoint.location_id).await? {
            Some(location) => {
                let version = negotiate(location, requested)?.ok_or_else(|| {
                    ApiError::UnknownLocation {
                        location_id: location.id,
                        reason: format!(
                            "API version {} is below the server minimum {}",
                            requested, location.min_version
                        ),
                    }
                })?;
                (
                    location.route_template.as_str(),
                    location.area.as_str(),
                    location.resource_name.as_str(),
                    version,
                )
            }
            None => (endpoint.route_template, endpoint.area, endpoint.resource, requested),
        };

        let segments = expand_route_template(template, &request.route_values, area, resource);
        let mut url = join_segments(&self.base_url, segments)?;
        if !request.query.is_empty() {
            url.set_query(Some(&encode_query(&request.query)));
        }

        let (method, tunnelled) = effective_method(endpoint.verb, self.options.method_override);
        debug!("{} {} ({})", endpoint.verb, url, endpoint.name);

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, accept_header(endpoint.response_media, &version));
        if let Some(verb) = tunnelled {
            builder = builder.header(METHOD_OVERRIDE_HEADER, verb.as_str());
        }
        if let Some(body) = &request.body {
            let media = endpoint.request_media.unwrap_or(MediaType::Json);
            builder = builder
                .header(CONTENT_TYPE, format!("{};charset=utf-8", media))
                .body(serde_json::to_vec(body)?);
        }
        if let Some(auth) = &self.auth {
            builder = auth.apply_to_request(builder);
        }

        self.finish(builder.send().await?).await
    }

    async fn check_connection(&self) -> Result<bool, ApiError> {
        let url = join_segments(
            &self.base_url,
            ["_apis".to_string(), "connectiondata".to_string()],
        )?;
        debug!("GET {}", url);

        let mut request = self.http.get(url).header(ACCEPT, "application/json");
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = self.finish(request.send().await?).await?;
        Ok(!response.body.is_empty())
    }
}

/// Expands a route template into URL path segments.
///
/// `{name}` and `{*name}` segments are replaced by the route value of that
/// name; segments whose value is absent are dropped. `area` and `resource`
/// fall back to the given names unless the route values override them.
pub fn expand_route_template(
    template: &str,
    values: &RouteValues,
    area: &str,
    resource: &str,
) -> Vec<String> {
    let mut segments = Vec::new();
    for part in template.split('/').filter(|p| !p.is_empty()) {
        let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) else {
            segments.push(part.to_string());
            continue;
        };

        let (name, wildcard) = match inner.strip_prefix('*') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        let value = match (values.get(name), name) {
            (Some(value), _) => value,
            (None, "area") => area,
            (None, "resource") => resource,
            (None, _) => continue,
        };
        if value.is_empty() {
            continue;
        }

        if wildcard {
            segments.extend(
                value
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        } else {
            segments.push(value.to_string());
        }
    }
    segments
}

/// Appends percent-encoded segments to the collection URL.
fn join_segments<I>(base: &Url, segments: I) -> Result<Url, ApiError>
where
    I: IntoIterator<Item = String>,
{
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ApiError::Unknown(format!("{} cannot be a base URL", base)))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(&segment);
        }
    }
    Ok(url)
}

/// Characters escaped in query keys and values. `$`, `/`, `:`, `@`, `,` and
/// `;` stay literal; a space becomes `%20`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b',')
    .remove(b';');

/// Renders query parameters in insertion order.
pub fn encode_query(query: &QueryParams) -> String {
    query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ENCODE_SET),
                utf8_percent_encode(value, QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes the service error header, which the server form-encodes
/// (`+` for a space).
fn decode_service_error(header: &str) -> String {
    let spaced = header.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|m| m.into_owned())
        .unwrap_or(spaced)
}

/// Builds the `Accept` header value.
pub fn accept_header(media: MediaType, version: &ApiResourceVersion) -> String {
    format!("{};api-version={};charset=utf-8", media, version)
}

/// Returns the method to send and, when tunnelled, the verb to put in the
/// override header.
pub fn effective_method(verb: HttpVerb, method_override: bool) -> (Method, Option<HttpVerb>) {
    if method_override && verb.is_overridable() {
        return (Method::POST, Some(verb));
    }
    let method = match verb {
        HttpVerb::Get => Method::GET,
        HttpVerb::Post => Method::POST,
        HttpVerb::Put => Method::PUT,
        HttpVerb::Patch => Method::PATCH,
        HttpVerb::Delete => Method::DELETE,
        HttpVerb::Options => Method::OPTIONS,
    };
    (method, None)
}

/// The parts of a failed response used for classification.
#[derive(Debug, Clone, Copy)]
pub struct FailedResponse<'a> {
    pub status: u16,
    pub content_type: Option<&'a str>,
    pub service_error: Option<&'a str>,
    pub retry_after: Option<&'a str>,
    pub body: &'a [u8],
}

/// Classifies a non-success response.
pub fn classify_failure(failure: &FailedResponse<'_>, translations: &ErrorTranslations) -> ApiError {
    if failure.status == StatusCode::PROXY_AUTHENTICATION_REQUIRED.as_u16() {
        return ApiError::ProxyAuthRequired;
    }

    let retry_after = failure.retry_after.and_then(|v| v.trim().parse::<u64>().ok());

    let is_json = failure
        .content_type
        .map(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
        && !failure.body.is_empty();
    let wrapped = if is_json {
        serde_json::from_slice::<WrappedException>(failure.body).ok()
    } else {
        None
    };

    if let Some(error) = wrapped
        .as_ref()
        .and_then(|w| w.translate(translations, failure.status))
    {
        return match error {
            ApiError::RateLimited { message, .. } => ApiError::RateLimited {
                message,
                retry_after,
            },
            other => other,
        };
    }

    let mut message = wrapped.and_then(|w| w.message).unwrap_or_default();
    if let Some(header) = failure.service_error {
        message = decode_service_error(header);
    } else if message.is_empty() {
        message = StatusCode::from_u16(failure.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
    }

    match failure.status {
        400 => ApiError::BadRequest(message),
        401 => ApiError::Unauthorized(message),
        403 => ApiError::Forbidden(message),
        404 => ApiError::NotFound(message),
        409 => ApiError::Conflict(message),
        429 => ApiError::RateLimited {
            message,
            retry_after,
        },
        500..=599 => ApiError::Server {
            status: failure.status,
            message,
        },
        status => ApiError::Unknown(format!("HTTP {}: {}", status, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routing::Operation;

    fn values(pairs: &[(&'static str, &str)]) -> RouteValues {
        let mut values = RouteValues::new();
        for (k, v) in pairs {
            values.insert(*k, *v);
        }
        values
    }

    #[test]
    fn test_expand_drops_absent_segments() {
        let template = Operation::GetPush.descriptor().route_template;
        let segments = expand_route_template(
            template,
            &values(&[("repositoryId", "widgets")]),
            "git",
            "pushes",
        );
        assert_eq!(
            segments.join("/"),
            "_apis/git/repositories/widgets/pushes"
        );

        let segments = expand_route_template(
            template,
            &values(&[("project", "Fabrikam"), ("repositoryId", "widgets"), ("pushId", "14")]),
            "git",
            "pushes",
        );
        assert_eq!(
            segments.join("/"),
            "Fabrikam/_apis/git/repositories/widgets/pushes/14"
        );
    }

    #[test]
    fn test_expand_wildcard_and_overrides() {
        let segments = expand_route_template(
            "{area}/{*path}",
            &values(&[("path", "a/b/c"), ("area", "tfvc")]),
            "git",
            "items",
        );
        assert_eq!(segments, vec!["tfvc", "a", "b", "c"]);
    }

    #[test]
    fn test_join_segments_percent_encodes() {
        let base = Url::parse("https://dev.azure.com/fabrikam/").unwrap();
        let url = join_segments(
            &base,
            ["Fabrikam Fiber".to_string(), "_apis".to_string()],
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://dev.azure.com/fabrikam/Fabrikam%20Fiber/_apis");

        let bare = Url::parse("https://tfs.example.com/tfs/DefaultCollection").unwrap();
        let url = join_segments(&bare, ["_apis".to_string()]).unwrap();
        assert_eq!(url.path(), "/tfs/DefaultCollection/_apis");
    }

    #[test]
    fn test_accept_header() {
        let version: ApiResourceVersion = "2.0-preview.1".parse().unwrap();
        assert_eq!(
            accept_header(MediaType::Zip, &version),
            "application/zip;api-version=2.0-preview.1;charset=utf-8"
        );
    }

    #[test]
    fn test_method_override() {
        assert_eq!(
            effective_method(HttpVerb::Patch, true),
            (Method::POST, Some(HttpVerb::Patch))
        );
        assert_eq!(effective_method(HttpVerb::Patch, false), (Method::PATCH, None));
        assert_eq!(effective_method(HttpVerb::Get, true), (Method::GET, None));
        assert_eq!(effective_method(HttpVerb::Post, true), (Method::POST, None));
        assert_eq!(effective_method(HttpVerb::Options, true), (Method::OPTIONS, None));
    }

    fn failure<'a>(status: u16, content_type: Option<&'a str>, body: &'a [u8]) -> FailedResponse<'a> {
        FailedResponse {
            status,
            content_type,
            service_error: None,
            retry_after: None,
            body,
        }
    }

    #[test]
    fn test_classify_by_status() {
        let t = ErrorTranslations::new();
        assert!(matches!(
            classify_failure(&failure(407, None, b""), &t),
            ApiError::ProxyAuthRequired
        ));
        assert!(matches!(
            classify_failure(&failure(404, None, b""), &t),
            ApiError::NotFound(ref m) if m == "Not Found"
        ));
        assert!(matches!(
            classify_failure(&failure(503, None, b""), &t),
            ApiError::Server { status: 503, .. }
        ));
        assert!(matches!(
            classify_failure(&failure(418, None, b""), &t),
            ApiError::Unknown(_)
        ));
    }

    #[test]
    fn test_classify_by_translation() {
        let body = br#"{"message":"TF401019: gone","typeKey":"GitRepositoryNotFoundException"}"#;
        let err = classify_failure(
            &failure(400, Some("application/json; charset=utf-8"), body),
            &ErrorTranslations::git_defaults(),
        );
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "TF401019: gone"));
    }

    #[test]
    fn test_service_error_header_wins_for_untranslated() {
        let body = br#"{"message":"inner","typeKey":"Whatever"}"#;
        let mut f = failure(409, Some("application/json"), body);
        f.service_error = Some("TF400898%3A%20An%20Internal%20Error");
        let err = classify_failure(&f, &ErrorTranslations::git_defaults());
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "TF400898: An Internal Error"));

        f.service_error = Some("TF401019%3a+The+Git+repository+was+not+found");
        let err = classify_failure(&f, &ErrorTranslations::git_defaults());
        assert!(matches!(
            err,
            ApiError::Conflict(ref m) if m == "TF401019: The Git repository was not found"
        ));
    }

    #[test]
    fn test_query_keeps_dollar_and_slash_literal() {
        let mut query = QueryParams::new();
        query
            .add_if_not_null("$top", Some(50))
            .add_if_not_empty("filter", Some("heads/my branch"))
            .add_if_not_empty("path", Some("a&b=c+d"));
        assert_eq!(
            encode_query(&query),
            "$top=50&filter=heads/my%20branch&path=a%26b%3Dc%2Bd"
        );
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        let mut f = failure(429, None, b"");
        f.retry_after = Some("30");
        assert!(matches!(
            classify_failure(&f, &ErrorTranslations::new()),
            ApiError::RateLimited { retry_after: Some(30), .. }
        ));
    }
}
