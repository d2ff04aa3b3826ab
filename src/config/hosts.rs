//
//  tfgit
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host name helpers.

use url::Url;

/// Hosted service domain.
pub const HOSTED_SERVICE: &str = "dev.azure.com";

/// Legacy hosted service suffix (`{org}.visualstudio.com`).
pub const LEGACY_HOSTED_SUFFIX: &str = ".visualstudio.com";

/// Whether `host` is the hosted service rather than an on-premises server.
pub fn is_hosted_service(host: &str) -> bool {
    let host = normalize_host(host);
    host == HOSTED_SERVICE || host.ends_with(LEGACY_HOSTED_SUFFIX)
}

/// Strips scheme, trailing slash and case.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}

/// The normalized host of a collection URL.
pub fn host_of(collection_url: &str) -> Option<String> {
    let url = Url::parse(collection_url).ok()?;
    url.host_str().map(normalize_host)
}
