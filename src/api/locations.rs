//
//  tfgit
//  api/locations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Locations and Version Negotiation
//!
//! A server publishes the resources it hosts through `OPTIONS {base}/_apis`:
//!
//! ```json
//! {"count": 1, "value": [{
//!   "id": "225f7195-f9c7-4d14-ab28-a83f7ff77e1f",
//!   "area": "git",
//!   "resourceName": "repositories",
//!   "routeTemplate": "{project}/_apis/{area}/{resource}/{repositoryId}",
//!   "resourceVersion": 1,
//!   "minVersion": "1.0",
//!   "maxVersion": "3.0",
//!   "releasedVersion": "2.0"
//! }]}
//! ```
//!
//! When a location is known, the requested API version is negotiated
//! against it with [`negotiate`]:
//!
//! | Requested vs location | Result |
//! |-----------------------|--------|
//! | below `minVersion` | unsupported (resource retired) |
//! | above `maxVersion` | `maxVersion`, preview iff `releasedVersion < maxVersion` |
//! | within range | requested, resource version capped, preview iff `releasedVersion < requested` or requested preview |

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::ApiError;

/// A `major.minor` API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl FromStr for ApiVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::InvalidApiVersion(s.to_string());
        let (major, minor) = match s.trim().split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s.trim(), "0"),
        };
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The value of the `api-version` media type parameter, e.g. `2.0` or
/// `2.0-preview.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiResourceVersion {
    pub api_version: ApiVersion,
    /// Revision of the resource within the API version; 0 when unspecified.
    pub resource_version: u32,
    pub preview: bool,
}

impl ApiResourceVersion {
    pub fn new(api_version: ApiVersion) -> Self {
        Self {
            api_version,
            resource_version: 0,
            preview: false,
        }
    }
}

impl FromStr for ApiResourceVersion {
    type Err = ApiError;

    /// Parses `2.0`, `2.0-preview` and `2.0-preview.1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((api, suffix)) = s.split_once('-') else {
            return Ok(Self::new(s.parse()?));
        };

        let rest = suffix
            .strip_prefix("preview")
            .ok_or_else(|| ApiError::InvalidApiVersion(s.to_string()))?;
        let resource_version = match rest.strip_prefix('.') {
            Some(number) => number
                .parse()
                .map_err(|_| ApiError::InvalidApiVersion(s.to_string()))?,
            None if rest.is_empty() => 0,
            None => return Err(ApiError::InvalidApiVersion(s.to_string())),
        };

        Ok(Self {
            api_version: api.parse()?,
            resource_version,
            preview: true,
        })
    }
}

impl fmt::Display for ApiResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_version)?;
        if self.preview {
            f.write_str("-preview")?;
            if self.resource_version > 0 {
                write!(f, ".{}", self.resource_version)?;
            }
        }
        Ok(())
    }
}

/// One resource location published by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceLocation {
    pub id: Uuid,
    pub area: String,
    pub resource_name: String,
    pub route_template: String,
    #[serde(default)]
    pub resource_version: u32,
    pub min_version: String,
    pub max_version: String,
    pub released_version: String,
}

/// Negotiates the version to send for `requested` against `location`.
///
/// Returns `Ok(None)` when the server no longer supports the resource at
/// the requested version.
///
/// # Errors
///
/// Returns [`ApiError::InvalidApiVersion`] if the location carries a
/// malformed version string.
pub fn negotiate(
    location: &ApiResourceLocation,
    requested: ApiResourceVersion,
) -> Result<Option<ApiResourceVersion>, ApiError> {
    let min: ApiVersion = location.min_version.parse()?;
    let max: ApiVersion = location.max_version.parse()?;
    let released: ApiVersion = location.released_version.parse()?;

    if requested.api_version < min {
        return Ok(None);
    }

    if requested.api_version > max {
        return Ok(Some(ApiResourceVersion {
            api_version: max,
            resource_version: 0,
            preview: released < max,
        }));
    }

    Ok(Some(ApiResourceVersion {
        api_version: requested.api_version,
        resource_version: requested.resource_version.min(location.resource_version),
        preview: released < requested.api_version || requested.preview,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(min: &str, max: &str, released: &str, resource_version: u32) -> ApiResourceLocation {
        ApiResourceLocation {
            id: Uuid::new_v4(),
            area: "git".to_string(),
            resource_name: "repositories".to_string(),
            route_template: "{project}/_apis/{area}/{resource}/{repositoryId}".to_string(),
            resource_version,
            min_version: min.to_string(),
            max_version: max.to_string(),
            released_version: released.to_string(),
        }
    }

    fn v(s: &str) -> ApiResourceVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(v("2.0").to_string(), "2.0");
        assert_eq!(v("2.0-preview").to_string(), "2.0-preview");
        let preview = v("2.0-preview.1");
        assert!(preview.preview);
        assert_eq!(preview.resource_version, 1);
        assert_eq!(preview.to_string(), "2.0-preview.1");
        assert!("2.x".parse::<ApiResourceVersion>().is_err());
        assert!("2.0-beta".parse::<ApiResourceVersion>().is_err());
    }

    #[test]
    fn test_requested_below_min_is_unsupported() {
        let loc = location("3.0", "5.0", "4.0", 1);
        assert_eq!(negotiate(&loc, v("2.0")).unwrap(), None);
    }

    #[test]
    fn test_requested_above_max_drops_to_max() {
        let released = location("1.0", "2.0", "2.0", 1);
        assert_eq!(negotiate(&released, v("3.0")).unwrap(), Some(v("2.0")));

        let previewing = location("1.0", "2.0", "1.0", 1);
        assert_eq!(
            negotiate(&previewing, v("3.0")).unwrap().map(|n| n.to_string()),
            Some("2.0-preview".to_string())
        );
    }

    #[test]
    fn test_requested_in_range() {
        let loc = location("1.0", "3.0", "2.0", 1);
        assert_eq!(negotiate(&loc, v("2.0")).unwrap(), Some(v("2.0")));
        assert_eq!(
            negotiate(&loc, v("2.0-preview.4")).unwrap(),
            Some(v("2.0-preview.1"))
        );

        let unreleased = location("1.0", "3.0", "1.0", 2);
        assert_eq!(
            negotiate(&unreleased, v("2.0")).unwrap().map(|n| n.preview),
            Some(true)
        );
    }

    #[test]
    fn test_location_deserializes() {
        let json = r#"{
            "id": "225f7195-f9c7-4d14-ab28-a83f7ff77e1f",
            "area": "git",
            "resourceName": "repositories",
            "routeTemplate": "{project}/_apis/{area}/{resource}/{repositoryId}",
            "resourceVersion": 1,
            "minVersion": "1.0",
            "maxVersion": "3.0",
            "releasedVersion": "2.0"
        }"#;
        let loc: ApiResourceLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.resource_name, "repositories");
        assert_eq!(loc.resource_version, 1);
    }
}
