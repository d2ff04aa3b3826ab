//
//  tfgit
//  api/routing/query.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Query Parameter Builder
//!
//! An ordered collection of query string pairs with the service's
//! "add if present" rules:
//!
//! | Method | Included when |
//! |--------|---------------|
//! | [`QueryParams::add_if_not_null`] | the value is `Some` (numbers, booleans, enums, ids, dates) |
//! | [`QueryParams::add_if_not_empty`] | the value is `Some` and not an empty string |
//! | [`QueryParams::add_model`] | per leaf of the serialized model, non-null and non-empty |
//!
//! Omitted values never appear in the resulting query string, not even as
//! empty strings. Pairs keep the order in which they were added.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tfgit::api::routing::QueryParams;
//!
//! let mut query = QueryParams::new();
//! query
//!     .add_if_not_null("$skip", None::<i32>)
//!     .add_if_not_null("$top", Some(50));
//! assert_eq!(query.pairs(), &[("$top".to_string(), "50".to_string())]);
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::common::ApiError;

/// Converts a typed value into its query string representation.
pub trait QueryValue {
    /// The exact text placed after `key=` (before percent-encoding).
    fn to_query_value(&self) -> String;
}

macro_rules! query_value_via_to_string {
    ($($ty:ty),*) => {
        $(
            impl QueryValue for $ty {
                fn to_query_value(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

query_value_via_to_string!(bool, i16, i32, i64, u16, u32, u64, usize);

impl QueryValue for Uuid {
    fn to_query_value(&self) -> String {
        self.hyphenated().to_string()
    }
}

impl QueryValue for DateTime<Utc> {
    fn to_query_value(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> String {
        (**self).to_query_value()
    }
}

/// Implements [`QueryValue`] for an enum exposing `as_str()`.
#[macro_export]
macro_rules! impl_query_value_for_enum {
    ($($ty:ty),*) => {
        $(
            impl $crate::api::routing::QueryValue for $ty {
                fn to_query_value(&self) -> String {
                    self.as_str().to_string()
                }
            }
        )*
    };
}

/// Ordered query string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` when `value` is `Some`.
    pub fn add_if_not_null<V: QueryValue>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key.to_string(), value.to_query_value()));
        }
        self
    }

    /// Adds `key` when `value` is `Some` and non-empty. An empty string is
    /// treated exactly like an absent one.
    pub fn add_if_not_empty<S: AsRef<str>>(&mut self, key: &str, value: Option<S>) -> &mut Self {
        if let Some(value) = value {
            let value = value.as_ref();
            if !value.is_empty() {
                self.pairs.push((key.to_string(), value.to_string()));
            }
        }
        self
    }

    /// Expands a model into query parameters.
    ///
    /// The model is serialized to JSON; every leaf that is neither null nor
    /// an empty string is added. Nested objects contribute dotted keys
    /// (`itemVersion.version`), arrays are joined with commas. Fields of one
    /// object are added in alphabetical key order, whatever order the model
    /// declares them in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the model cannot be serialized.
    pub fn add_model<M: Serialize>(&mut self, model: Option<&M>) -> Result<&mut Self, ApiError> {
        if let Some(model) = model {
            let value = serde_json::to_value(model)?;
            self.flatten_into("", &value);
        }
        Ok(self)
    }

    fn flatten_into(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                for (key, child) in entries {
                    let name = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    self.flatten_into(&name, child);
                }
            }
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(",");
                self.add_if_not_empty(prefix, Some(joined));
            }
            scalar => {
                if !prefix.is_empty() {
                    self.add_if_not_empty(prefix, scalar_text(scalar));
                }
            }
        }
    }

    /// Returns the first value added under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Criteria {
        author: Option<String>,
        item_path: Option<String>,
        item_version: Option<Version>,
        ids: Option<Vec<String>>,
        exclude_deletes: Option<bool>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Version {
        version: Option<String>,
        version_type: Option<String>,
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let mut query = QueryParams::new();
        query
            .add_if_not_null("$skip", None::<i32>)
            .add_if_not_null("$top", Some(50))
            .add_if_not_empty("filter", Some(""))
            .add_if_not_empty("path", None::<&str>);

        assert_eq!(query.pairs(), &[("$top".to_string(), "50".to_string())]);
        assert!(!query.contains_key("$skip"));
        assert!(!query.contains_key("filter"));
    }

    #[test]
    fn test_present_values_keep_order_and_text() {
        let mut query = QueryParams::new();
        query
            .add_if_not_empty("filter", Some("heads/"))
            .add_if_not_null("includeLinks", Some(false))
            .add_if_not_null("$top", Some(10u32));

        let keys: Vec<&str> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["filter", "includeLinks", "$top"]);
        assert_eq!(query.get("filter"), Some("heads/"));
        assert_eq!(query.get("includeLinks"), Some("false"));
    }

    #[test]
    fn test_model_is_flattened_with_dotted_keys() {
        let criteria = Criteria {
            author: Some("jamal".to_string()),
            item_path: Some(String::new()),
            item_version: Some(Version {
                version: Some("main".to_string()),
                version_type: None,
            }),
            ids: Some(vec!["a1".to_string(), "b2".to_string()]),
            exclude_deletes: Some(true),
        };

        let mut query = QueryParams::new();
        query.add_model(Some(&criteria)).unwrap();

        assert_eq!(query.get("author"), Some("jamal"));
        assert_eq!(query.get("itemVersion.version"), Some("main"));
        assert_eq!(query.get("ids"), Some("a1,b2"));
        assert_eq!(query.get("excludeDeletes"), Some("true"));
        assert!(!query.contains_key("itemPath"));
        assert!(!query.contains_key("itemVersion.versionType"));
    }

    #[test]
    fn test_model_fields_are_added_alphabetically() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Search {
            user: Option<String>,
            item_path: Option<String>,
            author: Option<String>,
        }

        let search = Search {
            user: Some("ana".to_string()),
            item_path: Some("/src".to_string()),
            author: Some("jamal".to_string()),
        };
        let mut query = QueryParams::new();
        query.add_if_not_null("$top", Some(5)).add_model(Some(&search)).unwrap();

        let keys: Vec<&str> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["$top", "author", "itemPath", "user"]);
    }

    #[test]
    fn test_absent_model_adds_nothing() {
        let mut query = QueryParams::new();
        query.add_model(None::<&Criteria>).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_date_renders_as_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2026-03-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut query = QueryParams::new();
        query.add_if_not_null("fromDate", Some(date));
        assert_eq!(query.get("fromDate"), Some("2026-03-01T08:30:00Z"));
    }
}
