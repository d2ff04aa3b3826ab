//
//  tfgit
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! List Envelope
//!
//! Collection endpoints answer with `{"count": N, "value": [...]}`. Paging is
//! explicit through `$top` and `$skip`; the client never follows pages on
//! its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use tfgit::api::common::ListResponse;
//!
//! let json = r#"{"count": 2, "value": ["a", "b"]}"#;
//! let page: ListResponse<String> = serde_json::from_str(json)?;
//! assert_eq!(page.into_vec(), vec!["a", "b"]);
//! ```

use serde::{Deserialize, Serialize};

/// A `{count, value}` envelope around a list of resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Number of items in `value`. Some endpoints omit it.
    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<T> IntoIterator for ListResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.value.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_without_count() {
        let page: ListResponse<u32> = serde_json::from_str(r#"{"value": [1, 2, 3]}"#).unwrap();
        assert_eq!(page.count, None);
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_empty_envelope() {
        let page: ListResponse<u32> = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.into_iter().count(), 0);
    }
}
