//! Article DTOs

use serde::{Deserialize, Serialize};

/// Server-side article list filter, encoded as URL query parameters
///
/// Unset fields are omitted from the query string entirely. The service
/// applies the same match semantics as [`crate::domain::article::ArticleFilter`];
/// clients may additionally re-filter locally when working from a cached list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
