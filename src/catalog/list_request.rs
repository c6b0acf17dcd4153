use super::Validate;
use crate::document_store::{CatalogError, CatalogResult};
use serde::Deserialize;

/// Largest page size a list request may ask for.
pub const MAX_LIST_LIMIT: usize = 300;

/// Paging and filtering parameters of a list (search) request.
///
/// `filter` is a JSON object carried as a string, e.g. `{"query":"ballad"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListRequest {
    #[serde(rename = "l", alias = "limit", default)]
    pub limit: usize,
    #[serde(rename = "p", alias = "page", default)]
    pub page: usize,
    #[serde(rename = "f", alias = "filter", default)]
    pub filter: String,
}

impl ListRequest {
    pub fn with_query(query: &str, page: usize, limit: usize) -> Self {
        ListRequest {
            limit,
            page,
            filter: serde_json::json!({ "query": query }).to_string(),
        }
    }

    /// The `query` string of the filter payload.
    pub fn search_query(&self) -> CatalogResult<String> {
        parse_search_filter(&self.filter)
    }
}

impl Validate for ListRequest {
    fn validate(&self) -> Result<(), String> {
        if self.limit > MAX_LIST_LIMIT {
            return Err(format!(
                "limit must be at most {}, got {}",
                MAX_LIST_LIMIT, self.limit
            ));
        }
        Ok(())
    }
}

/// Decodes `{"query": "<text>"}`. Anything else, including an empty payload, is `BadFilter`.
pub fn parse_search_filter(filter: &str) -> CatalogResult<String> {
    let payload: serde_json::Map<String, serde_json::Value> = serde_json::from_str(filter)
        .map_err(|e| CatalogError::BadFilter(format!("filter is not a JSON object: {}", e)))?;
    match payload.get("query") {
        Some(serde_json::Value::String(query)) => Ok(query.clone()),
        Some(other) => Err(CatalogError::BadFilter(format!(
            "query must be a string, got {}",
            other
        ))),
        None => Err(CatalogError::BadFilter("missing query".to_string())),
    }
}
