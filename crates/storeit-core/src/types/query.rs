//! Document list filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single document filter, serialized in the backend's JSON query form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Filter method; only `equal` is issued by this system.
    pub method: String,
    /// Document attribute the filter applies to.
    pub attribute: String,
    /// Accepted values; a document matches if the attribute equals any.
    pub values: Vec<Value>,
}

impl Query {
    /// Exact-match filter on one attribute.
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: "equal".to_string(),
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Whether a document's fields satisfy this filter.
    pub fn matches(&self, fields: &serde_json::Map<String, Value>) -> bool {
        match self.method.as_str() {
            "equal" => fields
                .get(&self.attribute)
                .is_some_and(|actual| self.values.iter().any(|v| v == actual)),
            _ => false,
        }
    }

    /// Query-string encoding expected by the REST API.
    pub fn to_query_param(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
