//! Generic backend documents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde::ser::Error as _;
use serde_json::{Map, Value};

/// A document as returned by the document store.
///
/// System attributes are prefixed with `$`; everything else is kept in
/// `data` and decoded into a typed model on demand with [`Document::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning collection.
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
    /// Owning database.
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    /// Creation timestamp.
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// User-defined attributes.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Builds a document from an id and its attribute map.
    pub fn new(
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
        id: impl Into<String>,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            collection_id: collection_id.into(),
            database_id: database_id.into(),
            created_at: None,
            updated_at: None,
            data,
        }
    }

    /// Decodes the document into a typed model that reads `$id`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut fields = self.data.clone();
        fields.insert("$id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
    }

    /// Shallow-merges `patch` into the attributes.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            self.data.insert(key.clone(), value.clone());
        }
    }
}

/// Serializes a model into the attribute map sent to the document store.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde_json::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// A page of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Number of matching documents.
    pub total: u64,
    /// The documents themselves.
    pub documents: Vec<Document>,
}
