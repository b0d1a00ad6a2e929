use serde::{Deserialize, Serialize};

use super::{Fields, field};

/// Store-assigned identity of one document
///
/// Only valid for the pass that listed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub collection: String,
    pub id: String,
}

impl DocumentHandle {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A listed document: its handle plus the fields it held at listing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub handle: DocumentHandle,
    pub fields: Fields,
}

impl RemoteDocument {
    pub fn new(handle: DocumentHandle, fields: Fields) -> Self {
        Self { handle, fields }
    }

    /// Natural key, if the document carries a string `name` field
    pub fn name(&self) -> Option<&str> {
        self.fields.get(field::NAME).and_then(|v| v.as_str())
    }

    /// String-array field, skipping non-string entries
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: serde_json::Value) -> RemoteDocument {
        let fields = match fields {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        RemoteDocument::new(DocumentHandle::new("stocks", "0001"), fields)
    }

    #[test]
    fn test_handle_display() {
        let handle = DocumentHandle::new("stocks", "abc");
        assert_eq!(handle.to_string(), "stocks/abc");
    }

    #[test]
    fn test_name_requires_string() {
        assert_eq!(doc(json!({"name": "SAP SE"})).name(), Some("SAP SE"));
        assert_eq!(doc(json!({"name": 7})).name(), None);
        assert_eq!(doc(json!({})).name(), None);
    }

    #[test]
    fn test_strings_skips_non_strings() {
        let d = doc(json!({"tags": ["Software", 3, "Cloud"], "country": "Germany"}));
        assert_eq!(d.strings("tags"), vec!["Software", "Cloud"]);
        assert!(d.strings("country").is_empty());
        assert!(d.strings("missing").is_empty());
    }
}
