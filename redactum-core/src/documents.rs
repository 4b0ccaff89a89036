// File: redactum-core/src/documents.rs

//! documents.rs - Multi-document input and output containers.
//!
//! A batch is either an ordered sequence (document ids are the stringified
//! positional index) or a name-keyed mapping that keeps insertion order.
//! `clean_documents` returns the same shape it was given.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ScrubError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Documents {
    Sequence(Vec<String>),
    Mapping(IndexMap<String, String>),
}

impl Documents {
    pub fn len(&self) -> usize {
        match self {
            Documents::Sequence(docs) => docs.len(),
            Documents::Mapping(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(document_id, text)` pairs in document order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (String, &str)> + '_> {
        match self {
            Documents::Sequence(docs) => Box::new(
                docs.iter()
                    .enumerate()
                    .map(|(i, text)| (i.to_string(), text.as_str())),
            ),
            Documents::Mapping(docs) => {
                Box::new(docs.iter().map(|(name, text)| (name.clone(), text.as_str())))
            }
        }
    }

    /// Looks a document up by its id.
    pub fn get(&self, document_id: &str) -> Option<&str> {
        match self {
            Documents::Sequence(docs) => document_id
                .parse::<usize>()
                .ok()
                .filter(|i| i.to_string() == document_id)
                .and_then(|i| docs.get(i))
                .map(String::as_str),
            Documents::Mapping(docs) => docs.get(document_id).map(String::as_str),
        }
    }

    /// Builds a container of the same shape from per-document outputs given
    /// in document order.
    pub(crate) fn same_shape(&self, outputs: Vec<String>) -> Documents {
        match self {
            Documents::Sequence(_) => Documents::Sequence(outputs),
            Documents::Mapping(docs) => {
                Documents::Mapping(docs.keys().cloned().zip(outputs).collect())
            }
        }
    }

    /// Parses a dynamically-shaped JSON value into a document batch.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s),
                    other => Err(ScrubError::InvalidDocumentCollection(format!(
                        "element {} is {}, not a string",
                        i,
                        json_type_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Documents::Sequence),
            Value::Object(map) => map
                .into_iter()
                .map(|(name, item)| match item {
                    Value::String(s) => Ok((name, s)),
                    other => Err(ScrubError::InvalidDocumentCollection(format!(
                        "document '{}' is {}, not a string",
                        name,
                        json_type_name(&other)
                    ))),
                })
                .collect::<Result<IndexMap<_, _>>>()
                .map(Documents::Mapping),
            other => Err(ScrubError::InvalidDocumentCollection(format!(
                "got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parses a JSON string into a document batch.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| ScrubError::InvalidDocumentCollection(format!("not valid JSON: {}", e)))?;
        Self::from_json(value)
    }
}

impl TryFrom<Value> for Documents {
    type Error = ScrubError;

    fn try_from(value: Value) -> Result<Self> {
        Documents::from_json(value)
    }
}

impl From<Vec<String>> for Documents {
    fn from(docs: Vec<String>) -> Self {
        Documents::Sequence(docs)
    }
}

impl From<Vec<&str>> for Documents {
    fn from(docs: Vec<&str>) -> Self {
        Documents::Sequence(docs.into_iter().map(str::to_string).collect())
    }
}

impl From<IndexMap<String, String>> for Documents {
    fn from(docs: IndexMap<String, String>) -> Self {
        Documents::Mapping(docs)
    }
}

impl From<BTreeMap<String, String>> for Documents {
    fn from(docs: BTreeMap<String, String>) -> Self {
        Documents::Mapping(docs.into_iter().collect())
    }
}

/// Collects `(name, text)` pairs into a mapping, in iteration order.
impl FromIterator<(String, String)> for Documents {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Documents::Mapping(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Documents {
    fn from(docs: [(&str, &str); N]) -> Self {
        Documents::Mapping(
            docs.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_ids_are_positional() {
        let docs = Documents::from(vec!["a", "b"]);
        let ids: Vec<String> = docs.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["0", "1"]);
        assert_eq!(docs.get("1"), Some("b"));
        assert_eq!(docs.get("01"), None);
        assert_eq!(docs.get("x"), None);
    }

    #[test]
    fn test_from_json_object_and_array() {
        let docs = Documents::from_json(json!({"x": "a@b.com", "y": "clean"})).unwrap();
        assert_eq!(docs.get("x"), Some("a@b.com"));
        let docs = Documents::from_json(json!(["one", "two"])).unwrap();
        assert_eq!(docs, Documents::from(vec!["one", "two"]));
    }

    #[test]
    fn test_from_json_rejects_other_shapes() {
        for value in [json!("plain"), json!(42), json!(null), json!([1, 2]), json!({"x": 1})] {
            assert!(matches!(
                Documents::from_json(value),
                Err(ScrubError::InvalidDocumentCollection(_))
            ));
        }
    }

    #[test]
    fn test_same_shape_mapping_keeps_keys() {
        let docs = Documents::from([("b", "2"), ("a", "1")]);
        let out = docs.same_shape(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(out, Documents::from([("b", "one"), ("a", "two")]));
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let docs = Documents::from_json_str(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#).unwrap();
        let ids: Vec<String> = docs.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);

        let docs: Documents = vec![("b.txt".to_string(), "x".to_string()), ("a.txt".to_string(), "y".to_string())]
            .into_iter()
            .collect();
        let ids: Vec<String> = docs.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b.txt", "a.txt"]);
        assert_eq!(serde_json::to_string(&docs).unwrap(), r#"{"b.txt":"x","a.txt":"y"}"#);
    }
}
