use baque_core::KnowledgeRecord;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge base is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("knowledge base must be a JSON array, found {found}")]
    NotArray { found: &'static str },
    #[error("record {index} is not a question/answer entry: {message}")]
    InvalidRecord { index: usize, message: String },
    #[error("serialize knowledge base: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KnowledgeError {
    /// Decoded-but-wrong-shape input, as opposed to unreadable text.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::NotArray { .. } | Self::InvalidRecord { .. })
    }
}

/// Pretty-printed JSON array of `{question, answer, timestamp}` objects.
pub fn serialize_knowledge(records: &[KnowledgeRecord]) -> Result<String, KnowledgeError> {
    serde_json::to_string_pretty(records).map_err(KnowledgeError::Serialize)
}

/// Decodes an exported knowledge base. Input that is JSON but not an array is
/// rejected as a whole; nothing is partially imported.
pub fn deserialize_knowledge(text: &str) -> Result<Vec<KnowledgeRecord>, KnowledgeError> {
    let value: Value = serde_json::from_str(text).map_err(KnowledgeError::Parse)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(KnowledgeError::NotArray {
                found: json_kind(&other),
            })
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| KnowledgeError::InvalidRecord {
                index,
                message: err.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
