use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// A model reply that could not be turned into records.
/// Keeps the reply before and after sanitizing so an operator can see what the model said.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ParseError {
    pub raw_reply: String,
    pub sanitized: String,
    pub message: String,
}

/// Parses a sanitized reply as a JSON array of records.
///
/// Fields are not validated beyond their JSON type; absent fields come back as `None`.
/// An empty reply is an error, not an empty list.
pub fn parse_records<T: DeserializeOwned>(
    raw_reply: &str,
    sanitized: &str,
) -> Result<Vec<T>, ParseError> {
    serde_json::from_str::<Vec<T>>(sanitized).map_err(|e| ParseError {
        raw_reply: raw_reply.to_string(),
        sanitized: sanitized.to_string(),
        message: e.to_string(),
    })
}
