use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Which of the two input documents a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Contacts,
    Delinquency,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Contacts => "contacts",
            DocumentKind::Delinquency => "delinquency",
        }
    }

    /// Heading placed above the document text in the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Contacts => "Contacts",
            DocumentKind::Delinquency => "Delinquency",
        }
    }

    /// Field names the model is asked to return, in output order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Contacts => &["unit", "email", "phone"],
            DocumentKind::Delinquency => &["unit", "name"],
        }
    }

    /// Maps an upload field name to a kind. The Portuguese names used by
    /// the first front-end (`contatos`, `inadimplencia`) are still accepted.
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "contacts" | "contatos" => Some(DocumentKind::Contacts),
            "delinquency" | "inadimplencia" => Some(DocumentKind::Delinquency),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::from_field_name(s).ok_or_else(|| format!("Unknown document kind '{s}'"))
    }
}

/// An uploaded document, consumed once by the loader.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub kind: DocumentKind,
    pub content: Bytes,
}

impl RawDocument {
    pub fn new(kind: DocumentKind, content: impl Into<Bytes>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// One row of the contact roster as returned by the model.
/// `unit` is the join key and is kept exactly as the model wrote it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
}

/// One row of the delinquency list as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelinquencyRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

/// A delinquency record joined with its contact details.
/// Serialized with explicit nulls so every object has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub unit: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A record shape the pipeline can ask the model for.
pub trait ExtractedRecord: DeserializeOwned + Serialize + Send + 'static {
    const KIND: DocumentKind;
}

impl ExtractedRecord for ContactRecord {
    const KIND: DocumentKind = DocumentKind::Contacts;
}

impl ExtractedRecord for DelinquencyRecord {
    const KIND: DocumentKind = DocumentKind::Delinquency;
}

/// Accepts any JSON value. Strings are kept as-is; every other non-null value
/// (models sometimes emit `"unit": 12` or a list of phones) is kept as its compact JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
