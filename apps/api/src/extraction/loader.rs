//! Document loader: turns uploaded PDF bytes into plain text.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::extraction::models::{DocumentKind, RawDocument};

#[derive(Debug, Error)]
#[error("could not extract text from {kind} document: {message}")]
pub struct LoadError {
    pub kind: DocumentKind,
    pub message: String,
}

/// Converts a document's binary content into plain text.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn extract_text(&self, document: &RawDocument) -> Result<String, LoadError>;
}

/// `pdf-extract` backed loader. Decoding runs on the blocking pool.
pub struct PdfLoader;

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn extract_text(&self, document: &RawDocument) -> Result<String, LoadError> {
        let kind = document.kind;
        let content = document.content.clone();

        let joined =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&content)).await;

        let text = match joined {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Err(LoadError {
                    kind,
                    message: e.to_string(),
                })
            }
            // pdf-extract panics on some malformed inputs
            Err(e) => {
                return Err(LoadError {
                    kind,
                    message: format!("PDF decoder aborted: {e}"),
                })
            }
        };

        debug!("Extracted {} chars from {kind} document", text.chars().count());
        Ok(text)
    }
}
