//! Extraction pipeline: load, prompt, generate, sanitize, parse; then reconcile.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::extraction::loader::DocumentLoader;
use crate::extraction::models::{
    ContactRecord, DelinquencyRecord, ExtractedRecord, MergedRecord, RawDocument,
};
use crate::extraction::parser::parse_records;
use crate::extraction::prompts::build_prompt;
use crate::extraction::reconcile::reconcile;
use crate::extraction::sanitize::Sanitizer;
use crate::llm_client::TextGenerator;

/// The collaborators one extraction needs. Cheap to clone; shared through `AppState`.
#[derive(Clone)]
pub struct Pipeline {
    llm: Arc<dyn TextGenerator>,
    loader: Arc<dyn DocumentLoader>,
    sanitizer: Sanitizer,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        loader: Arc<dyn DocumentLoader>,
        sanitizer: Sanitizer,
    ) -> Self {
        Self {
            llm,
            loader,
            sanitizer,
        }
    }

    /// Runs one document through the model and returns its records.
    pub async fn extract<T: ExtractedRecord>(
        &self,
        document: &RawDocument,
    ) -> Result<Vec<T>, AppError> {
        let kind = document.kind;
        if kind != T::KIND {
            return Err(AppError::Internal(anyhow!(
                "{kind} document routed to {} extraction",
                T::KIND
            )));
        }

        let text = self
            .loader
            .extract_text(document)
            .await
            .map_err(|e| AppError::DocumentLoad {
                kind,
                message: e.message,
            })?;

        let prompt = build_prompt(kind, &text);
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| AppError::ServiceUnavailable {
                kind,
                message: e.to_string(),
            })?;

        info!("Model reply for {kind} document: {} bytes", reply.len());
        debug!("Raw model reply for {kind} document: {reply}");

        let sanitized = self.sanitizer.sanitize(&reply);
        let records = parse_records::<T>(&reply, sanitized)
            .map_err(|error| AppError::Parse { kind, error })?;

        info!("Extracted {} {kind} records", records.len());
        Ok(records)
    }

    /// Extracts a single document as its own traced run.
    #[tracing::instrument(skip_all, fields(run_id = %uuid::Uuid::new_v4(), kind = %document.kind))]
    pub async fn extract_document<T: ExtractedRecord>(
        &self,
        document: &RawDocument,
    ) -> Result<Vec<T>, AppError> {
        self.extract(document).await
    }

    /// Extracts both documents concurrently and joins them.
    /// Nothing is reconciled unless both extractions succeed.
    #[tracing::instrument(skip_all, fields(run_id = %uuid::Uuid::new_v4()))]
    pub async fn reconcile_documents(
        &self,
        contacts: &RawDocument,
        delinquency: &RawDocument,
    ) -> Result<Vec<MergedRecord>, AppError> {
        let (contacts, delinquency) = tokio::join!(
            self.extract::<ContactRecord>(contacts),
            self.extract::<DelinquencyRecord>(delinquency),
        );

        let (contacts, delinquency) = match (contacts, delinquency) {
            (Ok(contacts), Ok(delinquency)) => (contacts, delinquency),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
            (Err(contacts_err), Err(delinquency_err)) => {
                warn!("Delinquency extraction failed as well: {delinquency_err}");
                return Err(contacts_err);
            }
        };

        let merged = reconcile(&delinquency, &contacts);
        let matched = merged
            .iter()
            .filter(|m| m.email.is_some() || m.phone.is_some())
            .count();
        info!(
            "Reconciled {} delinquency records against {} contacts ({matched} with contact details)",
            delinquency.len(),
            contacts.len()
        );

        Ok(merged)
    }
}
