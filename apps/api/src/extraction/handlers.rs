use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::models::{
    ContactRecord, DelinquencyRecord, DocumentKind, MergedRecord, RawDocument,
};
use crate::state::AppState;

/// POST /api/v1/reconcile
///
/// Multipart form with one `contacts` and one `delinquency` file.
pub async fn handle_reconcile(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<MergedRecord>>, AppError> {
    let mut documents = read_documents(multipart).await?;

    let contacts = documents.remove(&DocumentKind::Contacts);
    let delinquency = documents.remove(&DocumentKind::Delinquency);
    let (Some(contacts), Some(delinquency)) = (contacts, delinquency) else {
        return Err(AppError::InputMissing(
            "Both files (contacts and delinquency) are required".to_string(),
        ));
    };

    let merged = state
        .pipeline
        .reconcile_documents(&contacts, &delinquency)
        .await?;
    Ok(Json(merged))
}

/// POST /api/v1/extract/:kind
///
/// Multipart form with a single `document` file; returns the raw records for that kind.
pub async fn handle_extract(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let kind: DocumentKind = kind.parse().map_err(AppError::Validation)?;

    let mut document = None;
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() != Some("document") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        if document.is_some() {
            return Err(AppError::Validation(
                "Only one document file may be uploaded".to_string(),
            ));
        }
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        document = Some(RawDocument::new(kind, content));
    }

    let document = document
        .ok_or_else(|| AppError::InputMissing("A document file is required".to_string()))?;

    let response = match kind {
        DocumentKind::Contacts => Json(
            state
                .pipeline
                .extract_document::<ContactRecord>(&document)
                .await?,
        )
        .into_response(),
        DocumentKind::Delinquency => Json(
            state
                .pipeline
                .extract_document::<DelinquencyRecord>(&document)
                .await?,
        )
        .into_response(),
    };
    Ok(response)
}

/// Collects the uploaded documents keyed by kind. Unknown fields are skipped.
async fn read_documents(
    mut multipart: Multipart,
) -> Result<HashMap<DocumentKind, RawDocument>, AppError> {
    let mut documents = HashMap::new();

    while let Some(field) = next_field(&mut multipart).await? {
        let Some(kind) = field.name().and_then(DocumentKind::from_field_name) else {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        };
        if documents.contains_key(&kind) {
            return Err(AppError::Validation(format!(
                "Only one {kind} file may be uploaded"
            )));
        }

        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read {kind} upload: {e}")))?;
        debug!("Received {kind} upload: {} bytes", content.len());
        documents.insert(kind, RawDocument::new(kind, content));
    }

    Ok(documents)
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>, AppError> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))
}
