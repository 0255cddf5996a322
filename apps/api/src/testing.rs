//! Test doubles for the pipeline's external collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::span;
use tracing_subscriber::{layer::Context, Layer};

use crate::config::Config;
use crate::extraction::loader::{DocumentLoader, LoadError};
use crate::extraction::models::{DocumentKind, RawDocument};
use crate::extraction::pipeline::Pipeline;
use crate::extraction::sanitize::Sanitizer;
use crate::llm_client::{LlmError, TextGenerator};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Unavailable,
}

impl ScriptedReply {
    pub fn text(reply: &str) -> Self {
        ScriptedReply::Text(reply.to_string())
    }
}

/// Answers by document kind, detected from the heading in the prompt.
#[derive(Clone)]
pub struct ScriptedGenerator {
    contacts: ScriptedReply,
    delinquency: ScriptedReply,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new(contacts: ScriptedReply, delinquency: ScriptedReply) -> Self {
        Self {
            contacts,
            delinquency,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let heading = format!("\n{}:\n", DocumentKind::Contacts.label());
        let reply = if prompt.contains(&heading) {
            &self.contacts
        } else {
            &self.delinquency
        };

        match reply {
            ScriptedReply::Text(text) => Ok(text.clone()),
            ScriptedReply::Unavailable => Err(LlmError::Api {
                status: 503,
                message: "The model is overloaded".to_string(),
            }),
        }
    }
}

/// Treats uploads as UTF-8 text. Content starting with `%PDF-broken` fails to load.
pub struct TextLoader;

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn extract_text(&self, document: &RawDocument) -> Result<String, LoadError> {
        if document.content.starts_with(b"%PDF-broken") {
            return Err(LoadError {
                kind: document.kind,
                message: "invalid file header".to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&document.content).into_owned())
    }
}

pub fn pipeline_with(generator: ScriptedGenerator) -> Pipeline {
    Pipeline::new(
        Arc::new(generator),
        Arc::new(TextLoader),
        Sanitizer::default(),
    )
}

pub fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        gemini_model: "gemini-2.5-flash".to_string(),
        llm_timeout_secs: 5,
        fence_language: "json".to_string(),
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(generator: ScriptedGenerator) -> AppState {
    AppState {
        pipeline: pipeline_with(generator),
        config: test_config(),
    }
}

/// Records the name and field names of every span opened while installed.
#[derive(Clone, Default)]
pub struct SpanRecorder {
    spans: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl SpanRecorder {
    pub fn spans(&self) -> Vec<(String, Vec<String>)> {
        self.spans.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> Layer<S> for SpanRecorder {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        let metadata = attrs.metadata();
        let fields = metadata
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        self.spans
            .lock()
            .unwrap()
            .push((metadata.name().to_string(), fields));
    }
}
