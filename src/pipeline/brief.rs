// * Orchestrator: fetch -> extract -> content check -> bound -> load model -> summarize.
// * Errors are returned, never printed; the presentation layer owns all messaging.

use crate::config::BriefConfig;
use crate::model::{GenerationConfig, GenerationError, LoadError, ModelLoader, ModelSession};
use crate::network::{FetchError, PageFetcher};
use crate::pipeline::summarize::{summarize, Summary};
use crate::refinery::{BoundedInput, ExtractedText, ExtractionError, RawDocument, TextExtractor};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Not enough text to summarize ({found} characters, need {required})")]
    InsufficientContent { found: usize, required: usize },

    #[error("Model unavailable: {0}")]
    Load(#[from] LoadError),

    #[error("Summary generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Extracted and bounded text, ready for the model
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub url: String,
    pub extracted: ExtractedText,
    pub input: BoundedInput,
}

/// Everything the presentation layer needs to show or persist a result
#[derive(Debug, Clone, Serialize)]
pub struct BriefReport {
    pub url: String,
    pub extracted_chars: usize,
    pub input_chars: usize,
    pub truncated: bool,
    pub summary: Summary,
    pub extracted_text: String,
}

impl BriefReport {
    fn new(prepared: PreparedInput, summary: Summary) -> Self {
        Self {
            extracted_chars: prepared.extracted.char_len(),
            input_chars: prepared.input.char_len(),
            truncated: prepared.input.was_truncated(),
            url: prepared.url,
            summary,
            extracted_text: prepared.extracted.into_text(),
        }
    }
}

pub struct Briefer<L: ModelLoader> {
    config: BriefConfig,
    extractor: TextExtractor,
    session: Arc<ModelSession<L>>,
}

impl<L: ModelLoader + 'static> Briefer<L> {
    pub fn new(config: BriefConfig, session: Arc<ModelSession<L>>) -> Self {
        Self {
            extractor: TextExtractor::with_config(config.extractor.clone()),
            config,
            session,
        }
    }

    pub fn config(&self) -> &BriefConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<ModelSession<L>> {
        &self.session
    }

    /// Extracts text, enforces the minimum content length and applies the character budget
    pub fn prepare(&self, document: &RawDocument) -> Result<PreparedInput, BriefError> {
        let extracted = self.extractor.extract(document)?;
        let found = extracted.char_len();

        tracing::info!(url = %document.url, chars = found, "Extracted text");

        if found < self.config.min_content_chars {
            return Err(BriefError::InsufficientContent {
                found,
                required: self.config.min_content_chars,
            });
        }

        let input = BoundedInput::from_extracted(&extracted, self.config.max_input_chars);
        if input.was_truncated() {
            tracing::debug!(from = found, to = input.char_len(), "Truncated model input");
        }

        Ok(PreparedInput {
            url: document.url.clone(),
            extracted,
            input,
        })
    }

    /// Runs the whole pipeline on an already-fetched document (blocking)
    pub fn brief_document(&self, document: &RawDocument) -> Result<BriefReport, BriefError> {
        let prepared = self.prepare(document)?;
        let summary = run_model(&self.session, &prepared.input, &self.config.generation)?;
        Ok(BriefReport::new(prepared, summary))
    }

    /// Fetches a URL and runs the pipeline; model work happens on the blocking pool
    pub async fn brief_url(
        &self,
        fetcher: &PageFetcher,
        url: &str,
    ) -> Result<BriefReport, BriefError> {
        let document = fetcher.fetch(url).await?;
        let prepared = self.prepare(&document)?;

        let session = Arc::clone(&self.session);
        let generation = self.config.generation.clone();
        let input = prepared.input.clone();

        let summary = tokio::task::spawn_blocking(move || run_model(&session, &input, &generation))
            .await
            .map_err(|e| BriefError::Task(e.to_string()))??;

        Ok(BriefReport::new(prepared, summary))
    }
}

// * A load failure returns here, before summarize is ever called
fn run_model<L: ModelLoader>(
    session: &ModelSession<L>,
    input: &BoundedInput,
    generation: &GenerationConfig,
) -> Result<Summary, BriefError> {
    let capability = session.ensure_loaded()?;
    Ok(summarize(input, Some(capability.as_ref()), generation)?)
}
