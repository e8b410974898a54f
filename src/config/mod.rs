// * Typed configuration for every stage of the brief pipeline.
// * Defaults come from `constants`; `BriefConfig::from_env` overlays environment variables.

pub mod constants;

use crate::model::{DevicePreference, GenerationConfig, ModelConfig, SamplingPolicy};
use crate::network::FetchConfig;
use crate::refinery::ExtractorConfig;
use constants::*;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Aggregated configuration for fetch, extraction, model and generation
#[derive(Debug, Clone)]
pub struct BriefConfig {
    pub fetch: FetchConfig,
    pub extractor: ExtractorConfig,
    pub model: ModelConfig,
    pub generation: GenerationConfig,
    /// Character budget applied before tokenization
    pub max_input_chars: usize,
    /// Minimum extracted characters required before summarizing
    pub min_content_chars: usize,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            extractor: ExtractorConfig::default(),
            model: ModelConfig::default(),
            generation: GenerationConfig::default(),
            max_input_chars: MAX_INPUT_CHARS,
            min_content_chars: MIN_CONTENT_CHARS,
        }
    }
}

impl BriefConfig {
    /// Loads `.env` (if present) and overlays `PAGE_BRIEF_*` variables onto the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup (environment, map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(model_id) = lookup("PAGE_BRIEF_MODEL") {
            config.model.model_id = model_id;
        }
        if let Some(revision) = lookup("PAGE_BRIEF_REVISION") {
            config.model.revision = revision;
        }
        if let Some(device) = lookup("PAGE_BRIEF_DEVICE") {
            config.model.device = parse_value("PAGE_BRIEF_DEVICE", &device)?;
        }
        if let Some(max_chars) = lookup("PAGE_BRIEF_MAX_CHARS") {
            config.max_input_chars = parse_value("PAGE_BRIEF_MAX_CHARS", &max_chars)?;
        }
        if let Some(min_segment) = lookup("PAGE_BRIEF_MIN_SEGMENT") {
            config.extractor.min_segment_chars =
                parse_value("PAGE_BRIEF_MIN_SEGMENT", &min_segment)?;
        }
        if let Some(max_new) = lookup("PAGE_BRIEF_MAX_NEW_TOKENS") {
            config.generation.max_new_tokens = parse_value("PAGE_BRIEF_MAX_NEW_TOKENS", &max_new)?;
        }
        if let Some(temperature) = lookup("PAGE_BRIEF_TEMPERATURE") {
            let temperature: f64 = parse_value("PAGE_BRIEF_TEMPERATURE", &temperature)?;
            config.generation.sampling = config.generation.sampling.with_temperature(temperature);
        }
        if let Some(seed) = lookup("PAGE_BRIEF_SEED") {
            config.generation.seed = parse_value("PAGE_BRIEF_SEED", &seed)?;
        }

        Ok(config)
    }

    /// Switches generation to deterministic argmax decoding
    pub fn use_greedy(&mut self) {
        self.generation.sampling = SamplingPolicy::Greedy;
    }

    /// Forces inference onto the CPU
    pub fn force_cpu(&mut self) {
        self.model.device = DevicePreference::Cpu;
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
