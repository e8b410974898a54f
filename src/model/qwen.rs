// * Qwen2 capability backed by candle.
// * Weights, tokenizer and config come from the Hugging Face hub (cached locally by hf-hub).

use crate::config::constants::{DEFAULT_MODEL_ID, DEFAULT_REVISION};
use crate::model::capability::{Capability, CausalModel, TextTokenizer};
use crate::model::chat::ChatMlTemplate;
use crate::model::device::{device_label, select_device, DevicePreference};
use crate::model::errors::{BoxError, LoadError};
use crate::model::generation::GenerationConfig;
use crate::model::session::ModelLoader;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::qwen2::{Config as Qwen2Config, ModelForCausalLM};
use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tokenizers::Tokenizer;

// * Tokens that end an assistant turn
const STOP_TOKENS: [&str; 2] = ["<|im_end|>", "<|endoftext|>"];

/// Which checkpoint to load and where to run it
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model_id: String,
    pub revision: String,
    pub device: DevicePreference,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            device: DevicePreference::Auto,
        }
    }
}

pub struct QwenLoader {
    config: ModelConfig,
}

impl QwenLoader {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl ModelLoader for QwenLoader {
    fn load(&self) -> Result<Capability, LoadError> {
        let model_id = &self.config.model_id;
        tracing::info!(model = %model_id, revision = %self.config.revision, "Resolving model files");

        let api = Api::new().map_err(|e| LoadError::Hub(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            model_id.clone(),
            RepoType::Model,
            self.config.revision.clone(),
        ));

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| LoadError::Hub(e.to_string()))?;
        let config_path = repo
            .get("config.json")
            .map_err(|e| LoadError::Hub(e.to_string()))?;
        let weight_paths = resolve_weights(&repo)?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| LoadError::Tokenizer(e.to_string()))?;

        let raw_config =
            std::fs::read(&config_path).map_err(|e| LoadError::Config(e.to_string()))?;
        let model_config: Qwen2Config =
            serde_json::from_slice(&raw_config).map_err(|e| LoadError::Config(e.to_string()))?;

        let device =
            select_device(self.config.device).map_err(|e| LoadError::Device(e.to_string()))?;
        let dtype = if device.is_cpu() { DType::F32 } else { DType::F16 };
        tracing::info!(device = %device_label(&device), dtype = ?dtype, shards = weight_paths.len(), "Loading weights");

        // * SAFETY: the mapped files live in the hub cache and are not modified while mapped
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&weight_paths, dtype, &device) }
            .map_err(|e| LoadError::Weights(e.to_string()))?;
        let model =
            ModelForCausalLM::new(&model_config, vb).map_err(|e| LoadError::Weights(e.to_string()))?;

        let stop_tokens: Vec<u32> = STOP_TOKENS
            .iter()
            .filter_map(|token| tokenizer.token_to_id(token))
            .collect();
        if stop_tokens.is_empty() {
            tracing::warn!("No stop tokens in vocabulary; generation will run to the token cap");
        }

        let label = device_label(&device);
        Ok(Capability::new(
            model_id.clone(),
            label,
            Box::new(HfTokenizer { inner: tokenizer }),
            Box::new(ChatMlTemplate),
            Box::new(QwenModel {
                model,
                device,
                stop_tokens,
            }),
        ))
    }
}

// * Sharded checkpoints ship an index; small ones a single file.
fn resolve_weights(repo: &ApiRepo) -> Result<Vec<PathBuf>, LoadError> {
    match repo.get("model.safetensors.index.json") {
        Ok(index_path) => {
            let raw = std::fs::read(&index_path).map_err(|e| LoadError::Weights(e.to_string()))?;
            let index: serde_json::Value =
                serde_json::from_slice(&raw).map_err(|e| LoadError::Weights(e.to_string()))?;
            let shards: BTreeSet<&str> = index["weight_map"]
                .as_object()
                .ok_or_else(|| LoadError::Weights("index has no weight_map".to_string()))?
                .values()
                .filter_map(|v| v.as_str())
                .collect();

            shards
                .into_iter()
                .map(|shard| repo.get(shard).map_err(|e| LoadError::Hub(e.to_string())))
                .collect()
        }
        Err(_) => {
            let single = repo
                .get("model.safetensors")
                .map_err(|e| LoadError::Hub(e.to_string()))?;
            Ok(vec![single])
        }
    }
}

struct HfTokenizer {
    inner: Tokenizer,
}

impl TextTokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
        let encoding = self.inner.encode(text, true)?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, BoxError> {
        self.inner.decode(ids, skip_special_tokens)
    }
}

struct QwenModel {
    model: ModelForCausalLM,
    device: Device,
    stop_tokens: Vec<u32>,
}

impl CausalModel for QwenModel {
    fn generate(&mut self, prompt: &[u32], config: &GenerationConfig) -> Result<Vec<u32>, BoxError> {
        self.model.clear_kv_cache();

        let mut tokens = prompt.to_vec();
        let mut logits_processor =
            LogitsProcessor::from_sampling(config.seed, config.sampling.to_sampling());

        for index in 0..config.max_new_tokens {
            // * First step feeds the whole prompt, later steps only the newest token (KV cache)
            let context_size = if index > 0 { 1 } else { tokens.len() };
            let start_pos = tokens.len().saturating_sub(context_size);
            let input = Tensor::new(&tokens[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.forward(&input, start_pos)?;
            let logits = logits.squeeze(0)?.squeeze(0)?.to_dtype(DType::F32)?;
            let logits = if config.repeat_penalty == 1.0 {
                logits
            } else {
                let start_at = tokens.len().saturating_sub(config.repeat_last_n);
                candle_transformers::utils::apply_repeat_penalty(
                    &logits,
                    config.repeat_penalty,
                    &tokens[start_at..],
                )?
            };

            let next = logits_processor.sample(&logits)?;
            tokens.push(next);
            if self.stop_tokens.contains(&next) {
                break;
            }
        }

        tracing::debug!(
            prompt_tokens = prompt.len(),
            new_tokens = tokens.len() - prompt.len(),
            "Generation finished"
        );
        Ok(tokens)
    }
}
