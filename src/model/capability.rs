// * Capability: tokenizer + chat formatting rule + generative model, loaded once.
// * Generation goes through a mutex so only one call runs against the model at a time.

use crate::model::chat::ChatTemplate;
use crate::model::errors::{BoxError, GenerationError};
use crate::model::generation::GenerationConfig;
use std::fmt;
use std::sync::Mutex;

pub trait TextTokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError>;

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, BoxError>;
}

pub trait CausalModel: Send {
    /// Runs generation and returns the prompt ids followed by the continuation.
    fn generate(&mut self, prompt: &[u32], config: &GenerationConfig) -> Result<Vec<u32>, BoxError>;
}

pub struct Capability {
    model_id: String,
    device: String,
    tokenizer: Box<dyn TextTokenizer>,
    template: Box<dyn ChatTemplate>,
    model: Mutex<Box<dyn CausalModel>>,
}

impl Capability {
    pub fn new(
        model_id: impl Into<String>,
        device: impl Into<String>,
        tokenizer: Box<dyn TextTokenizer>,
        template: Box<dyn ChatTemplate>,
        model: Box<dyn CausalModel>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            device: device.into(),
            tokenizer,
            template,
            model: Mutex::new(model),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Human-readable label of the compute device the model lives on
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn tokenizer(&self) -> &dyn TextTokenizer {
        self.tokenizer.as_ref()
    }

    pub fn template(&self) -> &dyn ChatTemplate {
        self.template.as_ref()
    }

    /// Serialized generation; blocks while another call holds the model
    pub fn generate(
        &self,
        prompt: &[u32],
        config: &GenerationConfig,
    ) -> Result<Vec<u32>, GenerationError> {
        let mut model = self.model.lock().map_err(|_| GenerationError::Poisoned)?;
        model
            .generate(prompt, config)
            .map_err(GenerationError::Generate)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("model_id", &self.model_id)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}
