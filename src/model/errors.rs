use thiserror::Error;

/// Boxed cause carried by tokenizer/model failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// * Capability could not be obtained. Memoized for the life of the session, hence Clone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Model hub unavailable: {0}")]
    Hub(String),

    #[error("Tokenizer load failed: {0}")]
    Tokenizer(String),

    #[error("Model config invalid: {0}")]
    Config(String),

    #[error("Model weights failed to load: {0}")]
    Weights(String),

    #[error("Compute device unavailable: {0}")]
    Device(String),
}

// * Tokenization or generation failed, or there was no capability to run.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Model unavailable")]
    ModelUnavailable,

    #[error("Tokenization failed: {0}")]
    Tokenize(#[source] BoxError),

    #[error("Generation failed: {0}")]
    Generate(#[source] BoxError),

    #[error("Decoding failed: {0}")]
    Decode(#[source] BoxError),

    #[error("Model returned {output_len} tokens for a {prompt_len}-token prompt")]
    PromptNotEchoed { prompt_len: usize, output_len: usize },

    #[error("Generation lock poisoned by an earlier panic")]
    Poisoned,
}
