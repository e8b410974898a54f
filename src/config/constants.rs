// * Configuration Constants
// * Central location for all tunable thresholds, bounds and model defaults

// * Segments shorter than this (in characters) are treated as menu/label noise
pub const MIN_SEGMENT_CHARS: usize = 30;

// * Hard character budget applied to extracted text before tokenization
pub const MAX_INPUT_CHARS: usize = 8000;

// * Extracted text shorter than this is not worth summarizing
pub const MIN_CONTENT_CHARS: usize = 100;

// * Upper bound on newly generated tokens per summary
pub const MAX_NEW_TOKENS: usize = 512;

// * Page fetch timeout in seconds (single attempt, no retries)
pub const FETCH_TIMEOUT_SECS: u64 = 15;

// * Hugging Face model repository and revision loaded by default
pub const DEFAULT_MODEL_ID: &str = "Qwen/Qwen2.5-1.5B-Instruct";
pub const DEFAULT_REVISION: &str = "main";

// * Sampling defaults published with the Qwen2.5 instruct checkpoints
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_K: usize = 20;
pub const DEFAULT_TOP_P: f64 = 0.8;
pub const DEFAULT_REPEAT_PENALTY: f32 = 1.05;
pub const DEFAULT_REPEAT_LAST_N: usize = 64;
pub const DEFAULT_SEED: u64 = 299_792_458;

// * Prompt framing
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that summarizes web content concisely and professionally.";
pub const USER_PREAMBLE: &str = "Please summarize the following text:";

// * Append-only log of URL + summary pairs written by the CLI
pub const DEFAULT_LOG_FILE: &str = "ai_analysis_log.txt";
