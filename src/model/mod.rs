// * Model Session layer: the loaded tokenizer + causal LM, its chat format and generation policy.

pub mod capability;
pub mod chat;
pub mod device;
pub mod errors;
pub mod generation;
pub mod qwen;
pub mod session;

// * Re-exports for convenient access
pub use capability::{Capability, CausalModel, TextTokenizer};
pub use chat::{ChatMessage, ChatMlTemplate, ChatPrompt, ChatRole, ChatTemplate};
pub use device::{select_device, DevicePreference};
pub use errors::{BoxError, GenerationError, LoadError};
pub use generation::{GenerationConfig, SamplingPolicy};
pub use qwen::{ModelConfig, QwenLoader};
pub use session::{ModelLoader, ModelSession};
