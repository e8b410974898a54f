// * Summarization Pipeline and the orchestrator that drives it end to end.

pub mod brief;
pub mod summarize;

// * Re-exports for convenient access
pub use crate::model::GenerationError;
pub use brief::{BriefError, BriefReport, Briefer, PreparedInput};
pub use summarize::{summarize, summary_prompt, Summary};
