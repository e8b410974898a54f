//! Fetch a web page, pull out its readable text and summarize it with a locally
//! hosted causal language model.
//!
//! The library exposes three core calls:
//! [`refinery::extract`], [`model::ModelSession::ensure_loaded`] and
//! [`pipeline::summarize`]. [`pipeline::Briefer`] chains them together with the
//! fetch adapter in [`network`].

pub mod config;
pub mod model;
pub mod network;
pub mod ops;
pub mod pipeline;
pub mod refinery;

pub use config::BriefConfig;
pub use model::{Capability, LoadError, ModelSession, QwenLoader};
pub use pipeline::{summarize, BriefError, BriefReport, Briefer, GenerationError, Summary};
pub use refinery::{extract, extract_str, BoundedInput, ExtractedText, ExtractionError, RawDocument};
