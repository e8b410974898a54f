// * The Refinery: raw bytes -> decoded HTML -> ordered plain text -> bounded model input.

pub mod bounds;
pub mod document;
pub mod errors;
pub mod extractor;

// * Re-exports for convenient access
pub use bounds::BoundedInput;
pub use document::RawDocument;
pub use errors::ExtractionError;
pub use extractor::{
    extract, extract_str, ExtractedText, ExtractorConfig, TextExtractor, NON_CONTENT_TAGS,
};
