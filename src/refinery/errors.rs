use thiserror::Error;

// * Failures local to text extraction. Callers may substitute empty text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Payload looks binary, not HTML")]
    BinaryContent,

    #[error("Unsupported character encoding: {0}")]
    UnsupportedEncoding(String),
}
