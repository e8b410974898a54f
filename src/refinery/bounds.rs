// * BoundedInput: extracted text cut to a fixed character budget before tokenization.

use crate::refinery::extractor::ExtractedText;
use serde::Serialize;

/// A character-bounded prefix of extracted text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundedInput {
    text: String,
    truncated: bool,
}

impl BoundedInput {
    /// Keeps at most `max_chars` characters, cutting on a character boundary
    pub fn new(text: &str, max_chars: usize) -> Self {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => Self {
                text: text[..byte_idx].to_string(),
                truncated: true,
            },
            None => Self {
                text: text.to_string(),
                truncated: false,
            },
        }
    }

    pub fn from_extracted(extracted: &ExtractedText, max_chars: usize) -> Self {
        Self::new(extracted.text(), max_chars)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for BoundedInput {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
