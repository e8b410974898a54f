// * RawDocument: fetched bytes plus the charset the server claimed.

use crate::refinery::errors::ExtractionError;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use regex::bytes::Regex;
use std::sync::LazyLock;

// * How far into the payload to look for NUL bytes and <meta charset>
const PRESCAN_LEN: usize = 1024;

// * Matches both <meta charset="x"> and <meta http-equiv content="text/html; charset=x">
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap()
});

/// Undecoded response body, consumed once by the extractor
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub bytes: Vec<u8>,
    /// Lower-cased charset label from Content-Type, if any
    pub charset: Option<String>,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, bytes: Vec<u8>, charset: Option<String>) -> Self {
        Self {
            url: url.into(),
            bytes,
            charset,
        }
    }

    /// Wraps an in-memory HTML string (tests, local files)
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self::new(url, html.as_bytes().to_vec(), Some("utf-8".to_string()))
    }

    /// Picks the encoding: byte order mark, then the declared charset, then
    /// `<meta charset>` in the head of the payload, then UTF-8.
    pub fn encoding(&self) -> Result<&'static Encoding, ExtractionError> {
        if let Some((encoding, _)) = Encoding::for_bom(&self.bytes) {
            return Ok(encoding);
        }

        if let Some(label) = self.charset.as_deref() {
            return Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| ExtractionError::UnsupportedEncoding(label.to_string()));
        }

        Ok(self.meta_encoding().unwrap_or(UTF_8))
    }

    fn meta_encoding(&self) -> Option<&'static Encoding> {
        let head = &self.bytes[..self.bytes.len().min(PRESCAN_LEN)];
        let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
        let encoding = Encoding::for_label(label.as_bytes())?;

        // * A byte-oriented prescan can't have read a UTF-16 document
        if encoding == UTF_16LE || encoding == UTF_16BE {
            Some(UTF_8)
        } else {
            Some(encoding)
        }
    }

    /// Decodes the payload into text; malformed sequences become U+FFFD
    pub fn decode(&self) -> Result<String, ExtractionError> {
        let encoding = self.encoding()?;

        let utf16 = encoding == UTF_16LE || encoding == UTF_16BE;
        let sniff = &self.bytes[..self.bytes.len().min(PRESCAN_LEN)];
        if !utf16 && sniff.contains(&0) {
            return Err(ExtractionError::BinaryContent);
        }

        let (text, used, had_errors) = encoding.decode(&self.bytes);
        if had_errors {
            tracing::debug!(url = %self.url, encoding = used.name(), "Replaced malformed byte sequences");
        }
        Ok(text.into_owned())
    }
}
