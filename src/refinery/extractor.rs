// * HTML Text Extractor
// * Drops structurally non-content subtrees, keeps h1-h3 and paragraphs in document order,
// * and filters out short segments (menus, labels, buttons).

use crate::config::constants::MIN_SEGMENT_CHARS;
use crate::refinery::document::RawDocument;
use crate::refinery::errors::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// * Subtrees rooted at these elements never contribute text
pub const NON_CONTENT_TAGS: [&str; 8] = [
    "script", "style", "nav", "footer", "header", "form", "iframe", "noscript",
];

// * Content-bearing elements, matched in document order
static SELECTOR_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, p").unwrap());

/// Configuration for text extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Segments with fewer characters than this are discarded
    pub min_segment_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_segment_chars: MIN_SEGMENT_CHARS,
        }
    }
}

/// Ordered, non-empty text segments and their space-joined form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    segments: Vec<String>,
    text: String,
}

impl ExtractedText {
    fn from_segments(segments: Vec<String>) -> Self {
        let text = segments.join(" ");
        Self { segments, text }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The segments joined with single spaces
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Turns raw HTML into flat, ordered plain text
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Decodes a fetched document and extracts its text
    pub fn extract(&self, document: &RawDocument) -> Result<ExtractedText, ExtractionError> {
        let html = document.decode()?;
        let extracted = self.extract_html(&html);

        tracing::debug!(
            url = %document.url,
            segments = extracted.segments.len(),
            chars = extracted.char_len(),
            "Extracted text"
        );
        Ok(extracted)
    }

    /// Extracts text from already-decoded HTML
    pub fn extract_html(&self, html: &str) -> ExtractedText {
        let document = Html::parse_document(html);
        let mut segments = Vec::new();

        for element in document.select(&SELECTOR_CONTENT) {
            if has_non_content_ancestor(element) {
                continue;
            }

            let mut raw = String::new();
            collect_visible_text(element, &mut raw);
            let segment = collapse_whitespace(&raw);

            if segment.is_empty() || segment.chars().count() < self.config.min_segment_chars {
                continue;
            }
            segments.push(segment);
        }

        ExtractedText::from_segments(segments)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts text from a fetched document with default settings
pub fn extract(document: &RawDocument) -> Result<ExtractedText, ExtractionError> {
    TextExtractor::new().extract(document)
}

/// Extracts text from an HTML string with default settings
pub fn extract_str(html: &str) -> ExtractedText {
    TextExtractor::new().extract_html(html)
}

fn is_non_content(tag: &str) -> bool {
    NON_CONTENT_TAGS.contains(&tag)
}

fn has_non_content_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_non_content(ancestor.value().name()))
}

// * Depth-first text collection that skips non-content descendants (e.g. inline <script>).
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if is_non_content(name) {
                continue;
            }
            if name == "br" {
                out.push(' ');
                continue;
            }
            collect_visible_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARAGRAPH: &str =
        "This paragraph is comfortably longer than the thirty character noise threshold.";

    #[test]
    fn test_news_scenario() {
        let html = "<nav>Menu</nav><h1>Breaking News Today Happened</h1><p>This is a sufficiently long paragraph describing the event in detail.</p><footer>Copyright</footer>";

        let result = extract_str(html);

        // * "Breaking News Today Happened" is 28 chars, under the 30-char floor
        assert_eq!(
            result.text(),
            "This is a sufficiently long paragraph describing the event in detail."
        );
        assert_eq!(result.segments().len(), 1);
    }

    #[test]
    fn test_short_paragraph_yields_empty_text() {
        let result = extract_str("<p>Hi</p>");
        assert!(result.is_empty());
        assert_eq!(result.text(), "");
        assert!(result.segments().is_empty());
    }

    #[test]
    fn test_non_content_subtrees_removed() {
        let html = format!(
            r#"
            <html>
            <head><style>p {{ color: red; }} /* a rather long stylesheet comment here */</style></head>
            <body>
                <header><h1>Site Header Title That Is Quite Long Indeed</h1></header>
                <nav><p>Navigation paragraph that is long enough to pass the filter</p></nav>
                <form><p>Form paragraph that is long enough to pass the filter too</p></form>
                <noscript><p>Enable JavaScript to view this site, it is really needed</p></noscript>
                <p>{}</p>
                <script>var secret = "script text that must never be extracted by anyone";</script>
                <footer><p>Footer paragraph that is long enough to pass the filter</p></footer>
            </body>
            </html>
            "#,
            LONG_PARAGRAPH
        );

        let result = extract_str(&html);

        assert_eq!(result.text(), LONG_PARAGRAPH);
        assert!(!result.text().contains("Header"));
        assert!(!result.text().contains("Navigation"));
        assert!(!result.text().contains("secret"));
    }

    #[test]
    fn test_inline_script_inside_paragraph_is_skipped() {
        let html = "<p>Readable words around an inline script <script>document.write('hidden payload')</script>that stay in order.</p>";

        let result = extract_str(html);

        assert_eq!(
            result.text(),
            "Readable words around an inline script that stay in order."
        );
        assert!(!result.text().contains("hidden payload"));
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        let html = "<p>\n    Lots   of\tinternal \n whitespace   in this paragraph text   \n</p>";

        let result = extract_str(html);

        assert_eq!(result.text(), "Lots of internal whitespace in this paragraph text");
        for segment in result.segments() {
            assert_eq!(segment.trim(), segment);
            assert!(segment.chars().count() >= MIN_SEGMENT_CHARS);
        }
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <p>First paragraph that is long enough to be kept around.</p>
            <h2>A second level heading with plenty of characters</h2>
            <p>Third paragraph that is also long enough to be kept.</p>
            <h3>Fourth item is a level three heading, long enough</h3>
        "#;

        let result = extract_str(html);

        assert_eq!(result.segments().len(), 4);
        assert!(result.segments()[0].starts_with("First"));
        assert!(result.segments()[1].starts_with("A second"));
        assert!(result.segments()[2].starts_with("Third"));
        assert!(result.segments()[3].starts_with("Fourth"));
    }

    #[test]
    fn test_only_h1_to_h3_and_paragraphs_selected() {
        let html = r#"
            <h4>A level four heading that is long enough to pass</h4>
            <div>A bare div whose text is long enough to pass the filter</div>
            <li>A list item whose text is long enough to pass the filter</li>
            <p>The only paragraph that should come through in the output.</p>
        "#;

        let result = extract_str(html);

        assert_eq!(
            result.text(),
            "The only paragraph that should come through in the output."
        );
    }

    #[test]
    fn test_threshold_boundary() {
        // * Exactly 30 characters is kept, 29 is dropped
        let thirty = "abcdefghij abcdefghij abcdefgh";
        let twenty_nine = "abcdefghij abcdefghij abcdefg";
        assert_eq!(thirty.chars().count(), 30);

        let result = extract_str(&format!("<p>{}</p><p>{}</p>", thirty, twenty_nine));

        assert_eq!(result.segments(), &[thirty.to_string()]);
    }

    #[test]
    fn test_idempotent_on_rewrapped_output() {
        let html = r#"
            <article>
                <h1>Stable Output Under Reparsing Of Text</h1>
                <p>Some    paragraph text that is long enough
                   to survive the filter and be joined.</p>
            </article>
        "#;

        let first = extract_str(html);
        let second = extract_str(&format!("<p>{}</p>", first.text()));

        assert_eq!(first.text(), second.text());
    }

    #[test]
    fn test_custom_min_segment() {
        let extractor = TextExtractor::with_config(ExtractorConfig { min_segment_chars: 2 });
        let result = extractor.extract_html("<p>Hi</p><p> </p>");

        assert_eq!(result.text(), "Hi");
        assert_eq!(result.segments().len(), 1);
    }

    #[test]
    fn test_extract_from_raw_document() {
        let doc = RawDocument::from_html(
            "https://example.com/post",
            &format!("<html><body><p>{}</p></body></html>", LONG_PARAGRAPH),
        );

        let result = extract(&doc).unwrap();

        assert_eq!(result.text(), LONG_PARAGRAPH);
        assert_eq!(result.char_len(), LONG_PARAGRAPH.chars().count());
    }

    #[test]
    fn test_line_breaks_become_spaces() {
        let result = extract_str("<p>First line of the paragraph<br>second line of it</p>");
        assert_eq!(result.text(), "First line of the paragraph second line of it");
    }
}
