use crate::config::constants::FETCH_TIMEOUT_SECS;
use crate::network::errors::FetchError;
use crate::network::identity::BrowserProfile;
use crate::refinery::RawDocument;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

// * Interstitial titles served by anti-bot gateways instead of the requested page
static BLOCK_TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>\s*(Just a moment|Attention Required|Security Check|Access Denied|Checking your browser)")
        .unwrap()
});

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";\s]+)"#).unwrap());

// * Markup the extractor would keep; challenge pages carry none of it
static READABLE_MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(p|h1|h2|h3|article)[\s>]").unwrap());

// * Interstitials stay well under this; larger bodies are real pages
const CHALLENGE_MAX_BYTES: usize = 32 * 1024;

// * Widget and script markers of challenge pages. Ordinary pages embed some
// * of them too (Cloudflare's jsd beacon, Turnstile in comment forms).
const BLOCK_SIGNATURES: [&str; 4] = [
    "captcha-delivery",
    "cf-turnstile",
    "datadome",
    "challenge-platform",
];

/// Settings for the single-attempt page fetch
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Browser identity sent with every request
    pub profile: BrowserProfile,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            profile: BrowserProfile::default(),
        }
    }
}

// * The HTTP collaborator: one GET per URL, browser-like headers, raw bytes out.
pub struct PageFetcher {
    inner: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let headers = config.profile.headers()?;

        let inner = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { inner })
    }

    // * Fetches a URL once and returns the undecoded body.
    pub async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let parsed = validate_url(url)?;

        tracing::info!(url = %parsed, "Fetching page");
        let resp = self.inner.get(parsed.clone()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            tracing::warn!(url = %parsed, status = status.as_u16(), "Non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let charset = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type);

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        detect_block_page(&bytes)?;

        tracing::debug!(url = %parsed, bytes = bytes.len(), charset = ?charset, "Fetched page");
        Ok(RawDocument::new(parsed.to_string(), bytes.to_vec(), charset))
    }
}

/// Parses a URL and rejects anything that is not http(s)
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Extracts the `charset` parameter of a Content-Type header value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    CHARSET_REGEX
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

fn detect_block_page(body: &[u8]) -> Result<(), FetchError> {
    // * Challenge pages are small; scanning the head of the body is enough
    let head = String::from_utf8_lossy(&body[..body.len().min(64 * 1024)]);

    if let Some(cap) = BLOCK_TITLE_REGEX.captures(&head) {
        let trigger = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Err(FetchError::Blocked(format!("Title Trigger: {}", trigger)));
    }

    // * Body markers only count on challenge-sized pages with nothing to read
    if body.len() > CHALLENGE_MAX_BYTES || READABLE_MARKUP_REGEX.is_match(&head) {
        return Ok(());
    }

    for sig in BLOCK_SIGNATURES {
        if head.contains(sig) {
            return Err(FetchError::Blocked(format!("Body Trigger: {}", sig)));
        }
    }

    Ok(())
}
