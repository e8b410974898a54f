// * Presentation adapter: argument parsing, result rendering and the append-only summary log.

use clap::Parser;
use page_brief::config::constants::DEFAULT_LOG_FILE;
use page_brief::config::{BriefConfig, ConfigError};
use page_brief::model::DevicePreference;
use page_brief::{BriefError, BriefReport};
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Page to summarize (prompted for when omitted)
    pub url: Option<String>,

    /// Hugging Face model repository
    #[arg(long)]
    pub model: Option<String>,

    /// Model repository revision
    #[arg(long)]
    pub revision: Option<String>,

    /// Compute device: auto, cpu, cuda[:N] or metal
    #[arg(long)]
    pub device: Option<DevicePreference>,

    /// Run on the CPU even when an accelerator is available
    #[arg(long)]
    pub cpu: bool,

    /// Deterministic argmax decoding instead of sampling
    #[arg(long)]
    pub greedy: bool,

    /// Sampling temperature (0 means greedy)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Sampling seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Character budget for the model input
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Cap on newly generated tokens
    #[arg(long)]
    pub max_new_tokens: Option<usize>,

    /// File the URL + summary pair is appended to
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Do not append to the log file
    #[arg(long)]
    pub no_log: bool,

    /// Also print the full extracted text
    #[arg(long)]
    pub show_text: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Human-readable logs instead of JSON lines
    #[arg(long)]
    pub pretty_logs: bool,
}

impl Args {
    /// Environment-derived config with command-line overrides on top
    pub fn to_config(&self) -> Result<BriefConfig, ConfigError> {
        let mut config = BriefConfig::from_env()?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut BriefConfig) {
        if let Some(model) = &self.model {
            config.model.model_id = model.clone();
        }
        if let Some(revision) = &self.revision {
            config.model.revision = revision.clone();
        }
        if let Some(device) = self.device {
            config.model.device = device;
        }
        if self.cpu {
            config.force_cpu();
        }
        if let Some(temperature) = self.temperature {
            config.generation.sampling = config.generation.sampling.with_temperature(temperature);
        }
        if self.greedy {
            config.use_greedy();
        }
        if let Some(seed) = self.seed {
            config.generation.seed = seed;
        }
        if let Some(max_chars) = self.max_chars {
            config.max_input_chars = max_chars;
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            config.generation.max_new_tokens = max_new_tokens;
        }
    }
}

pub fn prompt_for_url() -> io::Result<String> {
    eprint!("Enter a URL to scrape and analyze: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn render_text(report: &BriefReport, show_text: bool, out: &mut impl Write) -> io::Result<()> {
    if show_text {
        writeln!(out, "=== Extracted Text ({} characters) ===", report.extracted_chars)?;
        writeln!(out, "{}", report.extracted_text)?;
        writeln!(out)?;
    }
    writeln!(out, "=== AI Summary ===")?;
    writeln!(out, "{}", report.summary)?;
    writeln!(out, "==================")?;
    Ok(())
}

pub fn append_log(path: &Path, url: &str, summary: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "Source: {}", url)?;
    writeln!(file, "Summary: {}", summary)?;
    writeln!(file, "{}", "-".repeat(50))?;
    Ok(())
}

pub fn user_message(error: &BriefError) -> String {
    match error {
        BriefError::Fetch(e) => format!("Failed to fetch page: {}", e),
        BriefError::Extraction(e) => format!("Could not read the page content: {}", e),
        BriefError::InsufficientContent { found, .. } => format!(
            "Not enough text found to analyze ({} characters). The page might be blocked, empty or rendered by JavaScript.",
            found
        ),
        BriefError::Load(e) => format!("Could not load the AI model: {}", e),
        BriefError::Generation(e) => format!("AI model error: {}", e),
        BriefError::Task(e) => format!("Internal error: {}", e),
    }
}
