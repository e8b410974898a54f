mod cli;

use clap::Parser;
use cli::Args;
use page_brief::network::PageFetcher;
use page_brief::ops;
use page_brief::{Briefer, ModelSession, QwenLoader};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.pretty_logs {
        ops::init_tracing_pretty("info");
    } else {
        ops::init_tracing();
    }

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let url = match args.url.clone() {
        Some(url) => url,
        None => match cli::prompt_for_url() {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                eprintln!("Please enter a valid URL.");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Could not read URL: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let fetcher = match PageFetcher::with_config(config.fetch.clone()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Could not build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // * One session per process; the model is loaded lazily on first summary
    let session = Arc::new(ModelSession::new(QwenLoader::new(config.model.clone())));
    let briefer = Briefer::new(config, session);

    let report = match briefer.brief_url(&fetcher, &url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Brief failed");
            eprintln!("{}", cli::user_message(&e));
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    let rendered = if args.json {
        serde_json::to_string_pretty(&report)
            .map_err(std::io::Error::from)
            .and_then(|json| {
                use std::io::Write;
                writeln!(stdout, "{}", json)
            })
    } else {
        cli::render_text(&report, args.show_text, &mut stdout)
    };
    if let Err(e) = rendered {
        eprintln!("Could not write output: {}", e);
        return ExitCode::FAILURE;
    }

    if !args.no_log {
        if let Err(e) = cli::append_log(&args.log_file, &report.url, report.summary.as_str()) {
            tracing::warn!(path = %args.log_file.display(), error = %e, "Could not append to log file");
        }
    }

    ExitCode::SUCCESS
}
