use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use skimmer_core::{Config, GroqClient, ProgressEvent, SummaryStyle, config_file};
use skimmer_pdf::PdfExtractBackend;

mod output;

use output::ColorMode;

/// Skimmer - Summarize PDF documents with an LLM
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the PDF file to summarize
    file_path: PathBuf,

    /// Summary style
    #[arg(short, long, value_enum, default_value_t = StyleArg::Brief)]
    style: StyleArg,

    /// Groq API key
    #[arg(long)]
    api_key: Option<String>,

    /// Chat model to use
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum generated tokens in the summary
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Base URL of the OpenAI-compatible completions API
    #[arg(long)]
    base_url: Option<String>,

    /// Path to write the report to instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Include the full extracted text in the report
    #[arg(long)]
    full_text: bool,
}

/// Summary style as selected on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    /// Brief Summary
    Brief,
    /// Bullet Points
    Bullets,
    /// Extract Action Items
    Actions,
}

impl From<StyleArg> for SummaryStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Brief => SummaryStyle::Brief,
            StyleArg::Bullets => SummaryStyle::Bullets,
            StyleArg::Actions => SummaryStyle::ActionItems,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.file_path.exists() {
        anyhow::bail!("File not found: {}", cli.file_path.display());
    }

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let defaults = Config::default();

    let api_key = cli
        .api_key
        .or_else(|| std::env::var("GROQ_API_KEY").ok())
        .or_else(|| file_config.groq_api_key());
    if api_key.is_none() {
        anyhow::bail!(
            "No Groq API key configured. Pass --api-key, set GROQ_API_KEY, or add it to the config file."
        );
    }

    let config = Config {
        api_key,
        base_url: cli
            .base_url
            .or_else(|| std::env::var("SKIMMER_BASE_URL").ok())
            .or_else(|| file_config.base_url())
            .unwrap_or(defaults.base_url),
        model: cli
            .model
            .or_else(|| std::env::var("SKIMMER_MODEL").ok())
            .or_else(|| file_config.model())
            .unwrap_or(defaults.model),
        temperature: cli
            .temperature
            .or_else(|| file_config.temperature())
            .unwrap_or(defaults.temperature),
        max_tokens: cli
            .max_tokens
            .or_else(|| file_config.max_tokens())
            .unwrap_or(defaults.max_tokens),
        timeout_secs: cli
            .timeout
            .or_else(|| {
                std::env::var("SKIMMER_TIMEOUT")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .or_else(|| file_config.timeout_secs())
            .unwrap_or(defaults.timeout_secs),
    };

    let data = std::fs::read(&cli.file_path)?;
    let file_name = cli
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.file_path.display().to_string());

    let style: SummaryStyle = cli.style.into();
    let use_color = !cli.no_color && cli.output.is_none();
    let color = ColorMode(use_color);

    let backend = Arc::new(PdfExtractBackend::new());
    let client = Arc::new(GroqClient::new(&config));

    // One spinner carries the run through both phases; the text preview is
    // printed above it as soon as extraction finishes.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let pb = spinner.clone();
    let progress = move |event: ProgressEvent| match event {
        ProgressEvent::Extracting => pb.set_message("Extracting text..."),
        ProgressEvent::Extracted {
            pages,
            chars,
            preview,
        } => {
            let mut buf: Vec<u8> = Vec::new();
            let _ = output::print_preview(&mut buf, &preview, pages, chars, color);
            pb.println(String::from_utf8_lossy(&buf).into_owned());
        }
        ProgressEvent::Summarizing { style } => {
            pb.set_message(format!("Requesting {}...", style));
        }
    };

    let result =
        skimmer_core::summarize_document(data, style, backend, client, &config, progress).await;

    spinner.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            let mut stderr = std::io::stderr();
            output::print_pipeline_error(&mut stderr, &e, color)?;
            std::process::exit(1);
        }
    };

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = cli.output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    output::print_report(&mut writer, &file_name, &summary, color)?;
    if cli.full_text {
        output::print_full_text(&mut writer, &summary.extracted_text, color)?;
    }
    writer.flush()?;

    if let Some(ref output_path) = cli.output {
        println!("Report written to {}", output_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_args_map_to_core_styles() {
        assert_eq!(SummaryStyle::from(StyleArg::Brief), SummaryStyle::Brief);
        assert_eq!(SummaryStyle::from(StyleArg::Bullets), SummaryStyle::Bullets);
        assert_eq!(
            SummaryStyle::from(StyleArg::Actions),
            SummaryStyle::ActionItems
        );
    }

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["skimmer", "paper.pdf"]).unwrap();
        assert_eq!(cli.file_path, PathBuf::from("paper.pdf"));
        assert!(matches!(cli.style, StyleArg::Brief));
        assert!(!cli.no_color);
        assert!(cli.output.is_none());
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "skimmer",
            "paper.pdf",
            "--style",
            "actions",
            "--model",
            "llama3-70b-8192",
            "--timeout",
            "30",
            "--no-color",
        ])
        .unwrap();
        assert!(matches!(cli.style, StyleArg::Actions));
        assert_eq!(cli.model.as_deref(), Some("llama3-70b-8192"));
        assert_eq!(cli.timeout, Some(30));
        assert!(cli.no_color);
    }
}
