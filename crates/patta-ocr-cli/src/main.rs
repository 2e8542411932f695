//! `patta-ocr` command-line interface.
//!
//! - `patta-ocr serve` runs the HTTP service.
//! - `patta-ocr process <file>` runs the pipeline once on a local image.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use patta_ocr::{DocumentProcessor, PattaConfig, ProcessResponse, api};

#[derive(Parser)]
#[command(name = "patta-ocr")]
#[command(about = "Extract structured fields from scanned Patta land-record documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Config file (TOML, YAML or JSON); defaults to discovering patta.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Process a single document and print the result
    Process {
        /// Image to process
        file: PathBuf,

        /// Config file (TOML, YAML or JSON); defaults to discovering patta.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let config = load_config(config.as_ref())?;
            api::serve_with_config(&host, port, config)
                .await
                .context("API server failed")?;
        }
        Commands::Process { file, config, format } => {
            if !file.is_file() {
                bail!("No such file: {}", file.display());
            }

            let config = load_config(config.as_ref())?;
            let processor = DocumentProcessor::from_config(&config).context("Failed to initialize backends")?;
            let response = processor
                .process_path(&file)
                .await
                .with_context(|| format!("Failed to process {}", file.display()))?;

            println!("{}", render(&response, format)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<PattaConfig> {
    let config = PattaConfig::load(path.map(PathBuf::as_path)).context("Failed to load configuration")?;
    match path {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
        None => tracing::debug!("Using discovered or default configuration"),
    }
    Ok(config)
}

fn render(response: &ProcessResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&response.ocr_text);
            out.push_str("\n\n");
            for (key, value) in &response.entities {
                out.push_str(&format!("{}: {}\n", key, value.as_deref().unwrap_or("-")));
            }
            for warning in &response.warnings {
                out.push_str(&format!("warning: {}\n", warning));
            }
            Ok(out.trim_end().to_string())
        }
    }
}
