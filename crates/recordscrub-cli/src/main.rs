//! RecordScrub CLI
//!
//! Redacts PII from `(record_id, data_json)` datasets.
//!
//! Usage:
//! ```bash
//! # CSV in, CSV out
//! recordscrub redact --input records.csv --output redacted.csv
//!
//! # With a config file and a status column
//! recordscrub --config recordscrub.toml redact -i records.csv -o redacted.jsonl --emit-status
//!
//! # Try a single payload
//! recordscrub check --payload '{"email":"a@x.com","device_id":"dev-1"}'
//! ```

mod config;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use config::{LoggingConfig, ScrubConfig};
use recordscrub_batch::{DataFormat, MalformedPolicy, open_sink, open_source, run_batch};
use recordscrub_pii::{RecordRedactor, RedactionOutcome, StandardRedactor};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "recordscrub")]
#[command(about = "RecordScrub - PII redaction for JSON payload datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "RECORDSCRUB_CONFIG",
        global = true
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact every record of an input dataset
    Redact {
        /// Input dataset with record_id and data_json columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output dataset
        #[arg(short, long)]
        output: PathBuf,

        /// Input format (csv or jsonl); inferred from the extension by default
        #[arg(long)]
        input_format: Option<DataFormat>,

        /// Output format (csv or jsonl); inferred from the extension by default
        #[arg(long)]
        output_format: Option<DataFormat>,

        /// What to do with unparseable payloads (passthrough or skip)
        #[arg(long)]
        on_malformed: Option<MalformedPolicy>,

        /// Add a status column to the output
        #[arg(long, default_value = "false")]
        emit_status: bool,

        /// Stop at the first unreadable input row
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },
    /// Redact a single payload and print the result
    Check {
        /// JSON object payload
        #[arg(long)]
        payload: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let path = expand_path(path);
            ScrubConfig::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => ScrubConfig::default(),
    };
    config.merge_env();

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging)?;

    let redactor = StandardRedactor::new(config.masking.to_redactor_config())
        .context("Invalid masking configuration")?;

    match cli.command {
        Commands::Redact {
            input,
            output,
            input_format,
            output_format,
            on_malformed,
            emit_status,
            fail_fast,
        } => {
            let mut batch = config.batch.clone();
            if let Some(policy) = on_malformed {
                batch.on_malformed = policy;
            }
            batch.emit_status |= emit_status;
            batch.fail_fast |= fail_fast;

            let input = expand_path(&input);
            let output = expand_path(&output);

            info!(
                input = %input.display(),
                output = %output.display(),
                on_malformed = %batch.on_malformed,
                "Starting redaction batch"
            );

            let source = open_source(&input, input_format)
                .with_context(|| format!("Failed to open input {}", input.display()))?;
            let mut sink = open_sink(&output, output_format, batch.emit_status)
                .with_context(|| format!("Failed to create output {}", output.display()))?;

            run_batch(&redactor, source, sink.as_mut(), &batch)
                .with_context(|| format!("Batch over {} aborted", input.display()))?;
        }
        Commands::Check { payload } => match redactor.redact_payload(&payload) {
            RedactionOutcome::Redacted(result) => {
                let report = serde_json::json!({
                    "redacted_data_json": result.to_json(),
                    "is_pii": result.is_pii,
                    "escalated": result.escalated,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            RedactionOutcome::Unparseable { reason, .. } => {
                bail!("Payload could not be checked: {}", reason);
            }
        },
    }

    Ok(())
}

/// Initialize tracing with the configured level; `RUST_LOG` directives are added on top
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let log_level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::new(format!("{}", log_level));

    if let Ok(directives) = std::env::var("RUST_LOG") {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Warning: Ignoring RUST_LOG directive '{}': {}", directive, e),
            }
        }
    }

    // Logs go to stderr so `check` output stays machine-readable
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

/// Expand a leading tilde in a path
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redact() {
        let cli = Cli::try_parse_from([
            "recordscrub",
            "redact",
            "-i",
            "in.csv",
            "-o",
            "out.jsonl",
            "--on-malformed",
            "skip",
            "--emit-status",
        ])
        .unwrap();

        match cli.command {
            Commands::Redact {
                input,
                output,
                input_format,
                on_malformed,
                emit_status,
                fail_fast,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.csv"));
                assert_eq!(output, PathBuf::from("out.jsonl"));
                assert_eq!(input_format, None);
                assert_eq!(on_malformed, Some(MalformedPolicy::Skip));
                assert!(emit_status);
                assert!(!fail_fast);
            }
            Commands::Check { .. } => panic!("expected redact"),
        }
    }

    #[test]
    fn test_parse_formats() {
        let cli = Cli::try_parse_from([
            "recordscrub",
            "redact",
            "--input",
            "records.txt",
            "--output",
            "out.txt",
            "--input-format",
            "jsonl",
            "--output-format",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Redact {
                input_format,
                output_format,
                ..
            } => {
                assert_eq!(input_format, Some(DataFormat::Jsonl));
                assert_eq!(output_format, Some(DataFormat::Csv));
            }
            Commands::Check { .. } => panic!("expected redact"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let result = Cli::try_parse_from([
            "recordscrub",
            "redact",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--on-malformed",
            "explode",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_check_with_global_flags() {
        let cli = Cli::try_parse_from([
            "recordscrub",
            "check",
            "--payload",
            r#"{"phone":"9876543210"}"#,
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Check { .. }));
    }

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        assert_eq!(expand_path(Path::new("data/in.csv")), PathBuf::from("data/in.csv"));
    }
}
