//! ld-metadata-tool
//!
//! Command line front end for laserdisc TBC field metadata documents:
//! summaries, per-frame dropout analysis, CLV timecode conversion and
//! field count correction.

mod commands;
mod config;
mod config_file;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::timecode::TimecodeQuery;
use crate::config::{LogFormat, ToolConfig};
use crate::config_file::ConfigFile;
use crate::error::Result;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "ld-metadata-tool";

#[derive(Parser, Debug)]
#[command(name = "ld-metadata-tool")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a metadata document
    Info {
        /// Metadata document (.tbc.json)
        input: PathBuf,
    },

    /// Print the dropout length of every frame
    Dropouts {
        /// Metadata document (.tbc.json)
        input: PathBuf,

        /// Only count dropouts inside the visible picture area
        #[arg(long)]
        visible: bool,
    },

    /// Convert between CLV frame numbers and H:MM:SS.PP timecodes
    Timecode {
        /// Metadata document (.tbc.json)
        input: PathBuf,

        /// Frame number to convert to a timecode
        #[arg(long, conflicts_with = "timecode")]
        frame: Option<u32>,

        /// Timecode to convert to a frame number
        #[arg(long)]
        timecode: Option<String>,
    },

    /// Truncate or pad a document to a field count
    Resize {
        /// Metadata document (.tbc.json)
        input: PathBuf,

        /// New number of fields
        fields: u32,

        /// Output document; the input is overwritten if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default configuration file
    GenerateConfig {
        /// Destination path
        #[arg(default_value = "ld-metadata.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before logging so it can pick the log format
    let loaded = match &args.config {
        Some(path) => Some(ConfigFile::from_file(path).and_then(|cf| cf.into_tool_config())),
        None => None,
    };
    let mut config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => ToolConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    init_logging(&config);
    tracing::debug!("{} v{} starting", APP_NAME, VERSION);

    if let (Some(path), Some(Err(e))) = (&args.config, &loaded) {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            path.display(),
            e
        );
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Info { input } => {
            let store = commands::load_store(&input, &config)?;
            commands::info::run(&store, &mut out)
        }
        Command::Dropouts { input, visible } => {
            let store = commands::load_store(&input, &config)?;
            commands::dropouts::run(&store, visible || config.visible_only, &mut out)
        }
        Command::Timecode {
            input,
            frame,
            timecode,
        } => {
            let query = TimecodeQuery::from_args(frame, timecode)?;
            let store = commands::load_store(&input, &config)?;
            commands::timecode::run(&store, &query, &mut out)
        }
        Command::Resize {
            input,
            fields,
            output,
        } => {
            let mut store = commands::load_store(&input, &config)?;
            let output = output.unwrap_or(input);
            commands::resize::run(&mut store, fields, &output)
        }
        Command::GenerateConfig { path } => {
            config_file::generate_default_config(&path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

/// Initialize logging with tracing. Logs go to stderr, reports to stdout.
fn init_logging(config: &ToolConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_dropouts() {
        let args =
            Args::try_parse_from(["ld-metadata-tool", "dropouts", "cap.tbc.json", "--visible"])
                .unwrap();
        match args.command {
            Command::Dropouts { input, visible } => {
                assert_eq!(input, PathBuf::from("cap.tbc.json"));
                assert!(visible);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_timecode_args_conflict() {
        assert!(Args::try_parse_from([
            "ld-metadata-tool",
            "timecode",
            "cap.tbc.json",
            "--frame",
            "3",
            "--timecode",
            "0:00:00.03",
        ])
        .is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let args = Args::try_parse_from([
            "ld-metadata-tool",
            "resize",
            "cap.tbc.json",
            "100",
            "--config",
            "tool.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("tool.toml")));
    }
}
