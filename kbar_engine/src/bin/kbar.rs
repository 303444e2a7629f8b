use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use kbar_engine::{BarDuration, config, pipeline};
use shared_utils::env::get_env_var_or;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Aggregate price observations into K-bars and compute indicators")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Subcommand)]
enum Cmd {
    /// Aggregate an observation file and print bars + indicators
    Run {
        /// Pipeline config (TOML)
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
        /// Observation file (JSON array)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Override the bucket duration, e.g. 5m, 1D, 1W, 1M or a minute count
        #[arg(long)]
        duration: Option<BarDuration>,
        /// Override the range start (date or timestamp)
        #[arg(long)]
        start: Option<String>,
        /// Override the range end (date or timestamp, inclusive)
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Parse and validate a config file, then print it normalized
    CheckConfig {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_new(get_env_var_or("KBAR_LOG", "info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Run {
            config,
            input,
            duration,
            start,
            end,
            format,
        } => {
            // 1) Config, with CLI overrides
            let mut cfg = config::load_config_path(&config)?;
            if let Some(d) = duration {
                cfg.aggregation.duration = d;
            }
            if start.is_some() || end.is_some() {
                let range = cfg.range.get_or_insert_with(Default::default);
                if start.is_some() {
                    range.start = start;
                }
                if end.is_some() {
                    range.end = end;
                }
                config::normalize_config(&mut cfg)?;
            }

            // 2) Aggregate + indicators
            let report = pipeline::run_path(&cfg, &input)?;

            // 3) Print
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Table => print!("{report}"),
            }
        }
        Cmd::CheckConfig { config } => {
            let cfg = config::load_config_path(&config)?;
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
