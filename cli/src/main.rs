//! colstat: column statistics for csv files

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod generate;
mod settings;
mod summarize;

#[derive(Parser, Debug)]
#[clap(name = "colstat")]
#[clap(about = "Single-pass column statistics for csv files", version, author)]
#[clap(arg_required_else_help(true))]
struct Cli {
    /// Log at debug level
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a csv file of integers drawn from a triangular distribution
    #[clap(name = "generate")]
    Generate {
        #[clap(long, default_value_t = 100_000)]
        rows: usize,
        #[clap(long, default_value_t = 1)]
        columns: usize,
        #[clap(long, default_value_t = 0.0)]
        low: f64,
        #[clap(long, default_value_t = 1.0)]
        high: f64,
        #[clap(long, default_value_t = 0.5)]
        mode: f64,
        #[clap(long, default_value_t = 0)]
        seed: u64,
        /// Destination file, stdout when absent
        #[clap(long, short)]
        output: Option<PathBuf>,
        #[clap(long)]
        no_header: bool,
    },

    /// Summarize every column of a csv file and print the json report
    #[clap(name = "summarize")]
    Summarize {
        path: PathBuf,
        /// TOML file holding summary options
        #[clap(long, env = "COLSTAT_CONFIG")]
        config: Option<PathBuf>,
        /// Number of parallel accumulators, capped at 256
        #[clap(long, default_value_t = 4)]
        shards: usize,
        /// Column to summarize as categories instead of numbers
        #[clap(long = "enum-column")]
        enum_columns: Vec<String>,
        /// Columns are named C1..Cn and the first row is data
        #[clap(long)]
        no_header: bool,
        /// Rows per batch handed to an accumulator
        #[clap(long, default_value_t = 4096)]
        batch_rows: usize,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Generate {
            rows,
            columns,
            low,
            high,
            mode,
            seed,
            output,
            no_header,
        } => {
            let config = colstat_summary::synthetic::SyntheticConfig {
                rows,
                columns,
                low,
                high,
                mode,
                seed,
            };
            generate::write_csv(&config, output.as_deref(), !no_header)?;
        }
        Commands::Summarize {
            path,
            config,
            shards,
            enum_columns,
            no_header,
            batch_rows,
        } => {
            let summary_config = settings::load_summary_config(config.as_deref())?;
            let options = summarize::SummarizeOptions {
                path,
                shards,
                enum_columns,
                has_headers: !no_header,
                batch_rows,
            };
            let report = summarize::summarize_csv(options, summary_config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
