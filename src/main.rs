//! traffic-lens: classify captured network flows with a remote model.
//!
//! ```bash
//! # Upload a CSV and print the results
//! traffic-lens classify flows.csv
//! traffic-lens classify flows.csv --json --save-confusion-matrix matrix.png
//!
//! # Check whether the model service is ready
//! traffic-lens model-info --url http://gpu-box:5000
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use traffic_lens_lib::commands::classify::{run_classify, ClassifyOptions};
use traffic_lens_lib::commands::model_info::run_model_info;
use traffic_lens_lib::ClientConfig;

#[derive(Parser)]
#[command(name = "traffic-lens", version, about)]
struct Cli {
    /// Base URL of the classification service (default: $TRAFFIC_LENS_URL or http://127.0.0.1:5000)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a CSV file and show its classification
    Classify {
        /// CSV file of flow features
        file: PathBuf,

        /// Print the rendered views as JSON
        #[arg(long)]
        json: bool,

        /// Write the confusion matrix PNG to this path
        #[arg(long)]
        save_confusion_matrix: Option<PathBuf>,
    },
    /// Show model readiness, device and supported traffic types
    ModelInfo {
        /// Print the status panel as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::resolve(cli.url.as_deref())?;

    let ok = match cli.command {
        Command::Classify {
            file,
            json,
            save_confusion_matrix,
        } => {
            run_classify(
                config,
                ClassifyOptions {
                    file,
                    json,
                    save_confusion_matrix,
                },
            )
            .await?
        }
        Command::ModelInfo { json } => run_model_info(config, json).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
