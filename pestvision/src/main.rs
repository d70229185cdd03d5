//! PestVision CLI
//!
//! Command-line entry point for the crop pest classification demo: run a
//! prediction on an image file or run the illustrative demo-training pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use pestvision::backend::{backend_name, default_device};
use pestvision::utils::logging::{init_logging, LogConfig};
use pestvision::{train_demo, ModelProvider, Predictor};

/// PestVision crop pest classification demo
#[derive(Parser, Debug)]
#[command(name = "pestvision")]
#[command(version = pestvision::VERSION)]
#[command(about = "Crop pest image classification demo with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Directory holding the persisted model artifact
    #[arg(short, long, default_value = "model")]
    model_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict the pest species for one image file
    Predict {
        /// Path to a JPEG/PNG image
        image: PathBuf,
    },

    /// Train the demo model on random synthetic data and save the artifact
    TrainDemo {
        /// Random seed for the synthetic labels
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config);

    let device = default_device();
    let provider = ModelProvider::new(&cli.model_dir);

    match cli.command {
        Commands::Predict { image } => {
            let handle = provider.get_or_init(&device)?;
            let bytes = std::fs::read(&image)
                .with_context(|| format!("failed to read image file {:?}", image))?;

            let predictor = Predictor::from_metadata(&handle.metadata);
            let prediction = predictor.predict(&handle, &bytes)?;

            println!();
            println!("{}", format!("Detected pest: {}", prediction.label).green().bold());
            println!("Confidence: {}", format!("{:.2}", prediction.confidence).bold());
            println!(
                "Inference time: {:.2} ms ({})",
                prediction.inference_time_ms,
                backend_name()
            );
        }

        Commands::TrainDemo { seed } => {
            println!(
                "{}",
                "Training with random demo data (replace with a real dataset for real training)."
                    .yellow()
            );

            let handle = provider.get_or_init(&device)?;
            let report = train_demo(&handle, &cli.model_dir, seed)?;

            println!();
            println!("{}", "Demo model trained and saved.".green().bold());
            for (epoch, (loss, accuracy)) in report
                .epoch_losses
                .iter()
                .zip(report.epoch_accuracies.iter())
                .enumerate()
            {
                println!(
                    "  Epoch {}/{}: loss = {:.4}, accuracy = {:.2}%",
                    epoch + 1,
                    report.epochs,
                    loss,
                    accuracy * 100.0
                );
            }
            println!("  {}", report.note.dimmed());
        }
    }

    Ok(())
}
