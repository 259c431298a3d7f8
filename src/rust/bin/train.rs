use std::path::PathBuf;

use anyhow::Context;
use categorizer::artifact::DEFAULT_ARTIFACT_PATH;
use categorizer::classifier::naive_bayes::DEFAULT_ALPHA;
use categorizer::trainer;
use categorizer::TrainerConfig;
use clap::Parser;

/// Train the product categorizer on the bundled dataset
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to write the trained model artifact
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    output: PathBuf,

    /// Additive smoothing for the naive Bayes model
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f64,
}

fn main() -> anyhow::Result<()> {
    categorizer::init_logger();
    let args = Args::parse();

    let config = TrainerConfig {
        output: args.output,
        alpha: args.alpha,
    };
    trainer::train(&config)
        .with_context(|| format!("Failed to train model into {:?}", config.output))?;

    println!("Model trained and saved as {}", config.output.display());
    Ok(())
}
