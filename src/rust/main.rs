use std::path::PathBuf;

use categorizer::artifact::DEFAULT_ARTIFACT_PATH;
use categorizer::runtime::{self, DEFAULT_HOST, DEFAULT_PORT};
use categorizer::ServiceConfig;
use clap::Parser;
use log::info;

/// Serve product category predictions over HTTP
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the trained model artifact
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    artifact: PathBuf,

    /// Interface to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    categorizer::init_logger();
    let args = Args::parse();

    info!("=== Starting prediction service v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig {
        artifact_path: args.artifact,
        host: args.host,
        port: args.port,
    };

    runtime::serve(config).await
}
