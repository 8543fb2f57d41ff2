use clap::Parser;
use tracing::error;

use scour::clean::{self, CleanCommand};

/// Clean a tabular artifact and publish the result as a new version
#[derive(Parser)]
#[command(name = "scour")]
#[command(about = "Drop out-of-bounds rows from a tabular artifact and republish it", long_about = None)]
struct Cli {
    /// Store reference to the raw input table (name, name:latest, or name:vN)
    #[arg(long = "input_artifact")]
    input_artifact: String,

    /// Name for the new artifact version
    #[arg(long = "output_artifact")]
    output_artifact: String,

    /// Classification tag for the new artifact
    #[arg(long = "output_type")]
    output_type: String,

    /// Free-text description for the new artifact
    #[arg(long = "output_description")]
    output_description: String,

    /// Inclusive lower price bound
    #[arg(long = "min_price", allow_negative_numbers = true)]
    min_price: f64,

    /// Inclusive upper price bound
    #[arg(long = "max_price", allow_negative_numbers = true)]
    max_price: f64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG controls verbosity; info by default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let command = CleanCommand {
        input_artifact: cli.input_artifact,
        min_price: cli.min_price,
        max_price: cli.max_price,
        output_artifact: cli.output_artifact,
        output_type: cli.output_type,
        output_description: cli.output_description,
    };

    match clean::run(&command).await {
        Ok(version) => {
            println!("published {}", version.qualified_name());
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            // full cause chain, the closest thing to a traceback
            eprintln!("Error: {:?}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }
}
