//! One-shot lookup from the command line; prints the result as JSON.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use helios::{Config, Credentials, SolarService};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Print the nearest solar irradiance values for a coordinate")]
struct Args {
    /// Latitude of the query point
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the query point
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// TOML config file; without it the spreadsheet source is read from the environment
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::from_env()?,
    };
    debug!("Using config {:?}", config);

    let service = SolarService::from_config(&config, &Credentials::from_env())?;
    let result = service.lookup(args.lat, args.lon).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    if result.is_error() {
        std::process::exit(1);
    }
    Ok(())
}
