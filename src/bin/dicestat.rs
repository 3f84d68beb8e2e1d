use clap::Parser;
use dicestat::{config, DiceConfig, Error, Resolver};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dice expressions to resolve, e.g. `3d6` or `d%`
    #[arg(required = true)]
    expressions: Vec<String>,

    /// Path to config file
    #[arg(short, long, default_value = "dicestat.json")]
    config: PathBuf,

    /// Treat expressions as URL-safe base64
    #[arg(short, long)]
    encoded: bool,

    /// Override the simulation sample size
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let mut config: DiceConfig = if cli.config.exists() {
        config::from_file(&cli.config)?
    } else {
        DiceConfig::default()
    };
    if let Some(iterations) = cli.iterations {
        config.simulation.iterations = iterations;
    }
    config.validate()?;

    info!("config loaded.");
    debug!("config: {:?}", config);

    let resolver = Resolver::in_memory(&config);
    for expression in &cli.expressions {
        let resolved = if cli.encoded {
            resolver.resolve_encoded(expression).await?
        } else {
            resolver.resolve(expression).await?
        };
        let json = serde_json::to_string_pretty(&resolved)
            .map_err(|e| Error::internal(format!("Failed to render result: {}", e)))?;
        println!("{}", json);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(if e.is_client_fault() { 2 } else { 1 });
    }
}
