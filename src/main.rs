use clap::Parser;
use surge_scout::cli::{Cli, Commands};
use surge_scout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = surge_scout::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting surge monitor");
            args.execute(config).await?;
        }
        Commands::Scan(args) => {
            tracing::info!("Running single scan");
            args.execute(config).await?;
        }
        Commands::Pair(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Source: {} chain={} queries={} watched={}",
                config.source.base_url,
                config.source.chain_id,
                config.source.queries.len(),
                config.source.watch.len()
            );
            println!(
                "  Surge: factor={}x min_5m_volume={} min_age={}h lookback={}s",
                config.surge.volume_increase_factor,
                config.surge.min_5min_volume,
                config.surge.token_age_threshold_hours,
                config.surge.lookback_secs
            );
            println!(
                "  History: {} samples/pair, poll every {}s",
                config.history.capacity, config.poll.interval_secs
            );
            println!(
                "  Report: console={} jsonl={}",
                config.report.console,
                config
                    .report
                    .jsonl_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    Ok(())
}
