//! Run command implementation

use super::{build_client, build_sink};
use crate::config::Config;
use crate::poll::PollLoop;
use clap::Args;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Seconds between poll cycles (overrides config)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Chain to scan (overrides config)
    #[arg(long)]
    pub chain: Option<String>,
}

impl RunArgs {
    /// Apply command-line overrides to the loaded configuration
    pub fn apply(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(interval) = self.interval {
            config.poll.interval_secs = interval;
        }
        if let Some(chain) = &self.chain {
            config.source.chain_id = chain.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let config = self.apply(config)?;
        let client = build_client(&config)?;
        let sink = build_sink(&config);
        let mut poller = PollLoop::from_config(client, sink, &config);

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested");
                    let _ = stop_tx.send(true);
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });

        poller.run(stop_rx).await;
        Ok(())
    }
}
