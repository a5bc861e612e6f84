//! Scan command implementation

use super::{build_client, build_sink};
use crate::config::Config;
use crate::poll::PollLoop;
use clap::Args;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Chain to scan (overrides config)
    #[arg(long)]
    pub chain: Option<String>,

    /// Print the cycle report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// A single cycle has no history to compare against, so nothing is
    /// flagged; this checks connectivity and shows the pair universe size.
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(chain) = &self.chain {
            config.source.chain_id = chain.clone();
        }
        config.validate()?;

        let client = build_client(&config)?;
        let sink = build_sink(&config);
        let mut poller = PollLoop::from_config(client, sink, &config);

        let report = poller.run_cycle().await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "Analyzed {} unique pairs on {}, {} flagged",
                report.pairs_analyzed,
                config.source.chain_id,
                report.surges.len()
            );
        }
        Ok(())
    }
}
