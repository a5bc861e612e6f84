//! Pair lookup command implementation

use super::build_client;
use crate::config::Config;
use crate::market::{PairSnapshot, SnapshotSource};
use crate::report::format_usd;
use crate::surge::token_age_hours;
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct PairArgs {
    /// Pair contract address
    pub address: String,

    /// Chain the pair lives on (defaults to config)
    #[arg(long)]
    pub chain: Option<String>,
}

impl PairArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let chain = self.chain.as_deref().unwrap_or(&config.source.chain_id);
        let client = build_client(&config)?;

        match client.get_pair(chain, &self.address).await? {
            Some(pair) => println!("{}", describe(&pair)),
            None => println!("Pair {} not found on {}", self.address, chain),
        }
        Ok(())
    }
}

fn describe(pair: &PairSnapshot) -> String {
    let age = match pair.created_at {
        Some(_) => format!(
            "{} hours",
            token_age_hours(pair.created_at, Utc::now()).round_dp(2)
        ),
        None => "N/A".to_string(),
    };

    format!(
        "{} ({})\n  Chain: {}, DEX: {}\n  Age: {}\n  1h Volume: {}, 24h Volume: {}\n  1h Price Change: {}, 24h Price Change: {}\n  Details: {}",
        pair.name,
        pair.pair_address,
        pair.chain_id,
        pair.dex_id,
        age,
        or_na(pair.volume_h1, format_usd),
        or_na(pair.volume_h24, format_usd),
        or_na(pair.price_change_h1, pct),
        or_na(pair.price_change_h24, pct),
        pair.url.as_deref().unwrap_or("N/A"),
    )
}

fn or_na(value: Option<Decimal>, render: impl Fn(Decimal) -> String) -> String {
    value.map(render).unwrap_or_else(|| "N/A".to_string())
}

fn pct(value: Decimal) -> String {
    format!("{} %", value.normalize())
}
