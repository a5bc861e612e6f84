//! Human-readable console output

use super::{CycleReport, ReportSink};
use crate::surge::SurgeReport;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Prints flagged pairs to stdout
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    chain_label: String,
}

impl ConsoleSink {
    /// Create a sink labelling output with the scanned chain
    pub fn new(chain_label: impl Into<String>) -> Self {
        Self {
            chain_label: chain_label.into(),
        }
    }
}

#[async_trait]
impl ReportSink for ConsoleSink {
    async fn report(&self, cycle: &CycleReport) -> anyhow::Result<()> {
        println!("{}", format_cycle(cycle, &self.chain_label));
        Ok(())
    }
}

/// Render a cycle report as console text
pub fn format_cycle(cycle: &CycleReport, chain_label: &str) -> String {
    if !cycle.has_surges() {
        return format!(
            "No volume surges among {} pairs on {}.",
            cycle.pairs_analyzed, chain_label
        );
    }

    let mut out = format!("\nVolume surges detected on {}:\n", chain_label);
    for surge in &cycle.surges {
        write_surge(&mut out, surge);
    }
    out
}

fn write_surge(out: &mut String, s: &SurgeReport) {
    let _ = writeln!(
        out,
        "  {} Pair: {} (Chain: {}, DEX: {})",
        s.severity.marker(),
        s.pair_name,
        s.chain,
        s.dex
    );
    let _ = writeln!(out, "    Age: {} hours", s.token_age_hours.round_dp(2));
    let _ = writeln!(
        out,
        "    1h Volume: {}, 24h Volume: {}",
        opt_usd(s.volume_h1),
        opt_usd(s.volume_h24)
    );
    let _ = writeln!(out, "    5min Volume: {}", format_usd(s.delta_5m));
    let _ = writeln!(
        out,
        "    1h Price Change: {}, 24h Price Change: {}",
        opt_pct(s.price_change_h1),
        opt_pct(s.price_change_h24)
    );
    let _ = writeln!(out, "    Details: {}", s.url.as_deref().unwrap_or("N/A"));
}

fn opt_usd(value: Option<Decimal>) -> String {
    value.map(format_usd).unwrap_or_else(|| "N/A".to_string())
}

fn opt_pct(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{} %", v.normalize()))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Format as dollars with thousands separators and two decimals
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac_part)
}
