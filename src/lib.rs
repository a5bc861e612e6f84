//! surge-scout: volume surge detector for DEX trading pairs
//!
//! This library provides the core components for:
//! - Pair snapshots from DexScreener
//! - Bounded per-pair rolling-volume history
//! - Surge evaluation against a lookback baseline
//! - A polling loop with graceful shutdown
//! - Console and JSON-lines reporting
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod market;
pub mod poll;
pub mod report;
pub mod surge;
pub mod telemetry;
