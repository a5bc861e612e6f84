//! Polling module
//!
//! Periodic fetch-evaluate-report loop with a shutdown hook

mod poller;

pub use poller::PollLoop;
