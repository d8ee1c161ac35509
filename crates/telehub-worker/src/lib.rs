//! Background pollers for Telehub.
//!
//! This crate provides:
//! - A poller runner that drives a sampler from a tick source until shutdown
//! - Interval and manual tick sources
//! - Samplers for the monitored databases, the broker, and service metrics
//! - A health view of each running poller

pub mod health;
pub mod runner;
pub mod sampler;
pub mod samplers;
pub mod ticker;

pub use health::{PollerHealth, PollerHealthHandle, PollerState};
pub use runner::PollerRunner;
pub use sampler::Sampler;
pub use ticker::{ManualTrigger, TickSource};
