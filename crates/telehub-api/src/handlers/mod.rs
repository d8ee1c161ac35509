//! Request handlers.

pub mod health;
pub mod metrics;
pub mod order;
pub mod user;
