//! Shared domain types.

pub mod names;
pub mod outcome;

pub use outcome::Outcome;
