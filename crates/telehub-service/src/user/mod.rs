//! User ingest.

pub mod service;

pub use service::{CreateUserRequest, UserService};
