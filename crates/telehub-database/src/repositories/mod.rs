//! Repositories that run inside a pooled session's transaction.

pub mod introspection;
pub mod order;
pub mod user;

pub use introspection::IntrospectionRepository;
pub use order::OrderRepository;
pub use user::UserRepository;
