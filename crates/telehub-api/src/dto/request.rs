//! Request DTOs.

use serde::{Deserialize, Serialize};

/// GetServiceMetrics request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetServiceMetricsRequest {
    /// Service to report on.
    pub service_name: String,
}

/// GetDatabaseMetrics request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatabaseMetricsRequest {
    /// Database resource to report on.
    pub service_name: String,
}

/// CreateUser request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// GetUser request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    /// User id.
    pub user_id: i64,
}

/// CreateOrder request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Ordering user.
    pub user_id: i64,
    /// Ordered product.
    pub product: String,
}
