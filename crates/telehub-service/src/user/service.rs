//! User ingest: create users, look them up, announce new ones.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use telehub_broker::{BrokerClient, RetryPolicy};
use telehub_core::error::AppError;
use telehub_core::result::AppResult;
use telehub_core::types::Outcome;
use telehub_core::types::names::USER_SERVICE;
use telehub_database::SessionPool;
use telehub_database::models::User;
use telehub_database::repositories::UserRepository;
use telehub_metrics::MetricsAccumulator;

use crate::report::report;

/// Data for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Handles user ingest against the user database.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Session pool of the user database.
    pool: Arc<SessionPool>,
    /// User repository.
    users: UserRepository,
    /// Outcome accounting.
    accumulator: Arc<MetricsAccumulator>,
    /// Event sink for created users.
    broker: Arc<dyn BrokerClient>,
    /// Publish retry policy.
    retry: RetryPolicy,
    /// Topic user events go to.
    topic: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        pool: Arc<SessionPool>,
        accumulator: Arc<MetricsAccumulator>,
        broker: Arc<dyn BrokerClient>,
        retry: RetryPolicy,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            users: UserRepository::new(),
            accumulator,
            broker,
            retry,
            topic: topic.into(),
        }
    }

    /// Create a user and publish a "created" event.
    ///
    /// The row is committed before publishing. If every publish attempt
    /// fails the call fails and counts as a failure, but the row stays.
    /// Recorded latency covers the publish retries.
    pub async fn create_user(&self, req: CreateUserRequest) -> AppResult<i64> {
        let timer = self.accumulator.start_timer(USER_SERVICE);
        let result = self.insert_and_announce(&req).await;
        report(timer, &result, "create_user");
        result
    }

    /// Look a user up by id.
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        let timer = self.accumulator.start_timer(USER_SERVICE);
        let result = self.find(user_id).await;
        report(timer, &result, "get_user");
        result
    }

    async fn insert_and_announce(&self, req: &CreateUserRequest) -> AppResult<i64> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if !req.email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }

        let mut session = self.pool.acquire().await?;
        let inserted = self.users.create(session.tx(), &req.name, &req.email).await;
        let released = session.release(Outcome::of(&inserted)).await;
        let user_id = inserted?;
        released?;

        let value = format!("User {} created", req.name);
        self.retry
            .publish(self.broker.as_ref(), &self.topic, &user_id.to_string(), &value)
            .await
            .map_err(|e| {
                error!(user_id, error = %e, "User committed but event was not published");
                e
            })?;

        info!(user_id, name = %req.name, "User created");
        Ok(user_id)
    }

    async fn find(&self, user_id: i64) -> AppResult<User> {
        let mut session = self.pool.acquire().await?;
        let found = self
            .users
            .find_by_id(session.tx(), user_id)
            .await
            .and_then(|user| {
                user.ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
            });
        session.release(Outcome::of(&found)).await?;
        found
    }
}
