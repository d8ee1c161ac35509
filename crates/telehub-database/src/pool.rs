//! Bounded session pool.
//!
//! Admits at most `max_sessions` concurrent units of work against one shared
//! database handle and fails fast with `PoolExhausted` instead of queuing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use telehub_core::config::DatabaseConfig;
use telehub_core::error::AppError;
use telehub_core::types::Outcome;

use crate::connection::DatabaseBackend;
use crate::transaction::Transaction;

/// Point-in-time view of a pool's admission state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Resource name of the pool.
    pub name: String,
    /// Maximum concurrent sessions.
    pub max_sessions: usize,
    /// Sessions currently admitted.
    pub active: usize,
    /// Sessions that can still be admitted.
    pub available: usize,
}

/// Admission counter. `active` is only touched under its lock.
#[derive(Debug)]
struct Admission {
    max: usize,
    active: Mutex<usize>,
}

impl Admission {
    fn active(&self) -> MutexGuard<'_, usize> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_enter(self: &Arc<Self>) -> Option<SlotPermit> {
        let mut active = self.active();
        if *active >= self.max {
            return None;
        }
        *active += 1;
        Some(SlotPermit {
            admission: Arc::clone(self),
        })
    }

    fn exit(&self) {
        let mut active = self.active();
        *active = active.saturating_sub(1);
    }
}

/// One admitted slot. Dropping it gives the slot back.
#[derive(Debug)]
struct SlotPermit {
    admission: Arc<Admission>,
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        self.admission.exit();
    }
}

/// Pool of logical sessions over a shared database handle.
#[derive(Debug)]
pub struct SessionPool {
    name: String,
    backend: DatabaseBackend,
    admission: Arc<Admission>,
    closed: AtomicBool,
}

impl SessionPool {
    /// Create a pool that admits at most `max_sessions` concurrent sessions.
    pub fn new(name: impl Into<String>, backend: DatabaseBackend, max_sessions: usize) -> Self {
        Self {
            name: name.into(),
            backend,
            admission: Arc::new(Admission {
                max: max_sessions,
                active: Mutex::new(0),
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Open the configured backend and wrap it in a pool.
    pub async fn connect(name: &str, config: &DatabaseConfig) -> Result<Self, AppError> {
        let backend = DatabaseBackend::connect(config).await?;
        Ok(Self::new(name, backend, config.max_sessions as usize))
    }

    /// Resource name of this pool.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared handle, for migrations and health checks.
    pub fn backend(&self) -> &DatabaseBackend {
        &self.backend
    }

    /// Maximum number of concurrent sessions.
    pub fn max_sessions(&self) -> usize {
        self.admission.max
    }

    /// Number of sessions currently admitted.
    pub fn active(&self) -> usize {
        *self.admission.active()
    }

    /// Current admission state.
    pub fn status(&self) -> PoolStatus {
        let active = self.active();
        PoolStatus {
            name: self.name.clone(),
            max_sessions: self.admission.max,
            active,
            available: self.admission.max.saturating_sub(active),
        }
    }

    /// Admit a new session and begin its unit of work.
    ///
    /// Fails with `PoolExhausted` when every slot is taken and with
    /// `Connection` when the handle cannot begin a transaction. The slot is
    /// reserved before the transaction begins and returned if beginning
    /// fails.
    pub async fn acquire(&self) -> Result<PooledSession, AppError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AppError::connection(format!(
                "{}: session pool is closed",
                self.name
            )));
        }

        let permit = self.admission.try_enter().ok_or_else(|| {
            debug!(pool = %self.name, max = self.admission.max, "Session pool exhausted");
            AppError::pool_exhausted(format!(
                "{}: too many active database sessions (max {})",
                self.name, self.admission.max
            ))
        })?;

        match self.backend.begin().await {
            Ok(tx) => Ok(PooledSession {
                tx,
                permit,
                pool: self.name.clone(),
            }),
            Err(e) => {
                error!(pool = %self.name, error = %e, "Failed to begin pooled session");
                Err(e)
            }
        }
    }

    /// Release a session, committing or rolling back according to `outcome`.
    pub async fn release(&self, session: PooledSession, outcome: Outcome) -> Result<(), AppError> {
        session.release(outcome).await
    }

    /// Close the underlying handle. Only the first call has any effect.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.backend.close().await;
        debug!(pool = %self.name, "Session pool closed");
    }
}

/// A logical session admitted by a [`SessionPool`].
///
/// Dropping the session without calling [`PooledSession::release`] frees its
/// slot and rolls the transaction back, so early returns and cancelled
/// futures never leak a slot.
#[derive(Debug)]
pub struct PooledSession {
    tx: Transaction,
    permit: SlotPermit,
    pool: String,
}

impl PooledSession {
    /// The transaction this session runs in.
    pub fn tx(&mut self) -> &mut Transaction {
        &mut self.tx
    }

    /// Give the slot back, then commit on success or roll back on failure.
    ///
    /// The slot is freed even when commit or rollback fails.
    pub async fn release(self, outcome: Outcome) -> Result<(), AppError> {
        let Self { tx, permit, pool } = self;
        drop(permit);

        let result = match outcome {
            Outcome::Success => tx.commit().await,
            Outcome::Failure => {
                warn!(pool = %pool, "Rolling back transaction due to failed outcome");
                tx.rollback().await
            }
        };

        if let Err(e) = &result {
            error!(pool = %pool, outcome = %outcome, error = %e, "Failed to release session");
        }
        result
    }
}
