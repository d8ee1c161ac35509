//! In-memory database backend.
//!
//! Rows inserted inside a transaction are staged and only become visible to
//! other transactions on commit. Keys come from per-table sequences that,
//! like PostgreSQL sequences, are not rolled back.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use telehub_core::error::AppError;

use crate::models::{Order, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    orders: BTreeMap<i64, Order>,
}

impl Tables {
    fn approximate_size(&self) -> i64 {
        let users: usize = self
            .users
            .values()
            .map(|u| 8 + u.name.len() + u.email.len())
            .sum();
        let orders: usize = self.orders.values().map(|o| 16 + o.product.len()).sum();
        (users + orders) as i64
    }
}

#[derive(Debug)]
struct Inner {
    tables: Mutex<Tables>,
    user_seq: AtomicI64,
    order_seq: AtomicI64,
    open_transactions: AtomicUsize,
    available: AtomicBool,
    introspection_failing: AtomicBool,
}

/// Shared handle to an in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                tables: Mutex::new(Tables::default()),
                user_seq: AtomicI64::new(0),
                order_seq: AtomicI64::new(0),
                open_transactions: AtomicUsize::new(0),
                available: AtomicBool::new(true),
                introspection_failing: AtomicBool::new(false),
            }),
        }
    }

    /// Begin a transaction.
    pub fn begin(&self) -> Result<MemoryTransaction, AppError> {
        if !self.is_available() {
            return Err(AppError::connection("in-memory database is unavailable"));
        }
        self.inner.open_transactions.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTransaction {
            db: self.clone(),
            staged: Tables::default(),
        })
    }

    /// Whether new transactions can be started.
    pub fn is_available(&self) -> bool {
        self.inner.available.load(Ordering::SeqCst)
    }

    /// Simulate the database going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Make introspection reads fail while set.
    pub fn set_introspection_failing(&self, failing: bool) {
        self.inner
            .introspection_failing
            .store(failing, Ordering::SeqCst);
    }

    /// Mark the database closed.
    pub fn close(&self) {
        self.set_available(false);
        debug!("In-memory database closed");
    }

    /// Number of transactions currently open.
    pub fn open_transactions(&self) -> usize {
        self.inner.open_transactions.load(Ordering::SeqCst)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner
            .tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check_introspection(&self) -> Result<(), AppError> {
        if self.inner.introspection_failing.load(Ordering::SeqCst) {
            return Err(AppError::database("introspection view unavailable"));
        }
        Ok(())
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// A transaction on a [`MemoryDatabase`].
#[derive(Debug)]
pub struct MemoryTransaction {
    db: MemoryDatabase,
    staged: Tables,
}

impl MemoryTransaction {
    /// Stage a user row and return its key.
    pub fn insert_user(&mut self, name: &str, email: &str) -> i64 {
        let id = self.db.inner.user_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.staged.users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                email: email.to_string(),
            },
        );
        id
    }

    /// Look a user up, seeing this transaction's own staged rows.
    pub fn find_user(&self, id: i64) -> Option<User> {
        self.staged
            .users
            .get(&id)
            .cloned()
            .or_else(|| self.db.tables().users.get(&id).cloned())
    }

    /// Stage an order row and return its key.
    pub fn insert_order(&mut self, user_id: i64, product: &str) -> i64 {
        let id = self.db.inner.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.staged.orders.insert(
            id,
            Order {
                id,
                user_id,
                product: product.to_string(),
            },
        );
        id
    }

    /// Look an order up, seeing this transaction's own staged rows.
    pub fn find_order(&self, id: i64) -> Option<Order> {
        self.staged
            .orders
            .get(&id)
            .cloned()
            .or_else(|| self.db.tables().orders.get(&id).cloned())
    }

    /// Number of transactions open on the database, this one included.
    pub fn active_connections(&self) -> Result<i64, AppError> {
        self.db.check_introspection()?;
        Ok(self.db.open_transactions() as i64)
    }

    /// Approximate committed size in bytes.
    pub fn database_size(&self) -> Result<i64, AppError> {
        self.db.check_introspection()?;
        Ok(self.db.tables().approximate_size())
    }

    /// Apply staged rows.
    pub fn commit(mut self) -> Result<(), AppError> {
        let staged = std::mem::take(&mut self.staged);
        let mut tables = self.db.tables();
        tables.users.extend(staged.users);
        tables.orders.extend(staged.orders);
        Ok(())
    }

    /// Discard staged rows.
    pub fn rollback(self) {}
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        self.db.inner.open_transactions.fetch_sub(1, Ordering::SeqCst);
    }
}
