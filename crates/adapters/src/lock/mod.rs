// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease-based lock service client
//!
//! The lock service is the only thing serializing writers of a ticket, so
//! implementations must guarantee at most one live handle per key across
//! every process sharing the service, and must let a handle lapse once its
//! lease duration passes even if the holder never releases it.

mod file;
mod local;

pub use file::FileLockService;
pub use local::LocalLockService;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLockClient, LockCall};

use async_trait::async_trait;
use std::time::Duration;
use tg_core::{HolderId, LockKey};
use thiserror::Error;

/// Errors from the lock service
///
/// Failing to get the lock within the wait budget is not an error; see
/// [`LockClient::try_acquire`].
#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock service is shut down")]
    Shutdown,
    #[error("lock service unavailable: {0}")]
    Unavailable(String),
    #[error("lock file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Proof of one successful acquisition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaseHandle {
    pub key: LockKey,
    pub holder: HolderId,
    /// Lease granted at acquisition
    pub lease: Duration,
}

/// Client for a lease-based mutual exclusion service
#[async_trait]
pub trait LockClient: Clone + Send + Sync + 'static {
    /// Queue for `key` for up to `wait`, then hold it for at most `lease`.
    ///
    /// Returns `Ok(None)` if the key was not granted within `wait`.
    async fn try_acquire(
        &self,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<LeaseHandle>, LockError>;

    /// Give the lease back. A no-op if it already lapsed or was reclaimed.
    async fn release(&self, handle: &LeaseHandle) -> Result<(), LockError>;

    /// Whether `handle` still owns its key
    async fn is_held(&self, handle: &LeaseHandle) -> Result<bool, LockError>;

    /// Stop serving; pending and later acquisitions fail with `Shutdown`
    async fn shutdown(&self) {}
}
