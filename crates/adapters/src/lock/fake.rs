// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock client for testing
//!
//! Grants leases through a real [`LocalLockService`] so contention behaves
//! as in production, while recording every call and allowing failures to be
//! injected.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LeaseHandle, LocalLockService, LockClient, LockError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tg_core::{HolderId, LockKey, LockServiceConfig, SequentialIdGen, SystemClock};

/// Recorded lock call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockCall {
    TryAcquire {
        key: LockKey,
        wait: Duration,
        lease: Duration,
        /// Holder of the granted handle, `None` if nothing was granted
        granted: Option<HolderId>,
    },
    Release {
        key: LockKey,
        holder: HolderId,
    },
    IsHeld {
        key: LockKey,
        holder: HolderId,
    },
}

#[derive(Default)]
struct Behavior {
    deny: bool,
    fail_acquire: Option<String>,
    fail_release: Option<String>,
    lapse: bool,
}

/// Fake lock client that records calls
#[derive(Clone)]
pub struct FakeLockClient {
    service: LocalLockService<SystemClock, SequentialIdGen>,
    calls: Arc<Mutex<Vec<LockCall>>>,
    behavior: Arc<Mutex<Behavior>>,
}

impl Default for FakeLockClient {
    fn default() -> Self {
        Self {
            service: LocalLockService::with_parts(
                LockServiceConfig::default(),
                SystemClock,
                SequentialIdGen::default(),
            ),
            calls: Arc::default(),
            behavior: Arc::default(),
        }
    }
}

impl FakeLockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every acquisition as timed out without granting anything
    pub fn deny_all(&self) {
        self.behavior().deny = true;
    }

    /// Fail every acquisition with `Unavailable(message)`
    pub fn fail_acquire(&self, message: impl Into<String>) {
        self.behavior().fail_acquire = Some(message.into());
    }

    /// Fail every release with `Unavailable(message)`; the lease is still freed
    pub fn fail_release(&self, message: impl Into<String>) {
        self.behavior().fail_release = Some(message.into());
    }

    /// Pretend every granted lease has already lapsed when checked
    pub fn lapse_leases(&self) {
        self.behavior().lapse = true;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LockCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn acquire_count(&self) -> usize {
        self.count(|c| matches!(c, LockCall::TryAcquire { .. }))
    }

    /// Acquisitions that returned a handle
    pub fn granted_count(&self) -> usize {
        self.count(|c| matches!(c, LockCall::TryAcquire { granted: Some(_), .. }))
    }

    pub fn release_count(&self) -> usize {
        self.count(|c| matches!(c, LockCall::Release { .. }))
    }

    /// Keys still held by a live lease
    pub fn active_leases(&self) -> Vec<LockKey> {
        self.service.active_leases()
    }

    fn count(&self, pred: impl Fn(&LockCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: LockCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn behavior(&self) -> std::sync::MutexGuard<'_, Behavior> {
        self.behavior.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LockClient for FakeLockClient {
    async fn try_acquire(
        &self,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<LeaseHandle>, LockError> {
        let (deny, failure) = {
            let behavior = self.behavior();
            (behavior.deny, behavior.fail_acquire.clone())
        };

        let result = if let Some(message) = failure {
            Err(LockError::Unavailable(message))
        } else if deny {
            Ok(None)
        } else {
            self.service.try_acquire(key, wait, lease).await
        };

        self.record(LockCall::TryAcquire {
            key: key.clone(),
            wait,
            lease,
            granted: result
                .as_ref()
                .ok()
                .and_then(|h| h.as_ref())
                .map(|h| h.holder.clone()),
        });
        result
    }

    async fn release(&self, handle: &LeaseHandle) -> Result<(), LockError> {
        self.record(LockCall::Release {
            key: handle.key.clone(),
            holder: handle.holder.clone(),
        });
        self.service.release(handle).await?;

        match self.behavior().fail_release.clone() {
            Some(message) => Err(LockError::Unavailable(message)),
            None => Ok(()),
        }
    }

    async fn is_held(&self, handle: &LeaseHandle) -> Result<bool, LockError> {
        self.record(LockCall::IsHeld {
            key: handle.key.clone(),
            holder: handle.holder.clone(),
        });
        if self.behavior().lapse {
            return Ok(false);
        }
        self.service.is_held(handle).await
    }

    async fn shutdown(&self) {
        self.service.shutdown().await;
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
