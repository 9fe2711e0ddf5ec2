// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped lease acquisition
//!
//! A [`LeaseGuard`] exists only while a lease is held. Every exit the
//! coordinator controls, including a caught panic, calls
//! [`LeaseGuard::release`]. The drop path covers what it cannot control: the
//! caller cancelling the future mid-section. The release is then handed to
//! the tokio runtime so the key is still given back promptly rather than
//! waiting out the lease.

use std::time::{Duration, Instant};
use tg_adapters::{LeaseHandle, LockClient, LockError};
use tg_core::LockKey;

/// How a held lease ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    /// Still owned at the end and given back
    Released,
    /// Lapsed before the guarded section finished; nothing to give back
    Lapsed { overrun: Duration },
}

/// Ownership of one lease, released exactly once
pub struct LeaseGuard<L: LockClient> {
    client: L,
    handle: Option<LeaseHandle>,
    acquired_at: Instant,
}

impl<L: LockClient> LeaseGuard<L> {
    /// Try to take `key` within `wait`, holding it for at most `lease`.
    ///
    /// `Ok(None)` means the wait budget ran out; no guard exists and
    /// nothing needs releasing.
    pub async fn acquire(
        client: &L,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<Self>, LockError> {
        let handle = client.try_acquire(key, wait, lease).await?;
        Ok(handle.map(|handle| Self {
            client: client.clone(),
            handle: Some(handle),
            acquired_at: Instant::now(),
        }))
    }

    pub fn handle(&self) -> Option<&LeaseHandle> {
        self.handle.as_ref()
    }

    /// Give the lease back if this guard still owns it
    ///
    /// A lease that lapsed during the guarded section may already belong to
    /// someone else, so it is left alone and reported as `Lapsed`.
    pub async fn release(mut self) -> Result<Released, LockError> {
        let Some(handle) = self.handle.take() else {
            return Ok(Released::Released);
        };

        let held = match self.client.is_held(&handle).await {
            Ok(held) => held,
            Err(e) => {
                // Release is safe on a lapsed lease, so fall through to it
                tracing::warn!(key = %handle.key, error = %e, "ownership check failed");
                true
            }
        };

        if !held {
            let overrun = self.acquired_at.elapsed().saturating_sub(handle.lease);
            tracing::warn!(
                key = %handle.key,
                holder = %handle.holder,
                lease_ms = handle.lease.as_millis() as u64,
                overrun_ms = overrun.as_millis() as u64,
                "lease lapsed before release; guarded section may have overlapped another holder"
            );
            return Ok(Released::Lapsed { overrun });
        }

        self.client.release(&handle).await?;
        Ok(Released::Released)
    }
}

impl<L: LockClient> Drop for LeaseGuard<L> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::warn!(key = %handle.key, "lease guard dropped while held; releasing in background");
                let client = self.client.clone();
                runtime.spawn(async move {
                    if let Err(e) = client.release(&handle).await {
                        tracing::warn!(key = %handle.key, error = %e, "background release failed; lease will lapse");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    key = %handle.key,
                    lease_ms = handle.lease.as_millis() as u64,
                    "lease guard dropped outside a runtime; lease will lapse"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
