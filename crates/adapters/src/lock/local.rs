// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lease lock service
//!
//! Serves every caller holding a clone of the same service. Contenders that
//! are denied wait for a release notification, re-checking at least every
//! `poll_interval` so that leases which lapse without a release are noticed.

use super::{LeaseHandle, LockClient, LockError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tg_core::{
    Clock, HolderId, IdGen, Lease, LeaseEvent, LeaseInput, LockKey, LockServiceConfig,
    SystemClock, UuidIdGen,
};
use tokio::sync::Notify;

struct Inner<C, G> {
    leases: Mutex<HashMap<LockKey, Lease>>,
    released: Notify,
    closed: AtomicBool,
    clock: C,
    ids: G,
    config: LockServiceConfig,
}

/// Lease lock service shared by clones within one process
pub struct LocalLockService<C = SystemClock, G = UuidIdGen> {
    inner: Arc<Inner<C, G>>,
}

impl<C, G> Clone for LocalLockService<C, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl LocalLockService {
    pub fn new(config: LockServiceConfig) -> Self {
        Self::with_parts(config, SystemClock, UuidIdGen)
    }
}

impl<C: Clock, G: IdGen> LocalLockService<C, G> {
    pub fn with_parts(config: LockServiceConfig, clock: C, ids: G) -> Self {
        Self {
            inner: Arc::new(Inner {
                leases: Mutex::new(HashMap::new()),
                released: Notify::new(),
                closed: AtomicBool::new(false),
                clock,
                ids,
                config,
            }),
        }
    }

    /// Keys currently held by a live lease, sorted
    ///
    /// Lapsed leases found along the way are swept.
    pub fn active_leases(&self) -> Vec<LockKey> {
        let mut leases = self.inner.leases.lock().unwrap_or_else(|e| e.into_inner());
        let mut active = Vec::new();
        leases.retain(|key, lease| {
            let (next, events) = lease.transition(LeaseInput::Tick, &self.inner.clock);
            report(&events);
            *lease = next;
            if lease.holder().is_some() {
                active.push(key.clone());
                true
            } else {
                false
            }
        });
        active.sort();
        active
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), LockError> {
        if self.is_shut_down() {
            Err(LockError::Shutdown)
        } else {
            Ok(())
        }
    }

    /// One non-blocking attempt; on denial returns how long the current
    /// lease still has to run
    fn attempt(
        &self,
        key: &LockKey,
        holder: &HolderId,
        lease: Duration,
    ) -> Result<LeaseHandle, Option<Duration>> {
        let clock = &self.inner.clock;
        let mut leases = self.inner.leases.lock().unwrap_or_else(|e| e.into_inner());
        let current = leases
            .entry(key.clone())
            .or_insert_with(|| Lease::new(key.clone()));

        let (next, events) = current.transition(
            LeaseInput::Acquire {
                holder: holder.clone(),
                duration: lease,
            },
            clock,
        );
        report(&events);
        *current = next;

        if current.is_held_by(holder, clock) {
            Ok(LeaseHandle {
                key: key.clone(),
                holder: holder.clone(),
                lease,
            })
        } else {
            Err(current.remaining(clock))
        }
    }
}

#[async_trait]
impl<C: Clock, G: IdGen> LockClient for LocalLockService<C, G> {
    async fn try_acquire(
        &self,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<LeaseHandle>, LockError> {
        let holder = self.inner.ids.next();
        let deadline = tokio::time::Instant::now() + wait;

        loop {
            // Register for wakeups before trying, so a release that lands
            // between the attempt and the wait is not lost.
            let notified = self.inner.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            self.ensure_open()?;
            let remaining = match self.attempt(key, &holder, lease) {
                Ok(handle) => return Ok(Some(handle)),
                Err(remaining) => remaining,
            };

            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let mut pause = (deadline - now).min(self.inner.config.poll_interval);
            if let Some(remaining) = remaining {
                pause = pause.min(remaining);
            }
            let _ = tokio::time::timeout(pause, notified).await;
        }
    }

    async fn release(&self, handle: &LeaseHandle) -> Result<(), LockError> {
        let released = {
            let mut leases = self.inner.leases.lock().unwrap_or_else(|e| e.into_inner());
            let Some(current) = leases.get_mut(&handle.key) else {
                tracing::debug!(key = %handle.key, holder = %handle.holder, "release of unknown key ignored");
                return Ok(());
            };
            let (next, events) = current.transition(
                LeaseInput::Release {
                    holder: handle.holder.clone(),
                },
                &self.inner.clock,
            );
            report(&events);
            *current = next;

            let released = events
                .iter()
                .any(|e| matches!(e, LeaseEvent::Released { .. }));
            if released {
                leases.remove(&handle.key);
            }
            released
        };

        if released {
            self.inner.released.notify_waiters();
        }
        Ok(())
    }

    async fn is_held(&self, handle: &LeaseHandle) -> Result<bool, LockError> {
        let leases = self.inner.leases.lock().unwrap_or_else(|e| e.into_inner());
        Ok(leases
            .get(&handle.key)
            .is_some_and(|lease| lease.is_held_by(&handle.holder, &self.inner.clock)))
    }

    async fn shutdown(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::info!(active = self.active_leases().len(), "lock service shutting down");
        }
        self.inner.released.notify_waiters();
    }
}

fn report(events: &[LeaseEvent]) {
    for event in events {
        match event {
            LeaseEvent::Acquired { key, holder } => {
                tracing::debug!(%key, %holder, "lease acquired")
            }
            LeaseEvent::Reclaimed {
                key,
                previous_holder,
                new_holder,
            } => tracing::warn!(
                %key,
                %previous_holder,
                %new_holder,
                "reclaimed lapsed lease"
            ),
            LeaseEvent::Denied {
                key,
                holder,
                current_holder,
            } => tracing::trace!(%key, %holder, %current_holder, "lease busy"),
            LeaseEvent::Released { key, holder } => {
                tracing::debug!(%key, %holder, "lease released")
            }
            LeaseEvent::ReleaseIgnored { key, holder } => {
                tracing::debug!(%key, %holder, "release ignored, lease not held")
            }
            LeaseEvent::Expired { key, holder } => {
                tracing::info!(%key, %holder, "lease expired")
            }
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
