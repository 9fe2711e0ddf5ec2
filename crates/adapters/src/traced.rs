// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::lock::{LeaseHandle, LockClient, LockError};
use async_trait::async_trait;
use std::time::Duration;
use tg_core::{LockKey, Ticket, TicketId};
use tg_storage::{StoreError, TicketStore};
use tracing::Instrument;

/// Wrapper that adds tracing to any LockClient
#[derive(Clone)]
pub struct TracedLockClient<L> {
    inner: L,
}

impl<L> TracedLockClient<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: LockClient> LockClient for TracedLockClient<L> {
    async fn try_acquire(
        &self,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<LeaseHandle>, LockError> {
        let span = tracing::info_span!("lock.acquire", %key);
        async move {
            tracing::debug!(
                wait_ms = wait.as_millis() as u64,
                lease_ms = lease.as_millis() as u64,
                "acquiring"
            );

            let start = std::time::Instant::now();
            let result = self.inner.try_acquire(key, wait, lease).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(handle)) => tracing::info!(holder = %handle.holder, elapsed_ms, "acquired"),
                // Contention is expected, not an error
                Ok(None) => tracing::warn!(elapsed_ms, "not acquired within wait budget"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "acquire failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn release(&self, handle: &LeaseHandle) -> Result<(), LockError> {
        let span = tracing::info_span!("lock.release", key = %handle.key, holder = %handle.holder);
        async move {
            let result = self.inner.release(handle).await;
            match &result {
                Ok(()) => tracing::info!("released"),
                Err(e) => tracing::warn!(error = %e, "release failed (lease will lapse)"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn is_held(&self, handle: &LeaseHandle) -> Result<bool, LockError> {
        let result = self.inner.is_held(handle).await;
        tracing::trace!(key = %handle.key, held = ?result.as_ref().ok(), "checked");
        result
    }

    async fn shutdown(&self) {
        tracing::info!("shutting down lock client");
        self.inner.shutdown().await;
    }
}

/// Wrapper that adds tracing to any TicketStore
#[derive(Clone)]
pub struct TracedTicketStore<S> {
    inner: S,
}

impl<S> TracedTicketStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: TicketStore> TicketStore for TracedTicketStore<S> {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        let span = tracing::info_span!("store.find", %id);
        async move {
            let start = std::time::Instant::now();
            let result = self.inner.find_by_id(id).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(ticket)) => tracing::debug!(reserved = ticket.reserved, elapsed_ms, "found"),
                Ok(None) => tracing::debug!(elapsed_ms, "not found"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "find failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn save(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        let span = tracing::info_span!("store.save", id = %ticket.id, reserved = ticket.reserved);
        async move {
            let start = std::time::Instant::now();
            let result = self.inner.save(ticket).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "saved"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "save failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
