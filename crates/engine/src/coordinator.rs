// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation coordinator
//!
//! Serializes reserve/release of one ticket across every process sharing
//! the lock service. Per ticket the sequence is: take the ticket's lease
//! within the wait budget, load, apply the transition if it changes
//! anything, persist, give the lease back. The coordinator holds no
//! in-process mutex of its own.
//!
//! The store and the lock service are separate systems. If the guarded
//! section outlives the lease, another holder may write concurrently; that
//! window is not closed here (it would need fencing tokens in the store),
//! only reported when the lease is found lapsed at release time.

use crate::error::ReservationError;
use crate::guard::{LeaseGuard, Released};
use crate::outcome::{Outcome, TicketNotFound};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tg_adapters::LockClient;
use tg_core::{CoordinatorConfig, LockKey, Ticket, TicketId, Transition};
use tg_storage::TicketStore;

/// Guards the `reserved` flag of tickets with per-ticket leases
#[derive(Clone)]
pub struct ReservationCoordinator<L, S> {
    lock: L,
    store: S,
    config: CoordinatorConfig,
}

impl<L: LockClient, S: TicketStore> ReservationCoordinator<L, S> {
    pub fn new(lock: L, store: S, config: CoordinatorConfig) -> Self {
        Self {
            lock,
            store,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn lock_key(&self, id: TicketId) -> LockKey {
        LockKey::for_ticket(&self.config.key_prefix, id)
    }

    /// Flip `reserved` from false to true
    pub async fn reserve(&self, id: TicketId) -> Outcome {
        self.apply(id, Transition::Reserve).await
    }

    /// Flip `reserved` from true to false
    pub async fn release(&self, id: TicketId) -> Outcome {
        self.apply(id, Transition::Release).await
    }

    /// Run `transition` and render the caller-facing status line
    pub async fn status(
        &self,
        id: TicketId,
        transition: Transition,
    ) -> Result<String, TicketNotFound> {
        self.apply(id, transition).await.status(transition, id)
    }

    /// Run one guarded transition
    pub async fn apply(&self, id: TicketId, transition: Transition) -> Outcome {
        let key = self.lock_key(id);
        tracing::debug!(%id, %key, %transition, "attempting to acquire lock");

        let guard = match LeaseGuard::acquire(
            &self.lock,
            &key,
            self.config.wait_budget,
            self.config.lease_duration,
        )
        .await
        {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                tracing::warn!(%id, %transition, "failed to acquire lock");
                return Outcome::LockTimedOut;
            }
            Err(e) => {
                tracing::error!(%id, %transition, error = %e, "lock service failed");
                return Outcome::Failed(e.into());
            }
        };
        tracing::debug!(%id, %key, "lock acquired");

        // Panics become `Failed`; the lease is still released below
        let outcome = match AssertUnwindSafe(self.guarded(id, transition))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => Outcome::Failed(ReservationError::Panicked(panic_message(&*payload))),
        };

        match guard.release().await {
            Ok(Released::Released) => tracing::debug!(%id, %key, "lock released"),
            Ok(Released::Lapsed { .. }) => {}
            // The outcome already happened; an unreleased lease lapses on its own
            Err(e) => tracing::warn!(%id, %key, error = %e, "failed to release lock"),
        }

        match &outcome {
            Outcome::Succeeded => tracing::info!(%id, %transition, "ticket updated"),
            Outcome::AlreadyInTargetState => {
                tracing::info!(%id, %transition, "ticket already in target state")
            }
            Outcome::ResourceNotFound => tracing::warn!(%id, %transition, "ticket not found"),
            Outcome::Failed(e) => tracing::error!(%id, %transition, error = %e, "guarded update failed"),
            Outcome::LockTimedOut => {}
        }
        outcome
    }

    /// The read-check-write; only called while the lease is held
    async fn guarded(&self, id: TicketId, transition: Transition) -> Outcome {
        let ticket = match self.store.find_by_id(id).await {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return Outcome::ResourceNotFound,
            Err(e) => return Outcome::Failed(ReservationError::Store(e)),
        };

        if ticket.is_in(transition) {
            return Outcome::AlreadyInTargetState;
        }

        let updated = Ticket {
            reserved: transition.target(),
            ..ticket
        };
        match self.store.save(updated).await {
            Ok(_) => Outcome::Succeeded,
            Err(e) => Outcome::Failed(ReservationError::Store(e)),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
