// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake ticket store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MemoryTicketStore, StoreError, TicketStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tg_core::{Ticket, TicketId};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FindById { id: TicketId },
    Save { ticket: Ticket },
}

#[derive(Default)]
struct Failures {
    find: Option<String>,
    save: Option<String>,
}

/// Fake ticket store that records calls and can be told to fail
#[derive(Clone, Default)]
pub struct FakeTicketStore {
    tickets: MemoryTicketStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl FakeTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ticket without recording a call
    pub fn with_ticket(self, ticket: Ticket) -> Self {
        self.tickets.insert(ticket);
        self
    }

    /// Make every subsequent `find_by_id` fail with `Unavailable(message)`
    pub fn fail_find(&self, message: impl Into<String>) {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).find = Some(message.into());
    }

    /// Make every subsequent `save` fail with `Unavailable(message)`
    pub fn fail_save(&self, message: impl Into<String>) {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).save = Some(message.into());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `save` calls, failed ones included
    pub fn save_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Save { .. }))
            .count()
    }

    /// Current stored state, bypassing call recording
    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.get(id)
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl TicketStore for FakeTicketStore {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        self.record(StoreCall::FindById { id });

        let failure = self.failures.lock().unwrap_or_else(|e| e.into_inner()).find.clone();
        if let Some(message) = failure {
            return Err(StoreError::Unavailable(message));
        }
        self.tickets.find_by_id(id).await
    }

    async fn save(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        self.record(StoreCall::Save {
            ticket: ticket.clone(),
        });

        let failure = self.failures.lock().unwrap_or_else(|e| e.into_inner()).save.clone();
        if let Some(message) = failure {
            return Err(StoreError::Unavailable(message));
        }
        self.tickets.save(ticket).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
