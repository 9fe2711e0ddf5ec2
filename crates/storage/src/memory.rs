// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory ticket store

use super::{StoreError, TicketStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tg_core::{Ticket, TicketId};

/// Ticket store backed by a shared map
///
/// Clones share the same tickets.
#[derive(Clone, Debug, Default)]
pub struct MemoryTicketStore {
    tickets: Arc<Mutex<BTreeMap<TicketId, Ticket>>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unreserved ticket with the next free id
    pub fn create(&self) -> Ticket {
        let mut tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        let next = tickets.keys().next_back().map_or(1, |id| id.0 + 1);
        let ticket = Ticket::new(TicketId(next));
        tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    /// Insert or overwrite a ticket directly, bypassing any guard
    pub fn insert(&self, ticket: Ticket) {
        self.tickets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ticket.id, ticket);
    }

    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.tickets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.tickets.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        Ok(self.get(id))
    }

    async fn save(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        self.insert(ticket.clone());
        Ok(ticket)
    }
}
