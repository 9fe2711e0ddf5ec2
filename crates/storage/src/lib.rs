// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Ticket persistence
//!
//! The store is a plain CRUD collaborator: it knows nothing about locks.
//! Callers that flip `reserved` are expected to hold the ticket's lease.

mod json;
mod memory;

pub use json::JsonTicketStore;
pub use memory::MemoryTicketStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTicketStore, StoreCall};

use async_trait::async_trait;
use tg_core::{Ticket, TicketId};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt record for ticket {id}: {source}")]
    Corrupt {
        id: TicketId,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for loading and persisting tickets by id
#[async_trait]
pub trait TicketStore: Clone + Send + Sync + 'static {
    /// Load a ticket, `None` if no ticket has this id
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Persist a ticket, returning what was stored
    async fn save(&self, ticket: Ticket) -> Result<Ticket, StoreError>;
}
