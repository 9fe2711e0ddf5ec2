// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcomes of guarded operations and their caller-facing status text

use crate::error::ReservationError;
use tg_core::{TicketId, Transition};
use thiserror::Error;

/// Result of one reserve or release
///
/// Every variant is returned only after the lease (if any) was released.
#[derive(Debug)]
pub enum Outcome {
    /// The flag was flipped and persisted
    Succeeded,
    /// The flag already had the requested value; nothing was written
    AlreadyInTargetState,
    /// Another holder kept the lease for the whole wait budget
    LockTimedOut,
    /// No ticket has this id
    ResourceNotFound,
    /// The lock service or the store failed
    Failed(ReservationError),
}

/// Not-found is surfaced to callers as an error rather than a status line
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Ticket not found: {0}")]
pub struct TicketNotFound(pub TicketId);

impl Outcome {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Short label for logs and tallies
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Succeeded => "succeeded",
            Outcome::AlreadyInTargetState => "already_in_target_state",
            Outcome::LockTimedOut => "lock_timed_out",
            Outcome::ResourceNotFound => "resource_not_found",
            Outcome::Failed(_) => "failed",
        }
    }

    /// Human-readable status for `transition` on ticket `id`
    pub fn status(&self, transition: Transition, id: TicketId) -> Result<String, TicketNotFound> {
        let text = match (self, transition) {
            (Outcome::Succeeded, Transition::Reserve) => "Ticket reserved successfully",
            (Outcome::Succeeded, Transition::Release) => "Ticket released successfully",
            (Outcome::AlreadyInTargetState, Transition::Reserve) => "Ticket already reserved",
            (Outcome::AlreadyInTargetState, Transition::Release) => {
                "Ticket is not currently reserved"
            }
            (Outcome::LockTimedOut, Transition::Reserve) => {
                "Could not acquire lock, please try again later"
            }
            (Outcome::LockTimedOut, Transition::Release) => {
                "Could not acquire lock to release ticket"
            }
            (Outcome::ResourceNotFound, _) => return Err(TicketNotFound(id)),
            (Outcome::Failed(cause), _) => return Ok(format!("Error: {}", cause)),
        };
        Ok(text.to_string())
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
