// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket model and the reserve/release transitions guarded on it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(TicketId)
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A reservable ticket
///
/// `reserved` must only be written by the reservation coordinator while it
/// holds the ticket's lease.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub reserved: bool,
}

impl Ticket {
    /// A freshly created, unreserved ticket
    pub fn new(id: TicketId) -> Self {
        Self {
            id,
            reserved: false,
        }
    }

    /// Whether the ticket already sits in the state `transition` targets
    pub fn is_in(&self, transition: Transition) -> bool {
        self.reserved == transition.target()
    }
}

/// The two guarded state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `reserved: false -> true`
    Reserve,
    /// `reserved: true -> false`
    Release,
}

impl Transition {
    /// Value of `reserved` after the transition
    pub fn target(self) -> bool {
        match self {
            Transition::Reserve => true,
            Transition::Release => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::Reserve => "reserve",
            Transition::Release => "release",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
