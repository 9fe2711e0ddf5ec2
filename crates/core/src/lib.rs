// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tg-core: shared model for guarded ticket reservation
//!
//! This crate provides:
//! - The ticket model and the reserve/release transitions
//! - Lock key derivation
//! - A pure lease state machine with injectable time
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod id;
pub mod key;
pub mod lease;
pub mod ticket;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, CoordinatorConfig, LockServiceConfig};
pub use id::{HolderId, IdGen, SequentialIdGen, UuidIdGen};
pub use key::LockKey;
pub use lease::{Lease, LeaseEvent, LeaseInput, LeaseState};
pub use ticket::{Ticket, TicketId, Transition};
