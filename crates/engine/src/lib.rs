// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Guarded reservation engine

mod coordinator;
mod error;
mod guard;
mod outcome;

pub use coordinator::ReservationCoordinator;
pub use error::ReservationError;
pub use guard::{LeaseGuard, Released};
pub use outcome::{Outcome, TicketNotFound};
