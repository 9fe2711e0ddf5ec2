// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease state machine for exclusive access to one lock key
//!
//! A lease is held by at most one holder at a time and lapses on its own
//! once its duration has passed, so a crashed holder never wedges the key.
//! Transitions are pure: they return the next state together with the
//! events the caller should report.

use crate::clock::Clock;
use crate::id::HolderId;
use crate::key::LockKey;
use std::time::{Duration, Instant};

/// Lease state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaseState {
    /// Nobody holds the key
    Free,
    /// Held until `granted_at + duration`
    Held {
        holder: HolderId,
        granted_at: Instant,
        duration: Duration,
    },
}

/// Inputs that drive lease transitions
#[derive(Clone, Debug)]
pub enum LeaseInput {
    /// Attempt to take the lease for `duration`
    Acquire { holder: HolderId, duration: Duration },
    /// Give the lease back
    Release { holder: HolderId },
    /// Drop the lease if it has lapsed (called when sweeping)
    Tick,
}

/// Observable results of a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaseEvent {
    Acquired {
        key: LockKey,
        holder: HolderId,
    },
    /// An expired lease was taken over by a new holder
    Reclaimed {
        key: LockKey,
        previous_holder: HolderId,
        new_holder: HolderId,
    },
    Denied {
        key: LockKey,
        holder: HolderId,
        current_holder: HolderId,
    },
    Released {
        key: LockKey,
        holder: HolderId,
    },
    /// Release by someone who no longer (or never) held the lease
    ReleaseIgnored {
        key: LockKey,
        holder: HolderId,
    },
    Expired {
        key: LockKey,
        holder: HolderId,
    },
}

/// A lease on one lock key
#[derive(Clone, Debug)]
pub struct Lease {
    pub key: LockKey,
    pub state: LeaseState,
}

impl Lease {
    pub fn new(key: LockKey) -> Self {
        Self {
            key,
            state: LeaseState::Free,
        }
    }

    /// Current holder, even if the lease has already lapsed
    pub fn holder(&self) -> Option<&HolderId> {
        match &self.state {
            LeaseState::Free => None,
            LeaseState::Held { holder, .. } => Some(holder),
        }
    }

    /// Held, but past its duration
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        match &self.state {
            LeaseState::Free => false,
            LeaseState::Held {
                granted_at,
                duration,
                ..
            } => clock.has_elapsed(*granted_at, *duration),
        }
    }

    /// Free, or held by a lease that has lapsed
    pub fn is_available(&self, clock: &impl Clock) -> bool {
        matches!(self.state, LeaseState::Free) || self.is_expired(clock)
    }

    /// Held by `holder` and not yet lapsed
    pub fn is_held_by(&self, holder: &HolderId, clock: &impl Clock) -> bool {
        matches!(&self.state, LeaseState::Held { holder: h, .. } if h == holder)
            && !self.is_expired(clock)
    }

    /// Time left before a live lease lapses
    pub fn remaining(&self, clock: &impl Clock) -> Option<Duration> {
        match &self.state {
            LeaseState::Free => None,
            LeaseState::Held {
                granted_at,
                duration,
                ..
            } => {
                let elapsed = clock.now().saturating_duration_since(*granted_at);
                duration.checked_sub(elapsed).filter(|d| !d.is_zero())
            }
        }
    }

    /// Pure state transition function
    pub fn transition(&self, input: LeaseInput, clock: &impl Clock) -> (Lease, Vec<LeaseEvent>) {
        let mut next = self.clone();
        let mut events = Vec::new();

        match input {
            LeaseInput::Acquire { holder, duration } => match &self.state {
                LeaseState::Free => {
                    next.state = held(holder.clone(), duration, clock);
                    events.push(LeaseEvent::Acquired {
                        key: self.key.clone(),
                        holder,
                    });
                }
                LeaseState::Held {
                    holder: current, ..
                } => {
                    if self.is_expired(clock) {
                        next.state = held(holder.clone(), duration, clock);
                        events.push(LeaseEvent::Reclaimed {
                            key: self.key.clone(),
                            previous_holder: current.clone(),
                            new_holder: holder.clone(),
                        });
                        events.push(LeaseEvent::Acquired {
                            key: self.key.clone(),
                            holder,
                        });
                    } else {
                        events.push(LeaseEvent::Denied {
                            key: self.key.clone(),
                            holder,
                            current_holder: current.clone(),
                        });
                    }
                }
            },

            LeaseInput::Release { holder } => {
                if self.is_held_by(&holder, clock) {
                    next.state = LeaseState::Free;
                    events.push(LeaseEvent::Released {
                        key: self.key.clone(),
                        holder,
                    });
                } else {
                    // Lapsed leases stay in place until reclaimed or swept,
                    // so a late release never frees someone else's grant.
                    events.push(LeaseEvent::ReleaseIgnored {
                        key: self.key.clone(),
                        holder,
                    });
                }
            }

            LeaseInput::Tick => {
                if self.is_expired(clock) {
                    if let LeaseState::Held { holder, .. } = &self.state {
                        events.push(LeaseEvent::Expired {
                            key: self.key.clone(),
                            holder: holder.clone(),
                        });
                    }
                    next.state = LeaseState::Free;
                }
            }
        }

        (next, events)
    }
}

fn held(holder: HolderId, duration: Duration, clock: &impl Clock) -> LeaseState {
    LeaseState::Held {
        holder,
        granted_at: clock.now(),
        duration,
    }
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
