// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock key derivation

use crate::ticket::TicketId;
use std::fmt;

/// Namespaced lock key guarding a single ticket
///
/// The same ticket always maps to the same key. The numeric id is rendered
/// in full after a fixed prefix, so distinct tickets never share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockKey(String);

impl LockKey {
    /// A key exactly as given, e.g. one read back from a lock service
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn for_ticket(prefix: &str, id: TicketId) -> Self {
        Self(format!("{}{}", prefix, id.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        first = { 1, "ticket-lock-1" },
        zero = { 0, "ticket-lock-0" },
        large = { u64::MAX, "ticket-lock-18446744073709551615" },
    )]
    fn derives_prefixed_key(id: u64, expected: &str) {
        assert_eq!(LockKey::for_ticket("ticket-lock-", TicketId(id)).as_str(), expected);
    }

    proptest! {
        #[test]
        fn same_ticket_same_key(id in any::<u64>()) {
            prop_assert_eq!(
                LockKey::for_ticket("ticket-lock-", TicketId(id)),
                LockKey::for_ticket("ticket-lock-", TicketId(id))
            );
        }

        #[test]
        fn distinct_tickets_never_collide(a in any::<u64>(), b in any::<u64>()) {
            prop_assume!(a != b);
            prop_assert_ne!(
                LockKey::for_ticket("ticket-lock-", TicketId(a)),
                LockKey::for_ticket("ticket-lock-", TicketId(b))
            );
        }
    }
}
