// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holder token generation
//!
//! Every lease acquisition is stamped with a fresh holder token so that two
//! call contexts in the same process never share ownership of a key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies the owner of one lease acquisition
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HolderId(pub String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates unique holder tokens
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> HolderId;
}

/// UUID-based generator for production use
#[derive(Clone, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> HolderId {
        HolderId(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for testing
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("holder")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> HolderId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        HolderId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_holders_are_unique() {
        let id_gen = UuidIdGen;
        let a = id_gen.next();
        let b = id_gen.next();
        assert_ne!(a, b);
        assert_eq!(a.0.len(), 36);
    }

    #[test]
    fn sequential_holders_are_shared_across_clones() {
        let gen1 = SequentialIdGen::new("worker");
        let gen2 = gen1.clone();
        assert_eq!(gen1.next().to_string(), "worker-1");
        assert_eq!(gen2.next().to_string(), "worker-2");
        assert_eq!(gen1.next().to_string(), "worker-3");
    }
}
