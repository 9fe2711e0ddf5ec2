// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for guarded reservations

use tg_adapters::LockError;
use tg_storage::StoreError;
use thiserror::Error;

/// Unexpected failure in a collaborator or in the guarded section itself
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("lock service error: {0}")]
    Lock(#[from] LockError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("guarded section panicked: {0}")]
    Panicked(String),
}
