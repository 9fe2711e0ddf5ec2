// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tg_adapters::{FakeLockClient, LockCall};
use tg_core::TicketId;

const LEASE: Duration = Duration::from_secs(30);

fn key() -> LockKey {
    LockKey::for_ticket("ticket-lock-", TicketId(1))
}

async fn acquire(client: &FakeLockClient) -> LeaseGuard<FakeLockClient> {
    LeaseGuard::acquire(client, &key(), Duration::ZERO, LEASE)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn release_checks_ownership_then_releases() {
    let client = FakeLockClient::new();
    let guard = acquire(&client).await;

    assert_eq!(guard.release().await.unwrap(), Released::Released);
    assert!(matches!(
        &client.calls()[..],
        [
            LockCall::TryAcquire { .. },
            LockCall::IsHeld { .. },
            LockCall::Release { .. }
        ]
    ));
    assert!(client.active_leases().is_empty());
}

#[tokio::test]
async fn timeout_yields_no_guard() {
    let client = FakeLockClient::new();
    client.deny_all();

    let guard = LeaseGuard::acquire(&client, &key(), Duration::ZERO, LEASE)
        .await
        .unwrap();

    assert!(guard.is_none());
    assert_eq!(client.release_count(), 0);
}

#[tokio::test]
async fn lapsed_lease_is_not_released() {
    let client = FakeLockClient::new();
    client.lapse_leases();
    let guard = acquire(&client).await;

    let released = guard.release().await.unwrap();

    assert!(matches!(released, Released::Lapsed { .. }));
    assert_eq!(client.release_count(), 0);
}

#[tokio::test]
async fn drop_releases_in_background() {
    let client = FakeLockClient::new();
    let guard = acquire(&client).await;
    assert_eq!(client.active_leases(), vec![key()]);

    drop(guard);
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(client.release_count(), 1);
    assert!(client.active_leases().is_empty());
}

#[tokio::test]
async fn explicit_release_is_not_repeated_on_drop() {
    let client = FakeLockClient::new();
    let guard = acquire(&client).await;
    guard.release().await.unwrap();
    tokio::task::yield_now().await;

    assert_eq!(client.release_count(), 1);
}

#[test]
fn drop_outside_runtime_leaves_lease_to_lapse() {
    let client = FakeLockClient::new();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let guard = runtime.block_on(acquire(&client));

    drop(guard);

    assert_eq!(client.release_count(), 0);
    assert_eq!(client.active_leases(), vec![key()]);
}
