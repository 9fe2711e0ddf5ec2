// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn records_calls_in_order() {
    let store = FakeTicketStore::new().with_ticket(Ticket::new(TicketId(1)));

    let mut ticket = store.find_by_id(TicketId(1)).await.unwrap().unwrap();
    ticket.reserved = true;
    store.save(ticket.clone()).await.unwrap();

    assert_eq!(
        store.calls(),
        vec![
            StoreCall::FindById { id: TicketId(1) },
            StoreCall::Save { ticket },
        ]
    );
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.get(TicketId(1)).map(|t| t.reserved), Some(true));
}

#[tokio::test]
async fn injected_find_failure() {
    let store = FakeTicketStore::new().with_ticket(Ticket::new(TicketId(1)));
    store.fail_find("database down");

    let err = store.find_by_id(TicketId(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(ref m) if m == "database down"));
}

#[tokio::test]
async fn injected_save_failure_leaves_state_untouched() {
    let store = FakeTicketStore::new().with_ticket(Ticket::new(TicketId(1)));
    store.fail_save("disk full");

    let result = store
        .save(Ticket {
            id: TicketId(1),
            reserved: true,
        })
        .await;

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.get(TicketId(1)).map(|t| t.reserved), Some(false));
}
