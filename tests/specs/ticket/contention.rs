//! Contention specs
//!
//! Verify that racing reservations produce exactly one winner.

use crate::prelude::*;

#[test]
fn ten_callers_one_winner() {
    let temp = Project::with_tickets(1);

    temp.tg()
        .args(["contend", "1", "--callers", "10"])
        .passes()
        .stdout_is(
            "Ticket 1: 10 callers
  succeeded: 1
  already_in_target_state: 9
  lock_timed_out: 0
  resource_not_found: 0
  failed: 0
  reserved: true
  active leases: 0
",
        );
}

#[test]
fn separate_processes_one_winner() {
    let temp = Project::with_tickets(1);

    let children: Vec<_> = (0..4).map(|_| temp.spawn_tg(&["reserve", "1"])).collect();
    let mut lines: Vec<String> = children
        .into_iter()
        .map(|child| {
            let output = child.wait_with_output().unwrap();
            assert!(output.status.success(), "{:?}", output);
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        })
        .collect();
    lines.sort();

    assert_eq!(
        lines,
        vec![
            "Ticket already reserved",
            "Ticket already reserved",
            "Ticket already reserved",
            "Ticket reserved successfully",
        ]
    );
    temp.tg().args(["show", "1"]).passes().stdout_is("Ticket 1: reserved
");
}

#[test]
fn lease_left_by_other_process_times_out() {
    let temp = Project::with_tickets(1);
    let expires = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis()
        + 60_000;
    std::fs::create_dir_all(temp.path().join("locks")).unwrap();
    std::fs::write(
        temp.path().join("locks").join("ticket-lock-1.lock"),
        format!(
            r#"{{"key":"ticket-lock-1","holder":"elsewhere","pid":1,"expires_at_ms":{}}}"#,
            expires
        ),
    )
    .unwrap();

    temp.tg()
        .args(["--wait", "100ms", "reserve", "1"])
        .exits_with(75)
        .stdout_is("Could not acquire lock, please try again later\n");
    temp.tg()
        .args(["--wait", "100ms", "release", "1"])
        .exits_with(75)
        .stdout_is("Could not acquire lock to release ticket\n");
    temp.tg().args(["show", "1"]).passes().stdout_is("Ticket 1: available\n");
}

#[test]
fn contend_on_reserved_ticket_has_no_winner() {
    let temp = Project::with_tickets(1);
    temp.tg().args(["reserve", "1"]).passes();

    temp.tg()
        .args(["contend", "1", "--callers", "5"])
        .passes()
        .stdout_has("succeeded: 0")
        .stdout_has("already_in_target_state: 5");
}

#[test]
fn contend_on_missing_ticket_fails() {
    let temp = Project::empty();
    temp.tg()
        .args(["contend", "3"])
        .fails()
        .stderr_has("Ticket not found: 3");
}

#[test]
fn zero_callers_is_rejected() {
    let temp = Project::with_tickets(1);
    temp.tg()
        .args(["contend", "1", "--callers", "0"])
        .exits_with(2);
}
