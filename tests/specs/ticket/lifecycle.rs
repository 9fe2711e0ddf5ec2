//! Ticket lifecycle specs
//!
//! Verify create/show/reserve/release and their status lines.

use crate::prelude::*;

#[test]
fn create_assigns_sequential_ids() {
    let temp = Project::empty();
    temp.tg().args(["create"]).passes().stdout_is("Ticket 1: available\n");
    temp.tg().args(["create"]).passes().stdout_is("Ticket 2: available\n");
}

#[test]
fn reserve_then_reserve_again() {
    let temp = Project::with_tickets(1);

    temp.tg()
        .args(["reserve", "1"])
        .passes()
        .stdout_is("Ticket reserved successfully\n");
    temp.tg()
        .args(["reserve", "1"])
        .passes()
        .stdout_is("Ticket already reserved\n");
    temp.tg()
        .args(["show", "1"])
        .passes()
        .stdout_is("Ticket 1: reserved\n");
}

#[test]
fn reserve_release_reserve() {
    let temp = Project::with_tickets(1);

    temp.tg().args(["reserve", "1"]).passes().stdout_has("reserved successfully");
    temp.tg()
        .args(["release", "1"])
        .passes()
        .stdout_is("Ticket released successfully\n");
    temp.tg().args(["reserve", "1"]).passes().stdout_has("reserved successfully");
    temp.tg().args(["show", "1"]).passes().stdout_has("reserved");
}

#[test]
fn release_of_available_ticket_is_a_no_op() {
    let temp = Project::with_tickets(1);
    temp.tg()
        .args(["release", "1"])
        .passes()
        .stdout_is("Ticket is not currently reserved\n");
}

#[test]
fn reserve_missing_ticket_fails() {
    let temp = Project::empty();
    temp.tg()
        .args(["reserve", "42"])
        .fails()
        .stderr_has("Ticket not found: 42");
}

#[test]
fn show_missing_ticket_fails() {
    let temp = Project::empty();
    temp.tg()
        .args(["show", "7"])
        .fails()
        .stderr_has("Ticket not found: 7");
}

#[test]
fn json_output_includes_outcome() {
    let temp = Project::with_tickets(1);
    let run = temp
        .tg()
        .args(["--format", "json", "reserve", "1"])
        .passes();

    let value: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["operation"], "reserve");
    assert_eq!(value["outcome"], "succeeded");
    assert_eq!(value["status"], "Ticket reserved successfully");
}

#[test]
fn corrupt_record_reports_error() {
    let temp = Project::with_tickets(1);
    std::fs::write(temp.path().join("tickets").join("1.json"), "{ broken").unwrap();

    temp.tg()
        .args(["reserve", "1"])
        .fails()
        .stdout_has("Error: store error: corrupt record for ticket 1");
}
