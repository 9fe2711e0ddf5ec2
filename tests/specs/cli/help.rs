//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    let run = temp.tg().args(["--help"]).passes();
    for command in ["create", "show", "reserve", "release", "contend"] {
        assert!(run.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn missing_ticket_id_is_a_usage_error() {
    let temp = Project::empty();
    temp.tg()
        .args(["reserve"])
        .exits_with(2)
        .stderr_has("<ID>");
}

#[test]
fn non_numeric_ticket_id_is_rejected() {
    let temp = Project::empty();
    temp.tg()
        .args(["reserve", "abc"])
        .exits_with(2)
        .stderr_has("invalid value");
}
