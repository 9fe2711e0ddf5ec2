//! Configuration specs
//!
//! Verify config file discovery and flag overrides.

use crate::prelude::*;

#[test]
fn invalid_config_file_is_reported() {
    let temp = Project::empty();
    temp.write_config("[coordinator]\nlease_duration = \"0s\"\n");

    temp.tg()
        .args(["create"])
        .fails()
        .stderr_has("lease_duration must be greater than zero");
}

#[test]
fn malformed_duration_flag_is_rejected() {
    let temp = Project::empty();
    temp.tg()
        .args(["--wait", "soon", "create"])
        .exits_with(2)
        .stderr_has("--wait");
}

#[test]
fn explicit_config_path_is_used() {
    let temp = Project::with_tickets(1);
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[coordinator]\nkey_prefix = \"seat-\"\n").unwrap();

    temp.tg()
        .args(["--config", config.to_str().unwrap(), "reserve", "1"])
        .passes()
        .stdout_is("Ticket reserved successfully\n");
}

#[test]
fn missing_explicit_config_fails() {
    let temp = Project::empty();
    temp.tg()
        .args(["--config", "/nonexistent/tg.toml", "create"])
        .fails()
        .stderr_has("failed to read");
}
