//! Behavioral specifications for the tg CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/config.rs"]
mod cli_config;
#[path = "specs/cli/help.rs"]
mod cli_help;

// ticket/
#[path = "specs/ticket/contention.rs"]
mod ticket_contention;
#[path = "specs/ticket/lifecycle.rs"]
mod ticket_lifecycle;
