// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tg reserve`, `tg release` and `tg contend`

use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::process::ExitCode;
use std::sync::Arc;
use tg_core::{TicketId, Transition};
use tg_engine::{Outcome, TicketNotFound};
use tg_storage::TicketStore;
use tokio::sync::Barrier;

/// Exit code when the lock was busy for the whole wait budget (EX_TEMPFAIL)
const EXIT_LOCK_TIMEOUT: u8 = 75;

#[derive(clap::Args)]
pub struct TicketArgs {
    /// Ticket id
    pub id: TicketId,
}

#[derive(clap::Args)]
pub struct ContendArgs {
    /// Ticket id
    pub id: TicketId,

    /// Number of concurrent reservations
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub callers: u16,
}

#[derive(Serialize)]
struct StatusReport {
    id: TicketId,
    operation: &'static str,
    outcome: &'static str,
    status: String,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status)
    }
}

pub async fn reserve(app: &App, args: TicketArgs, format: OutputFormat) -> Result<ExitCode> {
    transition(app, args.id, Transition::Reserve, format).await
}

pub async fn release(app: &App, args: TicketArgs, format: OutputFormat) -> Result<ExitCode> {
    transition(app, args.id, Transition::Release, format).await
}

async fn transition(
    app: &App,
    id: TicketId,
    transition: Transition,
    format: OutputFormat,
) -> Result<ExitCode> {
    let outcome = app.coordinator.apply(id, transition).await;
    let report = StatusReport {
        id,
        operation: transition.name(),
        outcome: outcome.label(),
        status: outcome.status(transition, id)?,
    };
    output::print(&report, format);
    Ok(ExitCode::from(exit_status(&outcome)))
}

fn exit_status(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Succeeded | Outcome::AlreadyInTargetState => 0,
        Outcome::LockTimedOut => EXIT_LOCK_TIMEOUT,
        Outcome::ResourceNotFound | Outcome::Failed(_) => 1,
    }
}

const LABELS: [&str; 5] = [
    "succeeded",
    "already_in_target_state",
    "lock_timed_out",
    "resource_not_found",
    "failed",
];

#[derive(Serialize)]
struct Tally {
    id: TicketId,
    callers: u16,
    outcomes: BTreeMap<&'static str, usize>,
    reserved: bool,
    active_leases: usize,
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticket {}: {} callers", self.id, self.callers)?;
        for label in LABELS {
            let count = self.outcomes.get(label).copied().unwrap_or(0);
            writeln!(f, "  {}: {}", label, count)?;
        }
        writeln!(f, "  reserved: {}", self.reserved)?;
        write!(f, "  active leases: {}", self.active_leases)
    }
}

/// Start every caller at once and count what each one got
pub async fn contend(app: &App, args: ContendArgs, format: OutputFormat) -> Result<ExitCode> {
    let callers = usize::from(args.callers);
    let barrier = Arc::new(Barrier::new(callers));

    let mut tasks = Vec::with_capacity(callers);
    for _ in 0..callers {
        let coordinator = app.coordinator.clone();
        let barrier = Arc::clone(&barrier);
        let id = args.id;
        tasks.push(tokio::spawn(async move {
            barrier.wait().await;
            coordinator.reserve(id).await
        }));
    }

    let mut outcomes = BTreeMap::new();
    for task in tasks {
        let outcome = task.await?;
        if matches!(outcome, Outcome::ResourceNotFound) {
            return Err(TicketNotFound(args.id).into());
        }
        *outcomes.entry(outcome.label()).or_insert(0) += 1;
    }

    let reserved = app
        .store
        .find_by_id(args.id)
        .await?
        .is_some_and(|t| t.reserved);

    let tally = Tally {
        id: args.id,
        callers: args.callers,
        outcomes,
        reserved,
        active_leases: app.lock.active_leases().await?.len(),
    };
    output::print(&tally, format);
    Ok(ExitCode::SUCCESS)
}
