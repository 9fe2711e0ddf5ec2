// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tg create` and `tg show`

use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;
use tg_core::{Ticket, TicketId};
use tg_engine::TicketNotFound;
use tg_storage::TicketStore;

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Ticket id
    pub id: TicketId,
}

#[derive(Serialize)]
struct TicketView {
    id: TicketId,
    reserved: bool,
}

impl From<Ticket> for TicketView {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            reserved: ticket.reserved,
        }
    }
}

impl fmt::Display for TicketView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.reserved { "reserved" } else { "available" };
        write!(f, "Ticket {}: {}", self.id, state)
    }
}

pub async fn create(app: &App, format: OutputFormat) -> Result<ExitCode> {
    let ticket = app.store.create().await?;
    tracing::info!(id = %ticket.id, "ticket created");
    output::print(&TicketView::from(ticket), format);
    Ok(ExitCode::SUCCESS)
}

/// Reads without the lock; the result may be stale by the time it prints
pub async fn show(app: &App, args: ShowArgs, format: OutputFormat) -> Result<ExitCode> {
    let ticket = app
        .store
        .find_by_id(args.id)
        .await?
        .ok_or(TicketNotFound(args.id))?;
    output::print(&TicketView::from(ticket), format);
    Ok(ExitCode::SUCCESS)
}
