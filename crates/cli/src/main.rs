// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tg - guarded ticket reservation CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod app;
mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::app::{App, AppOptions};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tg",
    version,
    about = "Ticket guard - lease-locked ticket reservation"
)]
struct Cli {
    #[command(flatten)]
    options: AppOptions,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new unreserved ticket
    Create,
    /// Show a ticket
    Show(commands::ticket::ShowArgs),
    /// Reserve a ticket
    Reserve(commands::reserve::TicketArgs),
    /// Release a reserved ticket
    Release(commands::reserve::TicketArgs),
    /// Race several reservations for one ticket and tally the outcomes
    Contend(commands::reserve::ContendArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::setup_logging()?;

    let app = App::start(&cli.options).await?;

    let result = match cli.command {
        Commands::Create => commands::ticket::create(&app, cli.format).await,
        Commands::Show(args) => commands::ticket::show(&app, args, cli.format).await,
        Commands::Reserve(args) => commands::reserve::reserve(&app, args, cli.format).await,
        Commands::Release(args) => commands::reserve::release(&app, args, cli.format).await,
        Commands::Contend(args) => commands::reserve::contend(&app, args, cli.format).await,
    };

    app.shutdown().await;
    result
}
