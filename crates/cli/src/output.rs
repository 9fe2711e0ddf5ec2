// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render a report; `None` only if JSON serialization fails
fn render<T: Serialize + Display>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Text => Some(value.to_string()),
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize output");
                None
            }
        },
    }
}

/// Print a report to stdout in the requested format
pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) {
    if let Some(rendered) = render(value, format) {
        println!("{}", rendered);
    }
}
